use crate::error::Result;
use crate::models::AnalysisTask;

/// Trait for nutrition-analysis backends (OpenRouter, or any other
/// OpenAI-compatible chat-completions gateway).
#[async_trait::async_trait]
pub trait NutritionAnalyzer: Send + Sync {
    /// Run one analysis task upstream and return the structured tool-call
    /// arguments as parsed JSON.
    async fn analyze(&self, task: &AnalysisTask) -> Result<serde_json::Value>;
}
