use std::sync::Arc;

use serde_json::Value;

use crate::error::Result;
use crate::models::{AnalysisRequest, AnalysisTask};
use crate::schema;
use crate::services::NutritionAnalyzer;

pub struct AnalysisHandler {
    analyzer: Arc<dyn NutritionAnalyzer>,
}

impl AnalysisHandler {
    pub fn new(analyzer: Arc<dyn NutritionAnalyzer>) -> Self {
        Self { analyzer }
    }

    /// Handle one analysis request end to end: classify it, call the model
    /// once, check the answer carries the mode's required fields, and pass
    /// the structured payload through untouched.
    pub async fn handle(&self, request: AnalysisRequest) -> Result<Value> {
        log::info!(
            "📨 INCOMING ANALYSIS - Mode: {:?} | Query: {:?} | Items: {} | Image bytes: {}",
            request.mode,
            request.query,
            request.meal_items.as_ref().map_or(0, |items| items.len()),
            request.image_base64.as_ref().map_or(0, |image| image.len()),
        );

        let task = AnalysisTask::from_request(request)?;
        log::info!("🔎 Selected {} mode", task.mode_name());

        let result = self.analyzer.analyze(&task).await?;
        schema::validate_required(&result, schema::required_for(&task))?;

        match result.get("foodType").and_then(Value::as_str) {
            Some(food_type) => log::info!("✅ Analysis complete: {}", food_type),
            None => log::info!("✅ {} analysis complete", task.mode_name()),
        }

        Ok(result)
    }
}
