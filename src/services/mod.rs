pub mod ai_service;
pub mod openrouter; // OpenRouter AI service

pub use ai_service::NutritionAnalyzer;
pub use openrouter::OpenRouterService;
