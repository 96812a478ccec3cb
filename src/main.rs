mod error;
mod handlers;
mod models;
mod prompts;
mod schema;
mod server;
mod services;

use anyhow::Result;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;

use handlers::AnalysisHandler;
use services::{NutritionAnalyzer, OpenRouterService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting NutriLens Analysis Gateway...");

    // Load configuration
    let openrouter_api_key =
        env::var("OPENROUTER_API_KEY").expect("OPENROUTER_API_KEY must be set in .env file");

    let openrouter_model =
        env::var("OPENROUTER_MODEL").unwrap_or_else(|_| "google/gemini-2.5-flash".to_string());

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let analyzer = Arc::new(OpenRouterService::new(
        openrouter_api_key,
        openrouter_model.clone(),
    )) as Arc<dyn NutritionAnalyzer>;
    log::info!(
        "✅ OpenRouter service initialized with model: {}",
        openrouter_model
    );

    let analysis_handler = Arc::new(AnalysisHandler::new(analyzer));
    log::info!("✅ Analysis handler initialized");

    let app = server::create_gateway_router(analysis_handler);

    log::info!("🌐 Gateway listening on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
