use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderName, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::error::GatewayError;
use crate::handlers::AnalysisHandler;

/// Data-URI images from phone cameras run well past axum's 2 MB default.
const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

pub struct AppState {
    pub analysis_handler: Arc<AnalysisHandler>,
}

pub fn create_gateway_router(analysis_handler: Arc<AnalysisHandler>) -> Router {
    let state = Arc::new(AppState { analysis_handler });

    // Browser clients call this endpoint directly, so CORS stays permissive:
    // any origin, the headers the app's fetch layer sends.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
        ]);

    Router::new()
        .route("/", get(root_handler))
        .route("/analyze-nutrition", post(analyze_handler))
        .route("/health", get(health_check))
        // Raise the request body cap for base64 image payloads
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(cors)
        .with_state(state)
}

async fn analyze_handler(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    // Parse the raw bytes by hand: a malformed body (bad JSON, bad UTF-8)
    // maps to the catch-all 500 with an { "error": ... } payload, not a
    // framework 4xx rejection.
    let request = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            log::error!("❌ Failed to parse analysis request: {}", e);
            return GatewayError::Internal(e.to_string()).into_response();
        }
    };

    match state.analysis_handler.handle(request).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn root_handler() -> &'static str {
    "NutriLens Analysis Gateway - POST /analyze-nutrition"
}

async fn health_check() -> &'static str {
    "OK"
}
