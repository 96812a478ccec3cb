use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Everything that can go wrong while handling an analysis request.
/// Each variant maps to one stable HTTP status so callers can branch on it.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("{0}")]
    MissingInput(String),

    #[error("Rate limit exceeded. Please try again in a moment.")]
    UpstreamRateLimited,

    #[error("AI credits depleted. Please add more credits to continue.")]
    UpstreamBillingExhausted,

    #[error("Failed to analyze request")]
    UpstreamFailure,

    #[error("Failed to extract nutrition data")]
    MalformedUpstreamResponse,

    #[error("{0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, GatewayError>;

impl GatewayError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::MissingInput(_) => StatusCode::BAD_REQUEST,
            GatewayError::UpstreamRateLimited => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::UpstreamBillingExhausted => StatusCode::PAYMENT_REQUIRED,
            GatewayError::UpstreamFailure => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::MalformedUpstreamResponse => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
