use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

/// Failures of the individual prediction sources. The router decides
/// which of these are recoverable (see `router.rs`).
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    /// Local classifier or vectorizer failed during inference. Recovered
    /// via the heuristic fallback, never surfaced to the caller.
    #[error("model inference failed: {0}")]
    ModelFailure(String),

    /// Remote credential absent. Surfaced, not retried.
    #[error("remote classifier is not configured")]
    Unconfigured,

    /// Remote call or response parse failed. Surfaced, not retried.
    #[error("remote classification failed: {0}")]
    RemoteFailure(String),
}

/// Failures of the article extraction path. Details are logged but the
/// HTTP boundary only ever reports a generic extraction error.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned HTTP {0}")]
    Status(u16),

    #[error("could not extract sufficient content")]
    EmptyContent,
}

/// Standard error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub request_id: String,
}

/// Unified API error type. All handlers return `Result<_, ApiError>`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0} is required")]
    MissingInput(&'static str),

    #[error("text too short for analysis (minimum {min} characters)")]
    TextTooShort { min: usize },

    #[error("invalid URL format")]
    InvalidUrl,

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("could not access or parse the article from the provided URL")]
    ExtractionFailed,
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) | ApiError::TextTooShort { .. } | ApiError::InvalidUrl => {
                StatusCode::BAD_REQUEST
            }
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::ExtractionFailed => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            ApiError::MissingInput(_) => "missing_input",
            ApiError::TextTooShort { .. } => "text_too_short",
            ApiError::InvalidUrl => "invalid_url",
            ApiError::ServiceUnavailable(_) => "service_unavailable",
            ApiError::ExtractionFailed => "extraction_failed",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        tracing::error!(
            error_type = error_type,
            status = status.as_u16(),
            message = %self,
            "API error"
        );

        (
            status,
            Json(ErrorResponse {
                error: error_type.to_string(),
                message: self.to_string(),
                request_id: Uuid::new_v4().to_string(),
            }),
        )
            .into_response()
    }
}
