//! API error types.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use cuegen_genai::GenAiError;
use cuegen_pipeline::PipelineError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Model or autocomplete backend unreachable or stalled.
    #[error("Upstream service unavailable: {0}")]
    Upstream(String),

    /// The uploaded video's asynchronous processing reported failure.
    #[error("Video processing failed: {0}")]
    ProcessingFailed(String),

    /// Backend misconfiguration (missing API key etc). Fatal.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::ProcessingFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Config(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match &e {
            PipelineError::Reference(r) => ApiError::BadRequest(r.to_string()),
            PipelineError::GenAi(GenAiError::ProcessingFailed) => {
                ApiError::ProcessingFailed(e.to_string())
            }
            PipelineError::GenAi(GenAiError::MissingConfig(_)) => ApiError::Config(e.to_string()),
            PipelineError::GenAi(g) if g.is_upstream() => ApiError::Upstream(e.to_string()),
            PipelineError::GenAi(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<GenAiError> for ApiError {
    fn from(e: GenAiError) -> Self {
        ApiError::from(PipelineError::GenAi(e))
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Don't expose internal error details in production
        let detail = match &self {
            ApiError::Internal(_) | ApiError::Config(_) | ApiError::Upstream(_) => {
                if std::env::var("ENVIRONMENT").unwrap_or_default() == "production" {
                    match &self {
                        ApiError::Upstream(_) => "Upstream service unavailable".to_string(),
                        _ => "An internal error occurred".to_string(),
                    }
                } else {
                    self.to_string()
                }
            }
            _ => self.to_string(),
        };

        let body = ErrorResponse { detail };

        (status, Json(body)).into_response()
    }
}
