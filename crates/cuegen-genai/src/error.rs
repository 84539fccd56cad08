//! GenAI client errors.

use thiserror::Error;

pub type GenAiResult<T> = Result<T, GenAiError>;

#[derive(Debug, Error)]
pub enum GenAiError {
    /// API key or backend configuration is missing. Fatal, not retried.
    #[error("GenAI backend not configured: {0}")]
    MissingConfig(String),

    #[error("GenAI request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GenAI API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("GenAI response contained no candidate text")]
    EmptyResponse,

    /// All models in the fallback list failed.
    #[error("all GenAI models failed, last error: {0}")]
    AllModelsFailed(Box<GenAiError>),

    /// The uploaded file's asynchronous processing reported failure.
    #[error("video file processing failed")]
    ProcessingFailed,

    /// The processing poll exhausted its attempt bound.
    #[error("video file still processing after {attempts} poll attempts")]
    ProcessingTimeout { attempts: u32 },
}

impl GenAiError {
    /// True for errors the caller should treat as the upstream being
    /// unavailable rather than a bad request.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            GenAiError::Http(_)
                | GenAiError::Api { .. }
                | GenAiError::EmptyResponse
                | GenAiError::AllModelsFailed(_)
                | GenAiError::ProcessingTimeout { .. }
        )
    }
}
