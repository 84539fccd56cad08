//! Pipeline errors.

use thiserror::Error;

use cuegen_genai::GenAiError;
use cuegen_models::VideoReferenceError;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    GenAi(#[from] GenAiError),

    #[error("invalid video reference: {0}")]
    Reference(#[from] VideoReferenceError),
}

impl PipelineError {
    /// True when the failure is the upstream model backend being
    /// unreachable or stalled, as opposed to bad input.
    pub fn is_upstream(&self) -> bool {
        matches!(self, PipelineError::GenAi(e) if e.is_upstream())
    }

    /// True when the uploaded file's asynchronous processing failed.
    pub fn is_processing_failed(&self) -> bool {
        matches!(self, PipelineError::GenAi(GenAiError::ProcessingFailed))
    }
}
