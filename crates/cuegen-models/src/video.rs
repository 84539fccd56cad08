//! Video reference models.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One timed line of a transcript.
///
/// Sequences of segments are chronological: `start_seconds` must be
/// non-decreasing across the sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptSegment {
    /// Offset from the start of the video, in seconds
    pub start_seconds: f64,
    /// Spoken text for this segment
    pub text: String,
}

/// The video input to a pipeline run.
///
/// Exactly one variant is populated per run. Created at upload time and
/// consumed read-only by every downstream stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum VideoReference {
    /// Handle to a file uploaded to the model provider's file store.
    /// The file may still be processing when the reference is created.
    #[serde(rename_all = "camelCase")]
    FileHandle { uri: String, mime_type: String },

    /// Cloud-storage URI (`scheme://bucket/path`) the model backend
    /// resolves itself; no processing poll needed.
    #[serde(rename_all = "camelCase")]
    CloudUri { uri: String, mime_type: String },

    /// Raw transcript; no model call needed to build context.
    Transcript { segments: Vec<TranscriptSegment> },
}

impl VideoReference {
    /// Validate structural invariants of the reference.
    ///
    /// File and cloud variants must carry a non-empty URI; transcript
    /// segments must be non-empty and chronologically ordered.
    pub fn validate(&self) -> Result<(), VideoReferenceError> {
        match self {
            VideoReference::FileHandle { uri, .. } | VideoReference::CloudUri { uri, .. } => {
                if uri.trim().is_empty() {
                    return Err(VideoReferenceError::EmptyUri);
                }
                Ok(())
            }
            VideoReference::Transcript { segments } => {
                if segments.is_empty() {
                    return Err(VideoReferenceError::EmptyTranscript);
                }
                let mut prev = f64::NEG_INFINITY;
                for seg in segments {
                    if !seg.start_seconds.is_finite() || seg.start_seconds < 0.0 {
                        return Err(VideoReferenceError::InvalidStart(seg.start_seconds));
                    }
                    if seg.start_seconds < prev {
                        return Err(VideoReferenceError::OutOfOrder {
                            prev,
                            next: seg.start_seconds,
                        });
                    }
                    prev = seg.start_seconds;
                }
                Ok(())
            }
        }
    }

    /// Kind discriminator string, matching the wire `kind` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            VideoReference::FileHandle { .. } => "fileHandle",
            VideoReference::CloudUri { .. } => "cloudUri",
            VideoReference::Transcript { .. } => "transcript",
        }
    }
}

/// Video reference validation error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum VideoReferenceError {
    #[error("video reference URI cannot be empty")]
    EmptyUri,

    #[error("transcript must contain at least one segment")]
    EmptyTranscript,

    #[error("invalid segment start time {0}")]
    InvalidStart(f64),

    #[error("transcript segments out of order: {next} follows {prev}")]
    OutOfOrder { prev: f64, next: f64 },
}
