//! Shared data models for the cuegen backend.
//!
//! This crate provides Serde-serializable types for:
//! - Video references (file handle, cloud URI, or raw transcript)
//! - Chapters and the display-timestamp format contract
//! - Synthesized video metadata (titles, thumbnails, description, tags)
//! - SubRip subtitle cues
//! - The client-side pipeline state machine

pub mod chapter;
pub mod metadata;
pub mod srt;
pub mod state_machine;
pub mod timestamp;
pub mod video;

// Re-export common types
pub use chapter::Chapter;
pub use metadata::{VideoMetadata, DESCRIPTION_PREFIX, TITLE_VARIANT_COUNT};
pub use srt::{parse_srt, SrtCue, SrtError};
pub use state_machine::{PipelineEvent, PipelineState};
pub use timestamp::{format_offset, parse_offset, OffsetError};
pub use video::{TranscriptSegment, VideoReference, VideoReferenceError};
