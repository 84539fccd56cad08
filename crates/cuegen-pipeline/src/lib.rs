//! The multi-stage AI refinement pipeline.
//!
//! Stage order is driven by the client; each function here is one
//! stateless request/response stage:
//!
//! 1. [`extract_context`] — video reference → textual context
//! 2. [`generate_chapters`] — context → raw chapters
//! 3. [`refine_chapters`] — raw chapters → suggestion-grounded rewrite
//! 4. [`synthesize_metadata`] — context + titles → SEO metadata
//! 5. [`transcribe`] — video reference → transcript + SRT
//!
//! Stages with a safe degraded value (empty chapters, unrefined
//! chapters, raw-text metadata) swallow model parse failures and log
//! them; stages without one propagate [`PipelineError`].

pub mod chapters;
pub mod context;
pub mod error;
pub mod metadata;
pub mod refine;
pub mod transcribe;

pub use chapters::generate_chapters;
pub use context::extract_context;
pub use error::{PipelineError, PipelineResult};
pub use metadata::synthesize_metadata;
pub use refine::refine_chapters;
pub use transcribe::{transcribe, Transcription};

/// Counter incremented whenever a stage degrades on a model parse
/// failure instead of surfacing it. Labeled by stage.
pub(crate) const PARSE_FALLBACKS_TOTAL: &str = "cuegen_parse_fallbacks_total";
