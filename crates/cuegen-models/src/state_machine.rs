//! Client pipeline state machine.
//!
//! The client drives the pipeline one stage per request and holds all
//! intermediate state; these types make the stage progression an
//! explicit enum with a single transition function instead of ad hoc
//! flags.

use serde::{Deserialize, Serialize};

/// Where a pipeline run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// No run in progress
    #[default]
    Idle,
    /// Video is being uploaded / the file handle is processing
    Uploading,
    /// Context extraction and chapter generation in flight
    Analyzing,
    /// Chapter refinement in flight
    Optimizing,
    /// Metadata synthesis in flight
    Metadata,
    /// Run finished, all assets available
    Done,
    /// Run ended with a hard (non-degradable) failure
    Failed,
}

/// Stage-completion events that move a run forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineEvent {
    Start,
    UploadReady,
    ChaptersGenerated,
    ChaptersRefined,
    MetadataReady,
    HardFailure,
    Reset,
}

impl PipelineState {
    /// The single transition function.
    ///
    /// Returns the next state, or `None` if the event is not legal in
    /// the current state (callers treat that as a client bug, not a
    /// recoverable condition).
    pub fn advance(self, event: PipelineEvent) -> Option<PipelineState> {
        use PipelineEvent::*;
        use PipelineState::*;

        match (self, event) {
            (_, Reset) => Some(Idle),
            (_, HardFailure) => Some(Failed),
            (Idle, Start) => Some(Uploading),
            (Uploading, UploadReady) => Some(Analyzing),
            (Analyzing, ChaptersGenerated) => Some(Optimizing),
            (Optimizing, ChaptersRefined) => Some(Metadata),
            (Metadata, MetadataReady) => Some(Done),
            _ => None,
        }
    }

    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, PipelineState::Done | PipelineState::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PipelineEvent::*;
    use PipelineState::*;

    #[test]
    fn happy_path_walks_every_stage() {
        let mut state = PipelineState::default();
        for (event, expected) in [
            (Start, Uploading),
            (UploadReady, Analyzing),
            (ChaptersGenerated, Optimizing),
            (ChaptersRefined, Metadata),
            (MetadataReady, Done),
        ] {
            state = state.advance(event).unwrap();
            assert_eq!(state, expected);
        }
        assert!(state.is_terminal());
    }

    #[test]
    fn hard_failure_is_reachable_from_any_stage() {
        for state in [Idle, Uploading, Analyzing, Optimizing, Metadata, Done] {
            assert_eq!(state.advance(HardFailure), Some(Failed));
        }
    }

    #[test]
    fn reset_always_returns_to_idle() {
        assert_eq!(Failed.advance(Reset), Some(Idle));
        assert_eq!(Done.advance(Reset), Some(Idle));
        assert_eq!(Analyzing.advance(Reset), Some(Idle));
    }

    #[test]
    fn out_of_order_events_are_rejected() {
        assert_eq!(Idle.advance(MetadataReady), None);
        assert_eq!(Uploading.advance(ChaptersRefined), None);
        assert_eq!(Done.advance(Start), None);
    }
}
