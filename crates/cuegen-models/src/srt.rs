//! SubRip (SRT) subtitle cues.
//!
//! The transcription stage asks the model for SRT text directly; this
//! module provides the cue model, rendering, and a parser used to check
//! that output against the format standard subtitle players expect:
//! sequential cue numbers from 1, `HH:MM:SS,mmm --> HH:MM:SS,mmm`
//! timestamp lines, and 1-3 lines of text per cue.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recommended maximum characters per subtitle line.
pub const RECOMMENDED_LINE_LENGTH: usize = 42;

/// One subtitle cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrtCue {
    /// Sequential cue number, starting at 1
    pub index: u32,
    /// Cue start time
    pub start: Duration,
    /// Cue end time
    pub end: Duration,
    /// Cue text, 1-3 lines
    pub text: String,
}

impl SrtCue {
    pub fn new(index: u32, start: Duration, end: Duration, text: impl Into<String>) -> Self {
        Self {
            index,
            start,
            end,
            text: text.into().trim().to_string(),
        }
    }
}

impl fmt::Display for SrtCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\n{} --> {}\n{}\n",
            self.index,
            format_srt_timestamp(self.start),
            format_srt_timestamp(self.end),
            self.text
        )
    }
}

/// Format a duration as an SRT timestamp (`HH:MM:SS,mmm`).
pub fn format_srt_timestamp(d: Duration) -> String {
    let total_ms = d.as_millis();
    let hours = total_ms / 3_600_000;
    let mins = (total_ms % 3_600_000) / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, mins, secs, millis)
}

/// Render cues as a complete SRT document.
pub fn render_srt(cues: &[SrtCue]) -> String {
    let mut out = String::new();
    for cue in cues {
        out.push_str(&cue.to_string());
        out.push('\n');
    }
    out
}

/// Parse SRT text into cues, validating the format contract.
///
/// Checks cue numbering (sequential from 1), timestamp shape, start
/// before end, and 1-3 lines of text per cue.
pub fn parse_srt(input: &str) -> Result<Vec<SrtCue>, SrtError> {
    let mut cues = Vec::new();

    for block in input.replace("\r\n", "\n").split("\n\n") {
        let block = block.trim();
        if block.is_empty() {
            continue;
        }

        let mut lines = block.lines();
        let index_line = lines.next().ok_or(SrtError::TruncatedCue)?;
        let index: u32 = index_line
            .trim()
            .parse()
            .map_err(|_| SrtError::InvalidCueNumber(index_line.to_string()))?;

        let expected = cues.len() as u32 + 1;
        if index != expected {
            return Err(SrtError::NonSequentialCue { expected, found: index });
        }

        let ts_line = lines.next().ok_or(SrtError::TruncatedCue)?;
        let (start_raw, end_raw) = ts_line
            .split_once(" --> ")
            .ok_or_else(|| SrtError::InvalidTimestampLine(ts_line.to_string()))?;
        let start = parse_srt_timestamp(start_raw.trim())?;
        let end = parse_srt_timestamp(end_raw.trim())?;
        if end <= start {
            return Err(SrtError::EndNotAfterStart { index });
        }

        let text_lines: Vec<&str> = lines.collect();
        if text_lines.is_empty() || text_lines.len() > 3 {
            return Err(SrtError::BadTextLineCount {
                index,
                lines: text_lines.len(),
            });
        }

        cues.push(SrtCue::new(index, start, end, text_lines.join("\n")));
    }

    Ok(cues)
}

fn parse_srt_timestamp(ts: &str) -> Result<Duration, SrtError> {
    let bad = || SrtError::InvalidTimestamp(ts.to_string());

    let (clock, millis_raw) = ts.split_once(',').ok_or_else(bad)?;
    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() != 3 {
        return Err(bad());
    }

    let hours: u64 = parts[0].parse().map_err(|_| bad())?;
    let mins: u64 = parts[1].parse().map_err(|_| bad())?;
    let secs: u64 = parts[2].parse().map_err(|_| bad())?;
    let millis: u64 = millis_raw.parse().map_err(|_| bad())?;
    if mins >= 60 || secs >= 60 || millis >= 1000 || millis_raw.len() != 3 {
        return Err(bad());
    }

    Ok(Duration::from_millis(
        hours * 3_600_000 + mins * 60_000 + secs * 1000 + millis,
    ))
}

/// SRT parse/validation error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SrtError {
    #[error("cue block is truncated")]
    TruncatedCue,

    #[error("invalid cue number '{0}'")]
    InvalidCueNumber(String),

    #[error("cue numbers must be sequential: expected {expected}, found {found}")]
    NonSequentialCue { expected: u32, found: u32 },

    #[error("invalid timestamp line '{0}'")]
    InvalidTimestampLine(String),

    #[error("invalid SRT timestamp '{0}'")]
    InvalidTimestamp(String),

    #[error("cue {index} end time is not after start time")]
    EndNotAfterStart { index: u32 },

    #[error("cue {index} has {lines} text lines, expected 1-3")]
    BadTextLineCount { index: u32, lines: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_formatting() {
        assert_eq!(format_srt_timestamp(Duration::ZERO), "00:00:00,000");
        assert_eq!(
            format_srt_timestamp(Duration::from_millis(3_661_042)),
            "01:01:01,042"
        );
    }

    #[test]
    fn render_and_parse_round_trip() {
        let cues = vec![
            SrtCue::new(1, Duration::ZERO, Duration::from_millis(2500), "Hello"),
            SrtCue::new(
                2,
                Duration::from_millis(2500),
                Duration::from_millis(6000),
                "Welcome to the demo\nof the product",
            ),
        ];
        let rendered = render_srt(&cues);
        let parsed = parse_srt(&rendered).unwrap();
        assert_eq!(parsed, cues);
    }

    #[test]
    fn parse_rejects_non_sequential_numbering() {
        let input = "1\n00:00:00,000 --> 00:00:01,000\na\n\n3\n00:00:01,000 --> 00:00:02,000\nb\n";
        assert!(matches!(
            parse_srt(input),
            Err(SrtError::NonSequentialCue { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn parse_rejects_reversed_cue_times() {
        let input = "1\n00:00:05,000 --> 00:00:01,000\na\n";
        assert!(matches!(
            parse_srt(input),
            Err(SrtError::EndNotAfterStart { index: 1 })
        ));
    }

    #[test]
    fn parse_rejects_too_many_text_lines() {
        let input = "1\n00:00:00,000 --> 00:00:01,000\na\nb\nc\nd\n";
        assert!(matches!(
            parse_srt(input),
            Err(SrtError::BadTextLineCount { index: 1, lines: 4 })
        ));
    }

    #[test]
    fn parse_handles_crlf_input() {
        let input = "1\r\n00:00:00,000 --> 00:00:01,000\r\nHello\r\n\r\n";
        let cues = parse_srt(input).unwrap();
        assert_eq!(cues.len(), 1);
        assert_eq!(cues[0].text, "Hello");
    }

    #[test]
    fn empty_input_parses_to_no_cues() {
        assert!(parse_srt("").unwrap().is_empty());
    }
}
