//! Transcription Service.
//!
//! Independent sibling of the chapter pipeline: one model call that
//! returns a verbatim transcript plus SubRip subtitles. Transcript
//! references skip the model entirely: the transcript is already in
//! hand, and cues are built deterministically from the segments.

use std::time::Duration;

use metrics::counter;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use cuegen_genai::{parse_json_lenient, GeminiClient, Part};
use cuegen_models::srt::{parse_srt, render_srt, SrtCue, RECOMMENDED_LINE_LENGTH};
use cuegen_models::{TranscriptSegment, VideoReference};

use crate::error::PipelineResult;
use crate::PARSE_FALLBACKS_TOTAL;

/// Display duration for the final cue, which has no successor to end it.
const LAST_CUE_SECONDS: f64 = 3.0;

/// Transcript + subtitles for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transcription {
    /// Verbatim transcript text
    pub transcript: String,
    /// SubRip subtitle document; empty when unavailable
    pub srt: String,
}

const TRANSCRIBE_PROMPT: &str = "\
Transcribe this video verbatim. Then convert the transcript into SubRip \
(SRT) subtitles: sequential cue numbers starting at 1, timestamp lines \
formatted HH:MM:SS,mmm --> HH:MM:SS,mmm, 1-3 lines of text per cue, and \
at most about 42 characters per line.

IMPORTANT: You must strictly follow this output format.
Return ONLY a JSON object with this schema:
{\"transcript\": \"full transcript text\", \"srt\": \"1\\n00:00:00,000 --> 00:00:02,000\\n...\"}";

/// Transcribe a video reference.
///
/// Parse failure degrades to the raw model text as the transcript with
/// an empty SRT string. SRT that comes back structurally invalid is
/// also dropped to empty rather than shipped to subtitle players.
pub async fn transcribe(genai: &GeminiClient, reference: &VideoReference) -> PipelineResult<Transcription> {
    reference.validate()?;

    let parts = match reference {
        VideoReference::Transcript { segments } => {
            return Ok(transcription_from_segments(segments));
        }
        VideoReference::FileHandle { uri, mime_type } => {
            genai.poll_file_active(uri).await?;
            vec![Part::file(uri, mime_type), Part::text(TRANSCRIBE_PROMPT)]
        }
        VideoReference::CloudUri { uri, mime_type } => {
            vec![Part::file(uri, mime_type), Part::text(TRANSCRIBE_PROMPT)]
        }
    };

    let text = genai.generate(parts, true).await?;

    let mut result = match parse_json_lenient::<Transcription>(&text) {
        Ok(t) => t,
        Err(e) => {
            warn!(error = %e, "transcription output was not valid JSON, returning raw text");
            counter!(PARSE_FALLBACKS_TOTAL, "stage" => "transcribe").increment(1);
            return Ok(Transcription {
                transcript: text,
                srt: String::new(),
            });
        }
    };

    if !result.srt.is_empty() {
        if let Err(e) = parse_srt(&result.srt) {
            warn!(error = %e, "model SRT failed validation, dropping subtitles");
            counter!(PARSE_FALLBACKS_TOTAL, "stage" => "transcribe_srt").increment(1);
            result.srt = String::new();
        }
    }

    info!(
        transcript_chars = result.transcript.len(),
        has_srt = !result.srt.is_empty(),
        "transcribed video"
    );
    Ok(result)
}

/// Build a transcription deterministically from transcript segments.
///
/// Each segment becomes one cue ending where the next begins; the
/// final cue gets a fixed display duration. Long lines are wrapped at
/// the recommended subtitle width.
fn transcription_from_segments(segments: &[TranscriptSegment]) -> Transcription {
    // SubRip requires at least one text line per cue, so segments with
    // blank text carry no cue (or transcript line) at all.
    let spoken: Vec<&TranscriptSegment> = segments
        .iter()
        .filter(|s| !s.text.trim().is_empty())
        .collect();

    let transcript = spoken
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n");

    let cues: Vec<SrtCue> = spoken
        .iter()
        .enumerate()
        .map(|(i, seg)| {
            let start = Duration::from_secs_f64(seg.start_seconds);
            let end_seconds = spoken
                .get(i + 1)
                .map(|next| next.start_seconds)
                .unwrap_or(seg.start_seconds + LAST_CUE_SECONDS)
                .max(seg.start_seconds + 0.001);
            SrtCue::new(
                i as u32 + 1,
                start,
                Duration::from_secs_f64(end_seconds),
                wrap_cue_text(&seg.text),
            )
        })
        .collect();

    Transcription {
        transcript,
        srt: render_srt(&cues),
    }
}

/// Greedy word wrap onto at most 3 lines of ~42 chars.
fn wrap_cue_text(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > RECOMMENDED_LINE_LENGTH {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }

    // Cues cap at 3 lines; overflow folds into the last line.
    if lines.len() > 3 {
        let tail = lines.split_off(2).join(" ");
        lines.push(tail);
    }

    lines.join("\n")
}
