//! Chapter Generator.

use metrics::counter;
use serde::Deserialize;
use tracing::{info, warn};

use cuegen_genai::{parse_json_lenient, GeminiClient, Part};
use cuegen_models::Chapter;

use crate::error::PipelineResult;
use crate::PARSE_FALLBACKS_TOTAL;

/// Bare `{time, title}` pair as the model is asked to emit it.
/// Kept separate from [`Chapter`] so model output cannot smuggle in
/// enrichment fields.
#[derive(Debug, Deserialize)]
pub(crate) struct RawChapter {
    pub time: String,
    pub title: String,
}

fn build_chapter_prompt(context: &str) -> String {
    format!(
        r#"You are a YouTube chapter editor. Based on the video content log below, produce chapter markers covering the whole video chronologically.

VIDEO CONTENT:
{context}

Rules:
- The first chapter starts at the beginning of the video.
- Chapters are in strictly increasing time order and cover the full video.
- Timestamps under one hour use M:SS or MM:SS (no hour component, minutes not zero-padded below ten). From one hour upward use H:MM:SS.
- Titles are short, concrete, and descriptive.

IMPORTANT: You must strictly follow this output format.
Return ONLY a JSON array with this schema:
[
  {{"time": "0:00", "title": "Chapter title"}}
]"#
    )
}

/// Generate raw chapters from the context text.
///
/// A model-call failure propagates (upstream unavailable); a parse
/// failure degrades to an empty chapter list, logged and counted.
pub async fn generate_chapters(genai: &GeminiClient, context: &str) -> PipelineResult<Vec<Chapter>> {
    let prompt = build_chapter_prompt(context);
    let text = genai.generate(vec![Part::text(prompt)], true).await?;

    let chapters = match parse_json_lenient::<Vec<RawChapter>>(&text) {
        Ok(raw) => raw
            .into_iter()
            .map(|c| Chapter::new(c.time, c.title))
            .collect(),
        Err(e) => {
            warn!(error = %e, "chapter output was not valid JSON, degrading to no chapters");
            counter!(PARSE_FALLBACKS_TOTAL, "stage" => "generate_chapters").increment(1);
            Vec::new()
        }
    };

    info!(count = chapters.len(), "generated chapters");
    Ok(chapters)
}
