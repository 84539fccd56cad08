//! Metadata Synthesizer.

use futures_util::future::join_all;
use metrics::counter;
use tracing::{info, warn};

use cuegen_genai::{parse_json_lenient, GeminiClient, Part};
use cuegen_models::{VideoMetadata, DESCRIPTION_PREFIX, TITLE_VARIANT_COUNT};
use cuegen_suggest::SuggestClient;

use crate::context::truncate_chars;
use crate::error::PipelineResult;
use crate::PARSE_FALLBACKS_TOTAL;

/// How many chapter titles are seeded with autocomplete suggestions.
/// A sampling/cost tradeoff: the first titles carry the video's main
/// topics, and each seed is one upstream round trip.
const SUGGESTION_SEED_COUNT: usize = 5;

fn build_metadata_prompt(context: &str, titles: &[String], seeds: &[(String, Vec<String>)]) -> String {
    let titles_json = serde_json::to_string(titles).unwrap_or_else(|_| "[]".to_string());

    let mut seed_block = String::new();
    for (title, suggestions) in seeds {
        if suggestions.is_empty() {
            continue;
        }
        seed_block.push_str(&format!("- \"{}\": {}\n", title, suggestions.join(", ")));
    }
    if seed_block.is_empty() {
        seed_block.push_str("(none available)\n");
    }

    format!(
        r#"You are a YouTube SEO specialist. Using the video content and chapter titles below, produce publishing metadata for the video.

VIDEO CONTENT:
{context}

CHAPTER TITLES:
{titles_json}

REAL SEARCH SUGGESTIONS (phrases people actually search for, use them to pick keywords):
{seed_block}

Requirements:
- {variants} video title options, each under 70 characters, keyword-rich.
- {variants} thumbnail text options, each 5 words or fewer, punchy.
- One description. It MUST begin with this exact block, verbatim and unmodified:
{prefix}
  After the block, write a strong opening hook, a short summary of the video, and a bullet list of what viewers will learn. Plain text only: no markdown bold, use hyphens for bullets.
- One comma-separated tag string of 15-20 tags mixing broad and specific keywords.

IMPORTANT: You must strictly follow this output format.
Return ONLY a JSON object with this schema:
{{
  "videoTitles": ["..."],
  "thumbnailTitles": ["..."],
  "description": "...",
  "tags": "tag one, tag two"
}}"#,
        variants = TITLE_VARIANT_COUNT,
        prefix = DESCRIPTION_PREFIX
    )
}

/// Synthesize SEO metadata from the context and refined chapter titles.
///
/// The first few titles are seeded with autocomplete suggestions
/// (concurrently, best-effort). A parse failure degrades to a
/// [`VideoMetadata::degraded`] value carrying the raw model text;
/// either way the description-prefix contract is enforced
/// structurally.
pub async fn synthesize_metadata(
    genai: &GeminiClient,
    suggest: &SuggestClient,
    context: &str,
    titles: &[String],
) -> PipelineResult<VideoMetadata> {
    let seed_titles: Vec<&String> = titles.iter().take(SUGGESTION_SEED_COUNT).collect();
    let seed_results = join_all(seed_titles.iter().map(|t| suggest.fetch(t))).await;
    let seeds: Vec<(String, Vec<String>)> = seed_titles
        .into_iter()
        .cloned()
        .zip(seed_results)
        .collect();

    let capped = truncate_chars(context, genai.config().context_char_cap);
    let prompt = build_metadata_prompt(&capped, titles, &seeds);
    let text = genai.generate(vec![Part::text(prompt)], true).await?;

    let metadata = match parse_json_lenient::<VideoMetadata>(&text) {
        Ok(m) => m.with_enforced_prefix(),
        Err(e) => {
            warn!(error = %e, "metadata output was not valid JSON, returning degraded value");
            counter!(PARSE_FALLBACKS_TOTAL, "stage" => "synthesize_metadata").increment(1);
            VideoMetadata::degraded(text)
        }
    };

    info!(
        titles = metadata.video_titles.len(),
        thumbnails = metadata.thumbnail_titles.len(),
        "synthesized video metadata"
    );
    Ok(metadata)
}
