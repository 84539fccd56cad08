//! Chapter Refiner.
//!
//! Two steps. Step A fans out one suggestion fetch per chapter title;
//! the calls run concurrently and are joined with results keyed by the
//! original chapter position, so output order is structurally input
//! order regardless of completion order. Step B sends the whole
//! enriched list to the model in one call and asks for a same-length,
//! same-order rewrite grounded in the suggestions.

use futures_util::future::join_all;
use metrics::counter;
use serde::Serialize;
use tracing::{info, warn};

use cuegen_genai::{parse_json_lenient, GeminiClient, Part};
use cuegen_models::Chapter;
use cuegen_suggest::SuggestClient;

use crate::chapters::RawChapter;
use crate::error::PipelineResult;
use crate::PARSE_FALLBACKS_TOTAL;

/// View of an enriched chapter as embedded in the rewrite prompt.
#[derive(Debug, Serialize)]
struct EnrichedChapter<'a> {
    time: &'a str,
    title: &'a str,
    suggestions: &'a [String],
}

fn build_rewrite_prompt(enriched: &[EnrichedChapter<'_>]) -> String {
    let chapters_json =
        serde_json::to_string_pretty(enriched).unwrap_or_else(|_| "[]".to_string());

    format!(
        r#"You are a YouTube chapter title editor. Below is a list of video chapters. Each entry has the original title and a list of real search-autocomplete suggestions related to it.

CHAPTERS:
{chapters_json}

Rewrite every title so that:
- Titles use consistent Title Case.
- Likely speech-to-text errors are corrected. When a suggestion is plausibly the correctly-spelled form of something in the title, treat the suggestion as ground truth for names and spelling.
- Trailing punctuation is removed.
- Meaning is preserved; do not invent content that is not in the original title.

IMPORTANT: You must strictly follow this output format.
Return ONLY a JSON array with exactly {count} entries, in the same order as the input, with this schema:
[
  {{"time": "0:00", "title": "Rewritten Title"}}
]"#,
        count = enriched.len()
    )
}

/// Refine chapter titles using autocomplete suggestions as grounding.
///
/// Suggestion fetches are best-effort (empty list on failure, per the
/// suggest client's policy); a rewrite parse failure or a cardinality
/// mismatch falls back to the original chapters, so input is never
/// lost. Rewritten titles are re-paired with the input `time` values,
/// making order and count structurally guaranteed.
pub async fn refine_chapters(
    genai: &GeminiClient,
    suggest: &SuggestClient,
    chapters: Vec<Chapter>,
) -> PipelineResult<Vec<Chapter>> {
    if chapters.is_empty() {
        return Ok(chapters);
    }

    // Step A: concurrent fan-out, one fetch per chapter. join_all
    // yields results in input order, which keys each suggestion list
    // to its chapter by position.
    let suggestion_sets: Vec<Vec<String>> =
        join_all(chapters.iter().map(|c| suggest.fetch(&c.title))).await;

    let enriched: Vec<Chapter> = chapters
        .into_iter()
        .zip(suggestion_sets)
        .map(|(c, suggestions)| Chapter {
            original_title: Some(c.title.clone()),
            suggestions: Some(suggestions),
            ..c
        })
        .collect();

    // Step B: single grounded rewrite call over the whole list.
    let prompt_view: Vec<EnrichedChapter<'_>> = enriched
        .iter()
        .map(|c| EnrichedChapter {
            time: &c.time,
            title: c.original_title.as_deref().unwrap_or(&c.title),
            suggestions: c.suggestions.as_deref().unwrap_or(&[]),
        })
        .collect();

    let text = genai
        .generate(vec![Part::text(build_rewrite_prompt(&prompt_view))], true)
        .await?;

    let rewritten = match parse_json_lenient::<Vec<RawChapter>>(&text) {
        Ok(raw) if raw.len() == enriched.len() => raw,
        Ok(raw) => {
            warn!(
                expected = enriched.len(),
                got = raw.len(),
                "rewrite cardinality mismatch, keeping original chapters"
            );
            counter!(PARSE_FALLBACKS_TOTAL, "stage" => "refine_chapters").increment(1);
            return Ok(enriched);
        }
        Err(e) => {
            warn!(error = %e, "rewrite output was not valid JSON, keeping original chapters");
            counter!(PARSE_FALLBACKS_TOTAL, "stage" => "refine_chapters").increment(1);
            return Ok(enriched);
        }
    };

    let refined: Vec<Chapter> = enriched
        .into_iter()
        .zip(rewritten)
        .map(|(original, raw)| Chapter {
            // Input times are authoritative; the model only supplies
            // the rewritten title.
            title: raw.title,
            ..original
        })
        .collect();

    info!(count = refined.len(), "refined chapter titles");
    Ok(refined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuegen_genai::GenAiConfig;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn envelope(query: &str, suggestions: &[&str]) -> String {
        let pairs: Vec<serde_json::Value> = suggestions
            .iter()
            .map(|s| serde_json::json!([s, 0]))
            .collect();
        format!(
            "window.google.ac.h({})",
            serde_json::json!([query, pairs])
        )
    }

    async fn mount_suggest(server: &MockServer, query: &str, suggestions: &[&str]) {
        Mock::given(method("GET"))
            .and(path("/complete/search"))
            .and(query_param("q", query))
            .respond_with(ResponseTemplate::new(200).set_body_string(envelope(query, suggestions)))
            .mount(server)
            .await;
    }

    async fn mount_rewrite(server: &MockServer, reply: &str) {
        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": reply}]}}]
            })))
            .mount(server)
            .await;
    }

    fn input_chapters() -> Vec<Chapter> {
        vec![
            Chapter::new("0:00", "nanobana 20"),
            Chapter::new("2:05", "pricing and plans"),
        ]
    }

    #[tokio::test]
    async fn suggestions_attach_to_the_right_chapter() {
        let server = MockServer::start().await;
        mount_suggest(&server, "nanobana 20", &["Nano Banana 2 review", "Nano Banana 2 tutorial"]).await;
        mount_suggest(&server, "pricing and plans", &["pricing and plans comparison"]).await;
        mount_rewrite(
            &server,
            r#"[{"time":"0:00","title":"Nano Banana 2"},{"time":"2:05","title":"Pricing and Plans"}]"#,
        )
        .await;

        let genai = GeminiClient::new(GenAiConfig::for_tests(server.uri())).unwrap();
        let suggest = SuggestClient::new(server.uri());

        let refined = refine_chapters(&genai, &suggest, input_chapters()).await.unwrap();

        assert_eq!(refined.len(), 2);
        assert_eq!(refined[0].title, "Nano Banana 2");
        assert_eq!(refined[0].original_title.as_deref(), Some("nanobana 20"));
        assert_eq!(
            refined[0].suggestions.as_deref().unwrap(),
            ["Nano Banana 2 review", "Nano Banana 2 tutorial"]
        );
        assert_eq!(
            refined[1].suggestions.as_deref().unwrap(),
            ["pricing and plans comparison"]
        );
    }

    #[tokio::test]
    async fn output_keeps_input_order_and_times() {
        let server = MockServer::start().await;
        mount_suggest(&server, "nanobana 20", &[]).await;
        mount_suggest(&server, "pricing and plans", &[]).await;
        // Model returns bogus times; input times must win.
        mount_rewrite(
            &server,
            r#"[{"time":"9:99","title":"First"},{"time":"8:88","title":"Second"}]"#,
        )
        .await;

        let genai = GeminiClient::new(GenAiConfig::for_tests(server.uri())).unwrap();
        let suggest = SuggestClient::new(server.uri());

        let refined = refine_chapters(&genai, &suggest, input_chapters()).await.unwrap();
        assert_eq!(refined[0].time, "0:00");
        assert_eq!(refined[0].title, "First");
        assert_eq!(refined[1].time, "2:05");
        assert_eq!(refined[1].title, "Second");
    }

    #[tokio::test]
    async fn cardinality_mismatch_keeps_originals() {
        let server = MockServer::start().await;
        mount_suggest(&server, "nanobana 20", &["s1"]).await;
        mount_suggest(&server, "pricing and plans", &[]).await;
        mount_rewrite(&server, r#"[{"time":"0:00","title":"Only One"}]"#).await;

        let genai = GeminiClient::new(GenAiConfig::for_tests(server.uri())).unwrap();
        let suggest = SuggestClient::new(server.uri());

        let refined = refine_chapters(&genai, &suggest, input_chapters()).await.unwrap();
        assert_eq!(refined.len(), 2);
        assert_eq!(refined[0].title, "nanobana 20");
        // Enrichment from step A is still attached.
        assert_eq!(refined[0].suggestions.as_deref().unwrap(), ["s1"]);
    }

    #[tokio::test]
    async fn parse_failure_keeps_originals() {
        let server = MockServer::start().await;
        mount_suggest(&server, "nanobana 20", &[]).await;
        mount_suggest(&server, "pricing and plans", &[]).await;
        mount_rewrite(&server, "no json here").await;

        let genai = GeminiClient::new(GenAiConfig::for_tests(server.uri())).unwrap();
        let suggest = SuggestClient::new(server.uri());

        let refined = refine_chapters(&genai, &suggest, input_chapters()).await.unwrap();
        assert_eq!(refined.len(), 2);
        assert_eq!(refined[0].title, "nanobana 20");
        assert_eq!(refined[1].title, "pricing and plans");
    }

    #[tokio::test]
    async fn failed_suggestion_fetches_degrade_to_empty_lists() {
        let server = MockServer::start().await;
        // Only the first chapter's query has a mock; the second 404s.
        mount_suggest(&server, "nanobana 20", &["s1"]).await;
        mount_rewrite(
            &server,
            r#"[{"time":"0:00","title":"A"},{"time":"2:05","title":"B"}]"#,
        )
        .await;

        let genai = GeminiClient::new(GenAiConfig::for_tests(server.uri())).unwrap();
        let suggest = SuggestClient::new(server.uri());

        let refined = refine_chapters(&genai, &suggest, input_chapters()).await.unwrap();
        assert_eq!(refined[0].suggestions.as_deref().unwrap(), ["s1"]);
        assert!(refined[1].suggestions.as_deref().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_input_returns_empty_without_any_calls() {
        // Unroutable endpoints: any call would error or hang.
        let genai = GeminiClient::new(GenAiConfig::for_tests("http://127.0.0.1:9")).unwrap();
        let suggest = SuggestClient::new("http://127.0.0.1:9");

        let refined = refine_chapters(&genai, &suggest, Vec::new()).await.unwrap();
        assert!(refined.is_empty());
    }
}
