//! Video Context Extractor.
//!
//! Produces the textual description of video content every later model
//! call is grounded on: a verbatim transcript join for transcript
//! references, or a model-generated scene log for file and cloud
//! references.

use tracing::{info, warn};

use cuegen_genai::{GeminiClient, Part};
use cuegen_models::VideoReference;

use crate::error::PipelineResult;

/// Extraction prompt for file-backed references.
const EXTRACTION_PROMPT: &str = "\
Watch this video and produce a chronological, timestamped log of its \
content. For each notable moment include the timestamp in seconds, what \
is happening on screen, the topic being discussed, and any significant \
spoken lines (paraphrased is fine). Cover the entire video from start to \
finish. Plain text, one moment per line, no markdown.";

/// Extract the context text for a video reference.
///
/// Transcript references are joined locally with no model call. File
/// handles are polled to `ACTIVE` first; cloud URIs go straight to the
/// model, which resolves them itself. The result is capped at the
/// configured character limit before being handed to later stages,
/// which silently drops tail content for very long videos.
pub async fn extract_context(genai: &GeminiClient, reference: &VideoReference) -> PipelineResult<String> {
    reference.validate()?;

    let text = match reference {
        VideoReference::Transcript { segments } => segments
            .iter()
            .map(|s| format!("[{}s] {}", s.start_seconds, s.text))
            .collect::<Vec<_>>()
            .join("\n"),

        VideoReference::FileHandle { uri, mime_type } => {
            genai.poll_file_active(uri).await?;
            genai
                .generate(
                    vec![Part::file(uri, mime_type), Part::text(EXTRACTION_PROMPT)],
                    false,
                )
                .await?
        }

        VideoReference::CloudUri { uri, mime_type } => {
            genai
                .generate(
                    vec![Part::file(uri, mime_type), Part::text(EXTRACTION_PROMPT)],
                    false,
                )
                .await?
        }
    };

    let capped = truncate_chars(&text, genai.config().context_char_cap);
    if capped.len() < text.len() {
        warn!(
            original_chars = text.chars().count(),
            cap = genai.config().context_char_cap,
            "context truncated to fit model input limits"
        );
    }
    info!(kind = reference.kind(), chars = capped.len(), "extracted video context");

    Ok(capped)
}

/// Truncate to at most `cap` characters, respecting char boundaries.
pub(crate) fn truncate_chars(text: &str, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cuegen_genai::GenAiConfig;
    use cuegen_models::{TranscriptSegment, VideoReference};
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn transcript_ref() -> VideoReference {
        VideoReference::Transcript {
            segments: vec![
                TranscriptSegment {
                    start_seconds: 0.0,
                    text: "Hello".to_string(),
                },
                TranscriptSegment {
                    start_seconds: 125.0,
                    text: "Welcome to the demo".to_string(),
                },
            ],
        }
    }

    async fn test_client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(GenAiConfig::for_tests(server.uri())).unwrap()
    }

    #[tokio::test]
    async fn transcript_context_joins_segments_without_model_call() {
        // Unroutable server: any network call would fail the test.
        let client = GeminiClient::new(GenAiConfig::for_tests("http://127.0.0.1:9")).unwrap();
        let context = extract_context(&client, &transcript_ref()).await.unwrap();
        assert_eq!(context, "[0s] Hello\n[125s] Welcome to the demo");
    }

    #[tokio::test]
    async fn file_handle_polls_then_generates() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/vid1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"state": "ACTIVE"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .and(body_string_contains("files/vid1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "[0s] intro scene"}]}}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let reference = VideoReference::FileHandle {
            uri: "files/vid1".to_string(),
            mime_type: "video/mp4".to_string(),
        };
        let context = extract_context(&client, &reference).await.unwrap();
        assert_eq!(context, "[0s] intro scene");
    }

    #[tokio::test]
    async fn cloud_uri_skips_polling() {
        let server = MockServer::start().await;
        // No GET mock mounted: a poll attempt would 404 and error out.
        Mock::given(method("POST"))
            .and(path("/v1beta/models/test-model:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": "scene log"}]}}]
            })))
            .mount(&server)
            .await;

        let client = test_client(&server).await;
        let reference = VideoReference::CloudUri {
            uri: "gs://bucket/video.mp4".to_string(),
            mime_type: "video/mp4".to_string(),
        };
        assert_eq!(extract_context(&client, &reference).await.unwrap(), "scene log");
    }

    #[tokio::test]
    async fn invalid_reference_is_rejected() {
        let client = GeminiClient::new(GenAiConfig::for_tests("http://127.0.0.1:9")).unwrap();
        let reference = VideoReference::Transcript { segments: vec![] };
        assert!(extract_context(&client, &reference).await.is_err());
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("🚀🚀🚀", 1), "🚀");
    }
}
