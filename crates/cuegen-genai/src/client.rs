//! Gemini-style `generateContent` client.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{GenAiError, GenAiResult};
use crate::files::PollConfig;

/// Default public API host.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model fallback order.
const DEFAULT_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
    "gemini-2.5-pro",
];

/// Default cap on context text handed to a model call.
const DEFAULT_CONTEXT_CHAR_CAP: usize = 100_000;

/// GenAI backend configuration. Process-wide, read-only at runtime.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// API key for the generative-model backend
    pub api_key: String,
    /// Base URL (overridable for tests)
    pub base_url: String,
    /// Models tried in order until one succeeds
    pub models: Vec<String>,
    /// Per-request timeout for generate calls
    pub request_timeout: Duration,
    /// File processing-state poll bounds
    pub poll: PollConfig,
    /// Character cap applied to context text before model calls
    pub context_char_cap: usize,
}

impl GenAiConfig {
    /// Build config from environment variables.
    ///
    /// `GEMINI_API_KEY` is required; a missing key is a fatal
    /// configuration error surfaced to the user, never retried.
    pub fn from_env() -> GenAiResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| GenAiError::MissingConfig("GEMINI_API_KEY is not set".to_string()))?;

        let base_url = std::env::var("GENAI_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let models = std::env::var("GENAI_MODELS")
            .map(|s| {
                s.split(',')
                    .map(|m| m.trim().to_string())
                    .filter(|m| !m.is_empty())
                    .collect::<Vec<_>>()
            })
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_MODELS.iter().map(|m| m.to_string()).collect());

        let request_timeout = Duration::from_secs(
            std::env::var("GENAI_REQUEST_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(180),
        );

        let context_char_cap = std::env::var("GENAI_CONTEXT_CHAR_CAP")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_CONTEXT_CHAR_CAP);

        Ok(Self {
            api_key,
            base_url,
            models,
            request_timeout,
            poll: PollConfig::from_env(),
            context_char_cap,
        })
    }

    /// Config pointed at a test server, with fast poll bounds.
    pub fn for_tests(base_url: impl Into<String>) -> Self {
        Self {
            api_key: "test-key".to_string(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            models: vec!["test-model".to_string()],
            request_timeout: Duration::from_secs(5),
            poll: PollConfig::for_tests(),
            context_char_cap: DEFAULT_CONTEXT_CHAR_CAP,
        }
    }
}

/// One part of a `generateContent` request.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    FileData {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn file(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Part::FileData {
            file_data: FileData {
                file_uri: uri.into(),
                mime_type: mime_type.into(),
            },
        }
    }
}

/// Reference to a file the backend resolves itself (uploaded file
/// handle or cloud-storage URI).
#[derive(Debug, Clone, Serialize)]
pub struct FileData {
    #[serde(rename = "fileUri")]
    pub file_uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// Generative-model API client.
///
/// Holds one shared `reqwest::Client`; cheap to clone via `Arc` at the
/// call sites that share it.
pub struct GeminiClient {
    config: GenAiConfig,
    client: Client,
}

impl GeminiClient {
    pub fn new(config: GenAiConfig) -> GenAiResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GenAiConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &Client {
        &self.client
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.config.api_key
    }

    /// Run one generate call, trying each configured model in order
    /// until one succeeds.
    ///
    /// `json_output` asks the backend for a JSON response MIME type;
    /// callers still fence-strip and parse defensively since models do
    /// not always honor it.
    pub async fn generate(&self, parts: Vec<Part>, json_output: bool) -> GenAiResult<String> {
        let mut last_error = None;

        for model in &self.config.models {
            debug!(model, "attempting generate call");
            match self.generate_with_model(model, parts.clone(), json_output).await {
                Ok(text) => {
                    info!(model, chars = text.len(), "generate call succeeded");
                    return Ok(text);
                }
                Err(e) => {
                    warn!(model, error = %e, "generate call failed, trying next model");
                    last_error = Some(e);
                }
            }
        }

        Err(match last_error {
            Some(e) => GenAiError::AllModelsFailed(Box::new(e)),
            None => GenAiError::MissingConfig("no models configured".to_string()),
        })
    }

    async fn generate_with_model(
        &self,
        model: &str,
        parts: Vec<Part>,
        json_output: bool,
    ) -> GenAiResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.base_url, model, self.config.api_key
        );

        let request = GenerateRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            generation_config: json_output.then(|| GenerationConfig {
                response_mime_type: "application/json".to_string(),
            }),
        };

        let response = self.client.post(&url).json(&request).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::Api { status, body });
        }

        let body: GenerateResponse = response.json().await?;

        let text = body
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .filter(|t| !t.is_empty())
            .ok_or(GenAiError::EmptyResponse)?;

        Ok(text)
    }
}
