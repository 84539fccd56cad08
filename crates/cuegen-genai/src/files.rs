//! Uploaded-file processing-state polling.
//!
//! File-handle uploads are processed asynchronously by the backend and
//! cannot be referenced by a generate call until they leave the
//! `PROCESSING` state. The poll is bounded: exhausting the attempt
//! budget maps to an upstream-unavailable failure instead of spinning
//! forever.

use std::time::Duration;

use serde::Deserialize;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::client::GeminiClient;
use crate::error::{GenAiError, GenAiResult};

/// Bounds for the processing-state poll.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay before the first retry; doubles each attempt.
    pub base_delay: Duration,
    /// Ceiling on the backoff delay.
    pub max_delay: Duration,
    /// Maximum number of state checks before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            max_attempts: 60,
        }
    }
}

impl PollConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_delay: std::env::var("GENAI_POLL_BASE_DELAY_MS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.base_delay),
            max_delay: defaults.max_delay,
            max_attempts: std::env::var("GENAI_POLL_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_attempts),
        }
    }

    pub fn for_tests() -> Self {
        Self {
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            max_attempts: 5,
        }
    }

    fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self
            .base_delay
            .saturating_mul(2u32.saturating_pow(attempt.min(16)));
        delay.min(self.max_delay)
    }
}

#[derive(Debug, Deserialize)]
struct FileMetadata {
    #[serde(default)]
    state: String,
}

impl GeminiClient {
    /// Poll a file handle until it becomes `ACTIVE`.
    ///
    /// `FAILED` state maps to [`GenAiError::ProcessingFailed`];
    /// exhausting the attempt bound maps to
    /// [`GenAiError::ProcessingTimeout`].
    pub async fn poll_file_active(&self, file_uri: &str) -> GenAiResult<()> {
        let poll = self.config().poll.clone();

        // Uploaded handles are absolute URLs; bare names resolve
        // against the configured base.
        let url = if file_uri.starts_with("http://") || file_uri.starts_with("https://") {
            format!("{}?key={}", file_uri, self.api_key())
        } else {
            format!(
                "{}/v1beta/{}?key={}",
                self.base_url(),
                file_uri.trim_start_matches('/'),
                self.api_key()
            )
        };

        for attempt in 0..poll.max_attempts {
            let response = self.http().get(&url).send().await?;

            if !response.status().is_success() {
                let status = response.status().as_u16();
                let body = response.text().await.unwrap_or_default();
                return Err(GenAiError::Api { status, body });
            }

            let metadata: FileMetadata = response.json().await?;

            match metadata.state.as_str() {
                "ACTIVE" => {
                    debug!(file_uri, attempt, "file is active");
                    return Ok(());
                }
                "FAILED" => {
                    warn!(file_uri, "file processing failed");
                    return Err(GenAiError::ProcessingFailed);
                }
                state => {
                    debug!(file_uri, state, attempt, "file still processing");
                    sleep(poll.delay_for_attempt(attempt)).await;
                }
            }
        }

        warn!(file_uri, attempts = poll.max_attempts, "file poll exhausted");
        Err(GenAiError::ProcessingTimeout {
            attempts: poll.max_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::GenAiConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state_body(state: &str) -> serde_json::Value {
        serde_json::json!({"name": "files/abc", "state": state})
    }

    #[tokio::test]
    async fn poll_returns_once_active() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(state_body("PROCESSING")))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(state_body("ACTIVE")))
            .mount(&server)
            .await;

        let client = GeminiClient::new(GenAiConfig::for_tests(server.uri())).unwrap();
        client.poll_file_active("files/abc").await.unwrap();
    }

    #[tokio::test]
    async fn poll_surfaces_failed_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/bad"))
            .respond_with(ResponseTemplate::new(200).set_body_json(state_body("FAILED")))
            .mount(&server)
            .await;

        let client = GeminiClient::new(GenAiConfig::for_tests(server.uri())).unwrap();
        let err = client.poll_file_active("files/bad").await.unwrap_err();
        assert!(matches!(err, GenAiError::ProcessingFailed));
    }

    #[tokio::test]
    async fn poll_times_out_after_attempt_bound() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1beta/files/slow"))
            .respond_with(ResponseTemplate::new(200).set_body_json(state_body("PROCESSING")))
            .mount(&server)
            .await;

        let client = GeminiClient::new(GenAiConfig::for_tests(server.uri())).unwrap();
        let err = client.poll_file_active("files/slow").await.unwrap_err();
        assert!(matches!(err, GenAiError::ProcessingTimeout { attempts: 5 }));
        assert!(err.is_upstream());
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let poll = PollConfig {
            base_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(30),
            max_attempts: 60,
        };
        assert_eq!(poll.delay_for_attempt(0), Duration::from_secs(2));
        assert_eq!(poll.delay_for_attempt(1), Duration::from_secs(4));
        assert_eq!(poll.delay_for_attempt(3), Duration::from_secs(16));
        assert_eq!(poll.delay_for_attempt(10), Duration::from_secs(30));
    }
}
