//! Autocomplete suggestion client.
//!
//! Fetches search-suggestion strings for a query from a public
//! autocomplete endpoint. The response arrives either wrapped in a
//! JavaScript callback envelope (`window.google.ac.h([...])`) or, in
//! some deployments, as a bare JSON array of the shape
//! `[query, [[suggestion, score], ...], ...]`.
//!
//! Failure policy: this call never fails the caller. Any network
//! error, non-200 status, or parse failure degrades to an empty list,
//! logged at warn.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

/// Default public autocomplete host.
const DEFAULT_BASE_URL: &str = "https://suggestqueries.google.com";

/// Callback envelope the upstream wraps its payload in.
const CALLBACK_PREFIX: &str = "window.google.ac.h(";

/// Autocomplete endpoint client.
pub struct SuggestClient {
    client: Client,
    base_url: String,
}

impl SuggestClient {
    /// Create a client against the default public host.
    ///
    /// `SUGGEST_BASE_URL` overrides the host (used by tests and
    /// self-hosted mirrors).
    pub fn from_env() -> Self {
        let base_url = std::env::var("SUGGEST_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        Self::new(base_url)
    }

    pub fn new(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch suggestions for one query, relevance-ordered by the
    /// upstream source. Infallible by policy: empty on any failure.
    pub async fn fetch(&self, query: &str) -> Vec<String> {
        if query.trim().is_empty() {
            return Vec::new();
        }

        let url = format!(
            "{}/complete/search?client=youtube&ds=yt&q={}",
            self.base_url,
            urlencoding::encode(query)
        );

        let body = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => match response.text().await {
                Ok(text) => text,
                Err(e) => {
                    warn!(query, error = %e, "failed to read suggestion response body");
                    return Vec::new();
                }
            },
            Ok(response) => {
                warn!(query, status = %response.status(), "suggestion endpoint returned error status");
                return Vec::new();
            }
            Err(e) => {
                warn!(query, error = %e, "suggestion request failed");
                return Vec::new();
            }
        };

        let suggestions = parse_suggest_response(&body);
        debug!(query, count = suggestions.len(), "fetched suggestions");
        suggestions
    }
}

/// Parse the autocomplete response body into suggestion strings.
///
/// Strips the callback envelope if present, parses the rest as JSON,
/// takes index 1 of the outer array, and maps each inner pair to its
/// first element. Anything malformed degrades to an empty list.
pub fn parse_suggest_response(body: &str) -> Vec<String> {
    let body = body.trim();

    let json_text = if let Some(rest) = body.strip_prefix(CALLBACK_PREFIX) {
        rest.strip_suffix(')').unwrap_or(rest)
    } else {
        body
    };

    let value: serde_json::Value = match serde_json::from_str(json_text) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "unparseable suggestion payload");
            return Vec::new();
        }
    };

    let Some(entries) = value.get(1).and_then(|v| v.as_array()) else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            // Entries are [suggestion, score] pairs; some deployments
            // emit bare strings.
            entry
                .get(0)
                .and_then(|s| s.as_str())
                .or_else(|| entry.as_str())
                .map(|s| s.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn parses_callback_envelope() {
        let body = r#"window.google.ac.h(["q",[["a",0],["b",0]]])"#;
        assert_eq!(parse_suggest_response(body), vec!["a", "b"]);
    }

    #[test]
    fn parses_bare_json_array() {
        let body = r#"["rust tutorial",[["rust tutorial for beginners",0],["rust tutorial 2024",0]]]"#;
        assert_eq!(
            parse_suggest_response(body),
            vec!["rust tutorial for beginners", "rust tutorial 2024"]
        );
    }

    #[test]
    fn parses_bare_string_entries() {
        let body = r#"["q",["a","b"]]"#;
        assert_eq!(parse_suggest_response(body), vec!["a", "b"]);
    }

    #[test]
    fn malformed_payload_degrades_to_empty() {
        assert!(parse_suggest_response("not json at all").is_empty());
        assert!(parse_suggest_response(r#"{"unexpected":"shape"}"#).is_empty());
        assert!(parse_suggest_response(r#"["only the query"]"#).is_empty());
    }

    #[tokio::test]
    async fn fetch_returns_suggestions_from_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/complete/search"))
            .and(query_param("client", "youtube"))
            .and(query_param("ds", "yt"))
            .and(query_param("q", "nano banana"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(r#"window.google.ac.h(["nano banana",[["nano banana 2 review",0],["nano banana 2 tutorial",0]]])"#),
            )
            .mount(&server)
            .await;

        let client = SuggestClient::new(server.uri());
        let got = client.fetch("nano banana").await;
        assert_eq!(got, vec!["nano banana 2 review", "nano banana 2 tutorial"]);

        // Idempotent against a stable upstream
        assert_eq!(client.fetch("nano banana").await, got);
    }

    #[tokio::test]
    async fn fetch_degrades_on_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = SuggestClient::new(server.uri());
        assert!(client.fetch("anything").await.is_empty());
    }

    #[tokio::test]
    async fn fetch_skips_empty_queries() {
        // No server: an empty query must not hit the network at all.
        let client = SuggestClient::new("http://127.0.0.1:9");
        assert!(client.fetch("   ").await.is_empty());
    }
}
