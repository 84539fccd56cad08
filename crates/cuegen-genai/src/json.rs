//! Model-output JSON handling.
//!
//! Every stage that asks the model for JSON goes through the same
//! steps: strip any markdown code fence the model wrapped the payload
//! in, then parse. Callers pick their own fallback when parsing fails.

use serde::de::DeserializeOwned;

/// Strip a wrapping markdown code fence, if present.
///
/// Handles ` ```json `, bare ` ``` ` openers, and a trailing ` ``` `.
/// Text without fences is returned trimmed.
pub fn strip_code_fences(text: &str) -> &str {
    let text = text.trim();

    let text = if let Some(rest) = text.strip_prefix("```json") {
        rest
    } else if let Some(rest) = text.strip_prefix("```") {
        rest
    } else {
        text
    };

    let text = text.strip_suffix("```").unwrap_or(text);
    text.trim()
}

/// Strip fences and parse the remaining text as JSON.
pub fn parse_json_lenient<T: DeserializeOwned>(text: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(strip_code_fences(text))
}
