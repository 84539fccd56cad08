//! Generative-model HTTP client.
//!
//! A thin `generateContent` client with ordered model fallback, file
//! processing-state polling, and the shared "strip fences, parse JSON,
//! fall back" helper every pipeline stage uses.

pub mod client;
pub mod error;
pub mod files;
pub mod json;

pub use client::{GenAiConfig, GeminiClient, Part};
pub use error::{GenAiError, GenAiResult};
pub use files::PollConfig;
pub use json::{parse_json_lenient, strip_code_fences};
