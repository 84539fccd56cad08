//! Axum HTTP API server.
//!
//! This crate exposes each pipeline stage as a stateless
//! request/response endpoint:
//! - Video context extraction
//! - Chapter generation and suggestion-grounded refinement
//! - SEO metadata synthesis
//! - Transcription with SubRip output
//!
//! Plus health/readiness probes, Prometheus metrics, per-IP rate
//! limiting, and security headers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod validate;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
