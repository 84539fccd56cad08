//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

use crate::handlers::{health, ready};
use crate::handlers::chapters::{post_generate_chapters, post_refine_chapters};
use crate::handlers::context::post_context;
use crate::handlers::metadata::post_metadata;
use crate::handlers::transcribe::post_transcribe;
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    // Pipeline stage routes, one request/response round trip per stage
    let stage_routes = Router::new()
        .route("/context", post(post_context))
        .route("/chapters/generate", post(post_generate_chapters))
        .route("/chapters/refine", post(post_refine_chapters))
        .route("/metadata", post(post_metadata))
        .route("/transcribe", post(post_transcribe));

    let rate_limiter = std::sync::Arc::new(RateLimiterCache::new(state.config.rate_limit_rps));

    // Slow upstreams get cut off with 408 rather than holding the
    // connection open indefinitely.
    let api_routes = stage_routes
        .layer(TimeoutLayer::new(state.config.request_timeout))
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
