//! Video context extraction handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use cuegen_models::VideoReference;
use cuegen_pipeline::extract_context;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validate::validate_reference;

/// Response carrying the extracted context text.
#[derive(Serialize)]
pub struct ContextResponse {
    pub context: String,
}

/// Extract the textual context for a video reference.
///
/// Transcript references are joined locally; file and cloud references
/// go through the model backend. This is the first server round trip
/// of a pipeline run.
pub async fn post_context(
    State(state): State<AppState>,
    Json(reference): Json<VideoReference>,
) -> ApiResult<Json<ContextResponse>> {
    validate_reference(&reference).map_err(ApiError::bad_request)?;

    let context = extract_context(&state.genai, &reference).await?;

    info!(kind = reference.kind(), chars = context.len(), "context extracted");
    Ok(Json(ContextResponse { context }))
}
