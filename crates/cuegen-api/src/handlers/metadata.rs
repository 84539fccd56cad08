//! Metadata synthesis handler.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

use cuegen_models::VideoMetadata;
use cuegen_pipeline::synthesize_metadata;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validate::{sanitize_string, MAX_CONTEXT_LENGTH};

/// Request to synthesize SEO metadata.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataRequest {
    /// Video context or transcript text
    pub context: String,
    /// Refined chapter titles, in order
    #[serde(default)]
    pub chapter_titles: Vec<String>,
}

/// Synthesize titles, thumbnail texts, description, and tags.
pub async fn post_metadata(
    State(state): State<AppState>,
    Json(request): Json<MetadataRequest>,
) -> ApiResult<Json<VideoMetadata>> {
    if request.context.trim().is_empty() {
        return Err(ApiError::bad_request("context must not be empty"));
    }
    let context = sanitize_string(&request.context, MAX_CONTEXT_LENGTH);

    let metadata = synthesize_metadata(
        &state.genai,
        &state.suggest,
        &context,
        &request.chapter_titles,
    )
    .await?;

    info!(titles = metadata.video_titles.len(), "metadata synthesized");
    Ok(Json(metadata))
}
