//! Chapter generation and refinement handlers.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use cuegen_models::Chapter;
use cuegen_pipeline::{generate_chapters, refine_chapters};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validate::{sanitize_string, MAX_CHAPTER_COUNT, MAX_CONTEXT_LENGTH};

/// Request to generate chapters from context text.
#[derive(Debug, Deserialize)]
pub struct GenerateChaptersRequest {
    pub context: String,
}

/// Chapter list response shared by both chapter endpoints.
#[derive(Serialize)]
pub struct ChaptersResponse {
    pub chapters: Vec<Chapter>,
}

/// Generate raw chapters from the extracted context.
pub async fn post_generate_chapters(
    State(state): State<AppState>,
    Json(request): Json<GenerateChaptersRequest>,
) -> ApiResult<Json<ChaptersResponse>> {
    if request.context.trim().is_empty() {
        return Err(ApiError::bad_request("context must not be empty"));
    }
    let context = sanitize_string(&request.context, MAX_CONTEXT_LENGTH);

    let chapters = generate_chapters(&state.genai, &context).await?;

    info!(count = chapters.len(), "chapters generated");
    Ok(Json(ChaptersResponse { chapters }))
}

/// Request to refine a chapter list.
#[derive(Debug, Deserialize)]
pub struct RefineChaptersRequest {
    pub chapters: Vec<Chapter>,
}

/// Refine chapter titles with suggestion grounding.
///
/// The response has the same length and order as the request; titles
/// that could not be refined come back unchanged.
pub async fn post_refine_chapters(
    State(state): State<AppState>,
    Json(request): Json<RefineChaptersRequest>,
) -> ApiResult<Json<ChaptersResponse>> {
    if request.chapters.len() > MAX_CHAPTER_COUNT {
        return Err(ApiError::bad_request(format!(
            "too many chapters (max {})",
            MAX_CHAPTER_COUNT
        )));
    }

    let chapters = refine_chapters(&state.genai, &state.suggest, request.chapters).await?;

    info!(count = chapters.len(), "chapters refined");
    Ok(Json(ChaptersResponse { chapters }))
}
