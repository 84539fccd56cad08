//! Transcription handler.

use axum::extract::State;
use axum::Json;
use tracing::info;

use cuegen_models::VideoReference;
use cuegen_pipeline::{transcribe, Transcription};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use crate::validate::validate_reference;

/// Transcribe a video reference into transcript + SubRip subtitles.
pub async fn post_transcribe(
    State(state): State<AppState>,
    Json(reference): Json<VideoReference>,
) -> ApiResult<Json<Transcription>> {
    validate_reference(&reference).map_err(ApiError::bad_request)?;

    let transcription = transcribe(&state.genai, &reference).await?;

    info!(
        kind = reference.kind(),
        has_srt = !transcription.srt.is_empty(),
        "transcription complete"
    );
    Ok(Json(transcription))
}
