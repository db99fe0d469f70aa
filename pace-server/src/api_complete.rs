//! `/api/complete` handler.

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use pace_prompts::wire::{CompletionRequest, CompletionResponse};

use crate::AppState;
use crate::error::{ApiError, ApiResult};

pub(crate) async fn complete(
    State(state): State<AppState>,
    payload: Result<Json<CompletionRequest>, JsonRejection>,
) -> ApiResult<Json<CompletionResponse>> {
    let Json(request) = payload?;
    if request.prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("Prompt is required".to_owned()));
    }

    let completion = state.completions.complete(&request.prompt).await?;
    Ok(Json(CompletionResponse { completion }))
}
