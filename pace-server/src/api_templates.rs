//! `/api/templates` handlers.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use pace_prompts::wire::TemplateDraft;
use pace_prompts::{Template, TemplateId};
use tracing::info;

use crate::AppState;
use crate::error::ApiResult;

pub(crate) async fn list_templates(State(state): State<AppState>) -> Json<Vec<Template>> {
    Json(state.templates.list())
}

pub(crate) async fn create_template(
    State(state): State<AppState>,
    payload: Result<Json<TemplateDraft>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Template>)> {
    let Json(draft) = payload?;
    let template = state
        .templates
        .create(draft.name, draft.description, draft.body)?;

    info!(template_id = %template.id(), name = template.name(), "template added");
    Ok((StatusCode::CREATED, Json(template)))
}

pub(crate) async fn delete_template(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = raw_id.parse::<TemplateId>()?;
    state.templates.delete(id)?;

    info!(template_id = %id, "template removed");
    Ok(StatusCode::NO_CONTENT)
}
