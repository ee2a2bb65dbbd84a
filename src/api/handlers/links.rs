use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentEditor, state::AppState},
    auth,
    domain::{CreateLinkRequest, Link},
    error::{AppError, Result},
};

pub async fn create(
    State(state): State<AppState>,
    Extension(editor): Extension<CurrentEditor>,
    Json(request): Json<CreateLinkRequest>,
) -> Result<(StatusCode, Json<Link>)> {
    if !auth::can_author(&editor) {
        return Err(AppError::Forbidden);
    }
    request.validate()?;

    let link = state.service_context.link_repo.create(request).await?;

    Ok((StatusCode::CREATED, Json(link)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Link>> {
    let link = state.service_context.link_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Link not found".to_string()))?;

    Ok(Json(link))
}

/// Slots pointing at the link are cleared by the store.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(editor): Extension<CurrentEditor>,
) -> Result<StatusCode> {
    if !auth::can_edit(&editor) {
        return Err(AppError::Forbidden);
    }

    let link_repo = &state.service_context.link_repo;
    link_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Link not found".to_string()))?;
    link_repo.delete(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
