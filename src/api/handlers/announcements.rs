use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentEditor, state::AppState},
    auth::{provide_permissions, PermissionInfo},
    domain::{
        announcement_form, Announcement, AnnouncementForm, AnnouncementOption,
        AnnouncementSummary, ResolvedAnnouncement, SaveAnnouncementRequest,
    },
    error::Result,
};

pub async fn list(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnnouncementSummary>>> {
    let summaries = state.service_context.announcement_service.list_summaries().await?;
    Ok(Json(summaries))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ResolvedAnnouncement>> {
    let service = &state.service_context.announcement_service;
    let announcement = service.get(id).await?;
    Ok(Json(service.resolve(announcement).await?))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(editor): Extension<CurrentEditor>,
    Json(request): Json<SaveAnnouncementRequest>,
) -> Result<(StatusCode, Json<Announcement>)> {
    let created = state.service_context.announcement_service
        .save(&editor, None, request)
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(editor): Extension<CurrentEditor>,
    Json(request): Json<SaveAnnouncementRequest>,
) -> Result<Json<Announcement>> {
    let updated = state.service_context.announcement_service
        .save(&editor, Some(id), request)
        .await?;

    Ok(Json(updated))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(editor): Extension<CurrentEditor>,
) -> Result<StatusCode> {
    state.service_context.announcement_service.delete(&editor, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Picker entries for the special announcement element, global first.
pub async fn options(
    State(state): State<AppState>,
) -> Result<Json<Vec<AnnouncementOption>>> {
    let options = state.service_context.announcement_service.dropdown_options().await?;
    Ok(Json(options))
}

/// Field list for the admin edit form.
pub async fn fields(State(state): State<AppState>) -> Json<AnnouncementForm> {
    Json(announcement_form(&state.settings.schema.default_category_url))
}

pub async fn permissions() -> Json<Vec<PermissionInfo>> {
    Json(provide_permissions())
}
