use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::{
    api::state::AppState,
    domain::{Announcement, ResolvedAnnouncement},
    error::{AppError, Result},
};

#[derive(Debug, Deserialize)]
pub struct ActiveAnnouncementsQuery {
    pub page_id: Option<Uuid>,
}

/// An announcement as published to page templates.
#[derive(Debug, Serialize)]
pub struct PublicAnnouncement {
    #[serde(flatten)]
    pub announcement: Announcement,
    pub category_url: String,
    pub image_url: Option<String>,
    pub links: Map<String, Value>,
    pub schema: Map<String, Value>,
}

fn to_public(state: &AppState, resolved: &ResolvedAnnouncement) -> PublicAnnouncement {
    let projector = &state.service_context.projector;

    let links = resolved
        .links
        .iter()
        .filter(|(_, link)| !link.url.trim().is_empty())
        .map(|(slot, link)| (slot.as_str().to_string(), Value::from(link.url.trim())))
        .collect();

    PublicAnnouncement {
        announcement: resolved.announcement.clone(),
        category_url: resolved
            .announcement
            .category_url(projector.default_category_url())
            .to_string(),
        image_url: projector.image_url(resolved),
        links,
        schema: projector.to_schema_json(resolved),
    }
}

/// The page-scoped or global announcements for a page context.
pub async fn list_active(
    State(state): State<AppState>,
    Query(params): Query<ActiveAnnouncementsQuery>,
) -> Result<Json<Vec<PublicAnnouncement>>> {
    let resolved = state.service_context.announcement_service
        .global_special_announcements(params.page_id)
        .await?;

    Ok(Json(resolved.iter().map(|r| to_public(&state, r)).collect()))
}

pub async fn schema_json(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response> {
    let service = &state.service_context.announcement_service;
    let resolved = service.resolve(service.get(id).await?).await?;
    let body = state.service_context.projector.to_schema_string(&resolved)?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/ld+json; charset=utf-8")],
        body,
    ).into_response())
}

pub async fn render_announcement(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>> {
    let service = &state.service_context.announcement_service;
    let resolved = service.resolve(service.get(id).await?).await?;

    Ok(Html(state.service_context.projector.render(&resolved)?))
}

pub async fn render_page_announcements(
    State(state): State<AppState>,
    Path(page_id): Path<Uuid>,
) -> Result<Html<String>> {
    state.service_context.page_repo
        .find_by_id(page_id)
        .await?
        .ok_or(AppError::NotFound("Page not found".to_string()))?;

    let resolved = state.service_context.announcement_service
        .global_special_announcements(Some(page_id))
        .await?;

    Ok(Html(state.service_context.projector.render_list(&resolved)?))
}

pub async fn render_element(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Html<String>> {
    let html = state.service_context.element_service.render(id).await?;
    Ok(Html(html))
}
