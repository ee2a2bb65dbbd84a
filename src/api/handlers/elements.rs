use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentEditor, state::AppState},
    domain::{AnnouncementElement, CreateElementRequest},
    error::Result,
};

#[derive(Serialize)]
pub struct ElementResponse {
    #[serde(flatten)]
    pub element: AnnouncementElement,
    pub summary: &'static str,
    pub element_type: &'static str,
}

impl From<AnnouncementElement> for ElementResponse {
    fn from(element: AnnouncementElement) -> Self {
        Self {
            summary: element.summary(),
            element_type: AnnouncementElement::TYPE_LABEL,
            element,
        }
    }
}

pub async fn create(
    State(state): State<AppState>,
    Extension(editor): Extension<CurrentEditor>,
    Json(request): Json<CreateElementRequest>,
) -> Result<(StatusCode, Json<ElementResponse>)> {
    let element = state.service_context.element_service.create(&editor, request).await?;

    Ok((StatusCode::CREATED, Json(element.into())))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ElementResponse>> {
    let element = state.service_context.element_service.get(id).await?;
    Ok(Json(element.into()))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Extension(editor): Extension<CurrentEditor>,
) -> Result<StatusCode> {
    state.service_context.element_service.delete(&editor, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
