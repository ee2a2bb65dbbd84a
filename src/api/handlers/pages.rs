use axum::{
    extract::State,
    http::StatusCode,
    Extension, Json,
};
use validator::Validate;

use crate::{
    api::{middleware::auth::CurrentEditor, state::AppState},
    auth,
    domain::{CreatePageRequest, Page},
    error::{AppError, Result},
};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Page>>> {
    let pages = state.service_context.page_repo.list().await?;
    Ok(Json(pages))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(editor): Extension<CurrentEditor>,
    Json(request): Json<CreatePageRequest>,
) -> Result<(StatusCode, Json<Page>)> {
    if !auth::can_author(&editor) {
        return Err(AppError::Forbidden);
    }
    request.validate()?;

    let page = state.service_context.page_repo.create(request).await
        .map_err(|e| match e {
            AppError::Database(msg) if msg.contains("UNIQUE") => {
                AppError::validation("url_segment", "URL segment is already in use")
            }
            _ => e,
        })?;

    Ok((StatusCode::CREATED, Json(page)))
}
