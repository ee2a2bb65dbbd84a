use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use crate::{
    api::{middleware::auth::CurrentEditor, state::AppState},
    auth,
    domain::Image,
    error::{AppError, Result},
    uploads::{delete_uploaded_file, save_uploaded_file},
};

/// Multipart upload with a `file` part and an optional `title` part.
pub async fn upload(
    State(state): State<AppState>,
    Extension(editor): Extension<CurrentEditor>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Image>)> {
    if !auth::can_author(&editor) {
        return Err(AppError::Forbidden);
    }

    let mut file: Option<(String, Vec<u8>)> = None;
    let mut title: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        match field.name() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read upload: {}", e)))?;
                file = Some((filename, data.to_vec()));
            }
            Some("title") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read title: {}", e)))?;
                title = Some(text).filter(|t| !t.trim().is_empty());
            }
            _ => {}
        }
    }

    let (filename, data) = file.ok_or_else(|| AppError::validation("file", "No file uploaded"))?;
    let path = save_uploaded_file(&state.settings.uploads.dir, &filename, &data).await?;
    let image = match state.service_context.image_repo.create(&path, title).await {
        Ok(image) => image,
        Err(e) => {
            if let Err(cleanup) = delete_uploaded_file(&state.settings.uploads.dir, &path).await {
                tracing::warn!("Failed to remove orphaned upload {}: {}", path, cleanup);
            }
            return Err(e);
        }
    };

    tracing::info!("Stored image {} at {}", image.id, image.filename);

    Ok((StatusCode::CREATED, Json(image)))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Image>> {
    let image = state.service_context.image_repo
        .find_by_id(id)
        .await?
        .ok_or(AppError::NotFound("Image not found".to_string()))?;

    Ok(Json(image))
}
