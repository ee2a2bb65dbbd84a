use std::path::PathBuf;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::{AppError, Result};

/// URL prefix the uploads directory is served under.
pub const UPLOADS_URL_PREFIX: &str = "uploads";

/// Allowed image extensions
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Maximum file size (10 MB)
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Extension of an acceptable image filename, lowercased.
pub fn image_extension(filename: &str) -> Result<String> {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .ok_or_else(|| AppError::validation("file", "Invalid filename"))?;

    if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        return Err(AppError::validation(
            "file",
            format!("Invalid file type. Allowed: {}", ALLOWED_EXTENSIONS.join(", ")),
        ));
    }

    Ok(extension)
}

/// Save an uploaded image into `uploads_dir`.
/// Returns the public path of the file (e.g., "uploads/abc123.jpg")
pub async fn save_uploaded_file(
    uploads_dir: &str,
    filename: &str,
    data: &[u8],
) -> Result<String> {
    if data.is_empty() {
        return Err(AppError::validation("file", "File is empty"));
    }
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation("file", "File too large (max 10 MB)"));
    }

    let extension = image_extension(filename)?;

    let uploads_path = PathBuf::from(uploads_dir);
    fs::create_dir_all(&uploads_path).await.map_err(|e| {
        AppError::Internal(format!("Failed to create uploads directory: {}", e))
    })?;

    let new_filename = format!("{}.{}", Uuid::new_v4(), extension);
    let file_path = uploads_path.join(&new_filename);

    let mut file = fs::File::create(&file_path).await.map_err(|e| {
        AppError::Internal(format!("Failed to create file: {}", e))
    })?;

    file.write_all(data).await.map_err(|e| {
        AppError::Internal(format!("Failed to write file: {}", e))
    })?;

    Ok(format!("{}/{}", UPLOADS_URL_PREFIX, new_filename))
}

/// Delete a file previously returned by `save_uploaded_file`.
/// Paths outside the uploads prefix are ignored.
pub async fn delete_uploaded_file(uploads_dir: &str, public_path: &str) -> Result<()> {
    let Some(stored_name) = public_path
        .strip_prefix(UPLOADS_URL_PREFIX)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|name| !name.is_empty() && !name.contains('/') && !name.contains(".."))
    else {
        return Ok(());
    };

    let path = PathBuf::from(uploads_dir).join(stored_name);
    if path.exists() {
        fs::remove_file(&path).await.map_err(|e| {
            AppError::Internal(format!("Failed to delete file: {}", e))
        })?;
    }

    Ok(())
}
