//! Image upload: one multipart `file` field, written under the upload dir with a generated name.

use crate::error::AppError;
use crate::response::UploadResponse;
use crate::state::AppState;
use axum::extract::multipart::{Field, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use std::path::Path;
use tokio::io::AsyncWriteExt;

pub const UPLOAD_FIELD: &str = "file";
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];
/// URL prefix the upload dir is served under.
pub const FILES_URL_PREFIX: &str = "/api/files";

/// Lowercased extension if it is on the allow-list.
pub fn allowed_extension(original_name: &str) -> Option<String> {
    let (_, ext) = original_name.rsplit_once('.')?;
    let ext = ext.to_ascii_lowercase();
    ALLOWED_EXTENSIONS.contains(&ext.as_str()).then_some(ext)
}

/// Random name keeping only the validated extension, so client paths never reach the filesystem.
pub fn generated_filename(ext: &str) -> String {
    format!("{}.{}", uuid::Uuid::new_v4(), ext)
}

pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart.map_err(|_| AppError::BadRequest("file is required".into()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| AppError::BadRequest("file is required".into()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        return store_upload(&state.upload_dir, field).await.map(Json);
    }
    Err(AppError::BadRequest("file is required".into()))
}

async fn store_upload(upload_dir: &Path, field: Field<'_>) -> Result<UploadResponse, AppError> {
    // A part without a filename is a plain form value, not a file.
    let original_name = field
        .file_name()
        .map(str::to_string)
        .ok_or_else(|| AppError::BadRequest("file is required".into()))?;
    let ext = allowed_extension(&original_name)
        .ok_or_else(|| AppError::BadRequest("unsupported file type".into()))?;
    let filename = generated_filename(&ext);
    let target = upload_dir.join(&filename);

    if let Err(e) = save_field(field, &target).await {
        tracing::error!(error = %e, path = %target.display(), "failed to save upload");
        let _ = tokio::fs::remove_file(&target).await;
        return Err(AppError::Storage("failed to save file".into()));
    }
    tracing::info!(%filename, original = %original_name, "file uploaded");

    Ok(UploadResponse {
        url: format!("{}/{}", FILES_URL_PREFIX, filename),
        filename,
        uploaded_at: Utc::now(),
    })
}

/// Stream the field to disk chunk by chunk.
async fn save_field(mut field: Field<'_>, target: &Path) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut file = tokio::fs::File::create(target).await?;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}
