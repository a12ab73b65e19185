//! Bookmark export upload
//!
//! Accepts a browser bookmark export as the multipart field `file`, keeps a
//! copy in the upload directory and imports every link in it. A file that
//! fails to import still answers 201, with a processed count of zero.

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tagmark_core::sanitize_filename;
use tracing::{info, warn};

use crate::error::ApiError;
use crate::AppState;

/// Multipart field carrying the export file
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub message: String,
    pub filename: String,
    pub file_path: String,
    pub processed_count: usize,
}

/// POST /bookmark/upload
pub async fn upload_bookmark_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let no_file = || ApiError::BadRequest("No file provided".to_string());
    let mut multipart = multipart.map_err(|_| no_file())?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {}", e)))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Malformed upload: {}", e)))?;
        upload = Some((original_name, bytes));
        break;
    }

    let (original_name, bytes) = upload.ok_or_else(no_file)?;

    if original_name.is_empty() {
        return Err(ApiError::BadRequest("No file selected".to_string()));
    }
    if !original_name.ends_with(".html") {
        return Err(ApiError::BadRequest(
            "Invalid file type. Only HTML files are allowed.".to_string(),
        ));
    }

    let filename = sanitize_filename(&original_name);
    let upload_dir = state.upload_dir.clone();
    let saved_name = filename.clone();

    // Save and import under one lock; same-named uploads must not interleave
    let (file_path, processed_count) = state
        .with_store(move |store| -> std::io::Result<_> {
            std::fs::create_dir_all(&upload_dir)?;
            let file_path = upload_dir.join(&saved_name);
            std::fs::write(&file_path, &bytes)?;
            info!(path = %file_path.display(), size = bytes.len(), "Saved upload");

            let processed_count = match store.import_file(&file_path) {
                Ok(report) => report.processed_count(),
                Err(e) => {
                    warn!(path = %file_path.display(), error = %e, "Import failed");
                    0
                }
            };
            Ok((file_path, processed_count))
        })
        .await??;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            message: format!(
                "File uploaded and processed successfully. {} bookmarks added.",
                processed_count
            ),
            filename,
            file_path: file_path.display().to_string(),
            processed_count,
        }),
    ))
}
