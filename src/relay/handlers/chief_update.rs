// relay/handlers/chief_update.rs - POST /upload/chief-update handler

use axum::extract::{Multipart, State};
use axum::response::Json;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::RelayError;
use crate::relay::clock::remote_path;
use crate::relay::form::UploadForm;
use crate::relay::AppState;

/**
 * POST /upload/chief-update - Replace a stored document
 *
 * Expected Input: multipart part `file`, text fields `fileType` and the
 * optional `currentFilePath` of the document being replaced.
 *
 * The old file is removed first. A failed removal is logged and the upload
 * still goes ahead.
 *
 * Expected Output (Success):
 * ```json
 * { "success": true, "filePath": "/uploads/1718000000000-picture-portrait.jpg" }
 * ```
 */
pub async fn chief_update_post(State(state): State<AppState>, multipart: Multipart) -> Result<Json<Value>, RelayError> {
    info!("Received request on /upload/chief-update");

    let mut form = UploadForm::collect(multipart, &["file"]).await?;
    let file_type = form.text("fileType").map(str::to_string);
    let current = form.text("currentFilePath").map(str::to_string);
    let (Some(file), Some(file_type)) = (form.take_file("file"), file_type) else {
        return Err(RelayError::bad_request("File and file type are required"));
    };
    if file_type.contains('/') || file_type.contains("..") {
        return Err(RelayError::bad_request(format!("Invalid file type: {}", file_type)));
    }

    let mut session = state.connector.connect().await?;

    if let Some(old) = current.as_deref() {
        if is_within(&state.remote_dir, old) {
            match session.remove(old).await {
                Ok(()) => info!("Old file removed: {}", old),
                Err(e) => warn!("Error removing old file {}: {}", old, e),
            }
        } else {
            warn!("Not removing {}: outside {}", old, state.remote_dir);
        }
    }

    let path = remote_path(&state.remote_dir, state.clock.next(), Some(&file_type), &file.file_name);
    let stored = session.upload(&path, file.bytes).await;
    session.close().await;
    stored?;

    info!("New file uploaded to: {}", path);
    Ok(Json(json!({
        "success": true,
        "filePath": path,
    })))
}

/// Whether `path` names a file directly or indirectly under `dir`.
fn is_within(dir: &str, path: &str) -> bool {
    let dir = dir.trim_end_matches('/');
    path.strip_prefix(dir)
        .and_then(|rest| rest.strip_prefix('/'))
        .map(|rest| !rest.is_empty() && !rest.split('/').any(|seg| seg == ".." || seg.is_empty()))
        .unwrap_or(false)
}
