// relay/handlers/upload.rs - POST /upload handler

use axum::extract::{Multipart, State};
use axum::response::Json;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::error::RelayError;
use crate::relay::clock::remote_path;
use crate::relay::form::UploadForm;
use crate::relay::AppState;

/**
 * POST /upload - Store one file on the transfer server
 *
 * Expected Input: multipart part `file`
 *
 * Expected Output (Success):
 * ```json
 * { "success": true, "filePath": "/uploads/1718000000000-letter.pdf" }
 * ```
 */
pub async fn upload_post(State(state): State<AppState>, multipart: Multipart) -> Result<Json<Value>, RelayError> {
    info!("Received request on /upload");

    let mut form = UploadForm::collect(multipart, &["file"]).await?;
    let Some(file) = form.take_file("file") else {
        warn!("No file uploaded");
        return Err(RelayError::bad_request("No file uploaded"));
    };

    let mut session = state.connector.connect().await?;
    let path = remote_path(&state.remote_dir, state.clock.next(), None, &file.file_name);
    info!("Uploading to {}", path);
    let stored = session.upload(&path, file.bytes).await;
    session.close().await;
    stored?;

    info!("File uploaded successfully to {}", path);
    Ok(Json(json!({
        "success": true,
        "filePath": path,
    })))
}
