// relay/handlers/documents.rs - POST /upload/headman and /upload/villagehead

use axum::extract::{Multipart, State};
use axum::response::Json;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use crate::error::RelayError;
use crate::models::{DocumentKind, LeaderRole};
use crate::relay::clock::remote_path;
use crate::relay::form::UploadForm;
use crate::relay::AppState;

/**
 * POST /upload/headman - Store headman appointment documents
 *
 * Expected Input: multipart parts `recommendationsfromchief` and/or
 * `supporting_document_ddc`
 *
 * Expected Output (Success), one key per part received:
 * ```json
 * { "success": true, "filePaths": { "supporting_document_ddc": "/uploads/1718000000000-ddc-form.pdf" } }
 * ```
 */
pub async fn headman_documents_post(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, RelayError> {
    info!("Received request on /upload/headman");
    upload_documents(&state, multipart, LeaderRole::Headman.document_slots()).await
}

/// POST /upload/villagehead - same contract with the three village head slots
pub async fn villagehead_documents_post(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<Value>, RelayError> {
    info!("Received request on /upload/villagehead");
    upload_documents(&state, multipart, LeaderRole::VillageHead.document_slots()).await
}

async fn upload_documents(
    state: &AppState,
    multipart: Multipart,
    slots: &[DocumentKind],
) -> Result<Json<Value>, RelayError> {
    let accepted: Vec<&str> = slots.iter().map(|kind| kind.wire_name()).collect();
    let mut form = UploadForm::collect(multipart, &accepted).await?;
    if !form.has_files() {
        warn!("No files uploaded");
        return Err(RelayError::bad_request("No files uploaded"));
    }

    let mut session = state.connector.connect().await?;
    let timestamp = state.clock.next();
    let mut file_paths = Map::new();
    let mut failure = None;

    for kind in slots {
        let Some(file) = form.take_file(kind.wire_name()) else {
            continue;
        };
        let path = remote_path(&state.remote_dir, timestamp, kind.relay_prefix(), &file.file_name);
        if let Err(e) = session.upload(&path, file.bytes).await {
            failure = Some(e);
            break;
        }
        info!("Uploaded {} to {}", kind, path);
        file_paths.insert(kind.wire_name().to_string(), Value::String(path));
    }

    session.close().await;
    if let Some(e) = failure {
        return Err(e.into());
    }

    Ok(Json(json!({
        "success": true,
        "filePaths": file_paths,
    })))
}
