// relay/form.rs - Multipart form collection for upload routes

use axum::body::Bytes;
use axum::extract::Multipart;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::error::RelayError;

/// One uploaded file, buffered in memory.
#[derive(Debug, Clone)]
pub struct FilePart {
    pub file_name: String,
    pub bytes: Bytes,
}

/// File parts keyed by field name plus plain text fields.
#[derive(Debug, Default)]
pub struct UploadForm {
    files: BTreeMap<String, FilePart>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Drain the multipart stream. Only field names in `accepted` may carry
    /// a file, each at most once; anything else is a 400.
    pub async fn collect(mut multipart: Multipart, accepted: &[&str]) -> Result<Self, RelayError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            let Some(raw_name) = field.file_name().map(str::to_string) else {
                let value = field.text().await?;
                form.fields.insert(name, value);
                continue;
            };

            if !accepted.contains(&name.as_str()) || form.files.contains_key(&name) {
                return Err(RelayError::bad_request(format!("Unexpected field: {}", name)));
            }

            let bytes = field.bytes().await?;
            let file_name = sanitize_file_name(&raw_name);
            // An untouched file input arrives as an unnamed part
            if file_name.is_empty() {
                continue;
            }

            debug!("Received {} ({} bytes) as {}", file_name, bytes.len(), name);
            form.files.insert(name, FilePart { file_name, bytes });
        }

        Ok(form)
    }

    pub fn take_file(&mut self, name: &str) -> Option<FilePart> {
        self.files.remove(name)
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty()
    }

    /// Non-empty text field value.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|v| v.trim()).filter(|v| !v.is_empty())
    }
}

/// Keep only the final path component of a client-supplied file name.
pub fn sanitize_file_name(raw: &str) -> String {
    raw.rsplit(['/', '\\']).next().unwrap_or_default().trim().to_string()
}
