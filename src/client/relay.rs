use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use super::error::{ClientError, ClientResult};
use crate::config::normalize_base_url;
use crate::models::{DocumentKind, DocumentPath};

/// A local file selected for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes: bytes.into(),
        }
    }

    pub async fn from_path(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self { file_name, bytes })
    }

    fn part(&self) -> Part {
        Part::bytes(self.bytes.clone()).file_name(self.file_name.clone())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RelayResponse {
    #[serde(default)]
    file_path: Option<String>,
    #[serde(default)]
    file_paths: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RelayErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<String>,
}

/// Multipart client for the upload relay.
#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    base_url: String,
    bearer: Option<String>,
}

impl RelayClient {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = normalize_base_url(base_url);
        url::Url::parse(&base_url)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            bearer: None,
        })
    }

    /// Send `Authorization: Bearer` on document replacement.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }

    /// POST /upload
    pub async fn upload(&self, file: &Attachment) -> ClientResult<DocumentPath> {
        let form = Form::new().part("file", file.part());
        let response = self.post("/upload", form, false).await?;
        single_path(response)
    }

    /// POST /upload/headman with whichever documents are given.
    pub async fn upload_headman_documents(
        &self,
        chief: Option<&Attachment>,
        ddc: Option<&Attachment>,
    ) -> ClientResult<BTreeMap<DocumentKind, DocumentPath>> {
        self.upload_documents(
            "/upload/headman",
            &[
                (DocumentKind::RecommendationsFromChief, chief),
                (DocumentKind::SupportingDocumentDdc, ddc),
            ],
        )
        .await
    }

    /// POST /upload/villagehead with whichever documents are given.
    pub async fn upload_villagehead_documents(
        &self,
        chief: Option<&Attachment>,
        headman: Option<&Attachment>,
        ddc: Option<&Attachment>,
    ) -> ClientResult<BTreeMap<DocumentKind, DocumentPath>> {
        self.upload_documents(
            "/upload/villagehead",
            &[
                (DocumentKind::RecommendationsFromChief, chief),
                (DocumentKind::RecommendationsFromHeadman, headman),
                (DocumentKind::SupportingDocumentDdc, ddc),
            ],
        )
        .await
    }

    /// POST /upload/chief-update: store a replacement and drop the old file.
    pub async fn update_file(
        &self,
        file: &Attachment,
        kind: DocumentKind,
        current_path: Option<&str>,
    ) -> ClientResult<DocumentPath> {
        let mut form = Form::new()
            .part("file", file.part())
            .text("fileType", kind.wire_name());
        if let Some(current) = current_path.filter(|p| !p.trim().is_empty()) {
            form = form.text("currentFilePath", current.to_string());
        }
        let response = self.post("/upload/chief-update", form, true).await?;
        single_path(response)
    }

    async fn upload_documents(
        &self,
        route: &str,
        files: &[(DocumentKind, Option<&Attachment>)],
    ) -> ClientResult<BTreeMap<DocumentKind, DocumentPath>> {
        let mut form = Form::new();
        let mut sent = Vec::new();
        for (kind, file) in files {
            if let Some(file) = file {
                form = form.part(kind.wire_name(), file.part());
                sent.push(*kind);
            }
        }

        let response = self.post(route, form, false).await?;
        let returned = response
            .file_paths
            .ok_or_else(|| ClientError::Relay("No file paths returned from server".to_string()))?;

        let mut paths = BTreeMap::new();
        for kind in sent {
            let path = returned
                .get(kind.wire_name())
                .and_then(|raw| DocumentPath::parse(raw.as_str()))
                .ok_or_else(|| ClientError::Relay(format!("No path returned for {}", kind)))?;
            paths.insert(kind, path);
        }
        Ok(paths)
    }

    async fn post(&self, route: &str, form: Form, authorized: bool) -> ClientResult<RelayResponse> {
        let url = format!("{}{}", self.base_url, route);
        debug!("POST {}", url);

        let mut request = self.http.post(&url).multipart(form);
        if authorized {
            if let Some(token) = &self.bearer {
                request = request.bearer_auth(token);
            }
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body: RelayErrorBody = response.json().await.unwrap_or_default();
            warn!("Relay {} returned {}: {:?} {:?}", route, status, body.error, body.details);
            return Err(ClientError::Relay(body.error.unwrap_or_else(|| "Upload failed".to_string())));
        }

        response
            .json::<RelayResponse>()
            .await
            .map_err(|e| ClientError::Relay(format!("Malformed relay response: {}", e)))
    }
}

fn single_path(response: RelayResponse) -> ClientResult<DocumentPath> {
    response
        .file_path
        .and_then(DocumentPath::parse)
        .ok_or_else(|| ClientError::Relay("No file path returned from server".to_string()))
}
