//! Upload relay: accepts multipart uploads and forwards them to the
//! configured transfer server.

pub mod clock;
pub mod form;
pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::transfer::{connector_from_config, TransferConnector};

pub use clock::UploadClock;

/// Shared by every upload handler.
#[derive(Clone)]
pub struct AppState {
    pub connector: Arc<dyn TransferConnector>,
    pub clock: Arc<UploadClock>,
    pub remote_dir: String,
}

impl AppState {
    pub fn new(connector: Arc<dyn TransferConnector>, remote_dir: impl Into<String>) -> Self {
        Self {
            connector,
            clock: Arc::new(UploadClock::new()),
            remote_dir: remote_dir.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(connector_from_config(&config.transfer), config.transfer.remote_dir.clone())
    }
}

/// Relay router with body limit, CORS and request tracing.
pub fn app(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        // Uploads
        .route("/upload", post(handlers::upload_post))
        .route("/upload/headman", post(handlers::headman_documents_post))
        .route("/upload/villagehead", post(handlers::villagehead_documents_post))
        .route("/upload/chief-update", post(handlers::chief_update_post))
        .with_state(state)
        // Global middleware
        .layer(DefaultBodyLimit::max(config.relay.max_request_size_bytes))
        .layer(cors_layer(&config.relay.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    CorsLayer::new().allow_origin(allowed).allow_methods(Any).allow_headers(Any)
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Leadership Records Upload Relay",
            "version": version,
            "description": "Forwards appointment documents to the records file server",
            "endpoints": {
                "upload": "/upload (multipart: file)",
                "headman": "/upload/headman (multipart: recommendationsfromchief, supporting_document_ddc)",
                "villagehead": "/upload/villagehead (multipart: recommendationsfromchief, recommendationsfromheadman, supporting_document_ddc)",
                "chief_update": "/upload/chief-update (multipart: file, fileType, currentFilePath?)",
                "health": "/health",
            }
        }
    }))
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "data": {
            "status": "ok",
            "timestamp": chrono::Utc::now(),
        }
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::LocalConnector;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn test_app(dir: &std::path::Path, config: &AppConfig) -> Router {
        let state = AppState::new(Arc::new(LocalConnector::new(dir)), "/uploads");
        app(state, config)
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), &AppConfig::development());

        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::development();
        config.relay.max_request_size_bytes = 64;
        let app = test_app(dir.path(), &config);

        let payload = format!(
            "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"file\"; filename=\"big.bin\"\r\n\r\n{}\r\n--XBOUNDARY--\r\n",
            "x".repeat(1024)
        );
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(payload))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
    }

    #[tokio::test]
    async fn local_backend_stores_upload() {
        let dir = tempfile::tempdir().unwrap();
        let app = test_app(dir.path(), &AppConfig::development());

        let payload = "--XBOUNDARY\r\nContent-Disposition: form-data; name=\"file\"; filename=\"note.txt\"\r\n\r\nhello\r\n--XBOUNDARY--\r\n";
        let request = Request::builder()
            .method("POST")
            .uri("/upload")
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=XBOUNDARY")
            .body(Body::from(payload))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        let path = json["filePath"].as_str().unwrap();
        assert!(path.ends_with("-note.txt"));
        let stored = dir.path().join(path.trim_start_matches('/'));
        assert_eq!(std::fs::read(stored).unwrap(), b"hello");
    }
}
