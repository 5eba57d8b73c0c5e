#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use async_trait::async_trait;
use axum::body::Bytes;
use chrono::{Duration, Utc};
use leadership_records::auth::Session;
use leadership_records::config::AppConfig;
use leadership_records::models::UserProfile;
use leadership_records::relay::{self, AppState};
use leadership_records::transfer::{TransferConnector, TransferError, TransferResult, TransferSession};

pub const REMOTE_DIR: &str = "/uploads";

/// What the relay asked the transfer backend to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Connect,
    Upload(String),
    Remove(String),
    Close,
}

#[derive(Default)]
struct Recorded {
    events: Vec<Event>,
    files: BTreeMap<String, Vec<u8>>,
    refuse_connect: bool,
    fail_remove: bool,
    fail_upload_after: Option<usize>,
}

/// In-memory transfer backend that records every call.
#[derive(Clone, Default)]
pub struct RecordingBackend {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.inner.lock().unwrap().events.clone()
    }

    pub fn uploads(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Upload(path) => Some(path),
                _ => None,
            })
            .collect()
    }

    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        self.inner.lock().unwrap().files.get(path).cloned()
    }

    pub fn put_file(&self, path: &str, bytes: &[u8]) {
        self.inner.lock().unwrap().files.insert(path.to_string(), bytes.to_vec());
    }

    pub fn refuse_connect(&self) {
        self.inner.lock().unwrap().refuse_connect = true;
    }

    pub fn fail_remove(&self) {
        self.inner.lock().unwrap().fail_remove = true;
    }

    /// Let `count` uploads succeed, then fail the rest.
    pub fn fail_upload_after(&self, count: usize) {
        self.inner.lock().unwrap().fail_upload_after = Some(count);
    }
}

#[async_trait]
impl TransferConnector for RecordingBackend {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn connect(&self) -> TransferResult<Box<dyn TransferSession>> {
        let mut inner = self.inner.lock().unwrap();
        if inner.refuse_connect {
            return Err(TransferError::Connect("connection refused".into()));
        }
        inner.events.push(Event::Connect);
        Ok(Box::new(RecordingSession {
            inner: self.inner.clone(),
        }))
    }
}

struct RecordingSession {
    inner: Arc<Mutex<Recorded>>,
}

#[async_trait]
impl TransferSession for RecordingSession {
    async fn upload(&mut self, remote_path: &str, data: Bytes) -> TransferResult<()> {
        let mut inner = self.inner.lock().unwrap();
        let done = inner
            .events
            .iter()
            .filter(|e| matches!(e, Event::Upload(_)))
            .count();
        if inner.fail_upload_after.is_some_and(|limit| done >= limit) {
            return Err(TransferError::Remote("552 disk full".into()));
        }
        inner.events.push(Event::Upload(remote_path.to_string()));
        inner.files.insert(remote_path.to_string(), data.to_vec());
        Ok(())
    }

    async fn remove(&mut self, remote_path: &str) -> TransferResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.events.push(Event::Remove(remote_path.to_string()));
        if inner.fail_remove || inner.files.remove(remote_path).is_none() {
            return Err(TransferError::Remote(format!("550 {}: no such file", remote_path)));
        }
        Ok(())
    }

    async fn close(self: Box<Self>) {
        self.inner.lock().unwrap().events.push(Event::Close);
    }
}

pub struct TestRelay {
    pub port: u16,
    pub base_url: String,
    pub backend: RecordingBackend,
}

/// Serve the relay router in-process on a free port.
pub async fn spawn_relay() -> Result<TestRelay> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let backend = RecordingBackend::new();

    let state = AppState::new(Arc::new(backend.clone()), REMOTE_DIR);
    let app = relay::app(state, &AppConfig::development());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestRelay {
        port,
        base_url: format!("http://127.0.0.1:{}", port),
        backend,
    })
}

pub fn file_part(name: &str, bytes: &[u8]) -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(bytes.to_vec()).file_name(name.to_string())
}

pub fn session_with_role(role: &str) -> Session {
    Session::new(
        "test-token",
        UserProfile {
            username: "clerk".into(),
            province: "masvingo".into(),
            role: role.into(),
            district: "Chivi".into(),
        },
        Utc::now() + Duration::hours(1),
    )
}

pub fn admin_session() -> Session {
    session_with_role("admin")
}

/// Timestamp segment of `/uploads/{ts}-...`.
pub fn timestamp_of(path: &str) -> i64 {
    path.trim_start_matches("/uploads/")
        .split('-')
        .next()
        .and_then(|ts| ts.parse().ok())
        .unwrap_or_else(|| panic!("no numeric timestamp in {}", path))
}
