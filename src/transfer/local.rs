//! Local filesystem backend.
//!
//! Maps remote paths under a root directory. Used for development and tests
//! when no transfer server is reachable.

use async_trait::async_trait;
use axum::body::Bytes;
use std::path::{Component, Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::error::{TransferError, TransferResult};
use super::traits::{TransferConnector, TransferSession};

pub struct LocalConnector {
    root: PathBuf,
}

impl LocalConnector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl TransferConnector for LocalConnector {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn connect(&self) -> TransferResult<Box<dyn TransferSession>> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|e| TransferError::Connect(format!("cannot open storage root {:?}: {}", self.root, e)))?;
        debug!("Opened local transfer session at {:?}", self.root);
        Ok(Box::new(LocalSession {
            root: self.root.clone(),
        }))
    }
}

struct LocalSession {
    root: PathBuf,
}

impl LocalSession {
    /// Resolve a remote path below the root, refusing traversal.
    fn resolve(&self, remote_path: &str) -> TransferResult<PathBuf> {
        let relative = Path::new(remote_path.trim_start_matches('/'));
        if relative.as_os_str().is_empty()
            || relative.components().any(|c| !matches!(c, Component::Normal(_)))
        {
            return Err(TransferError::InvalidPath(remote_path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl TransferSession for LocalSession {
    async fn upload(&mut self, remote_path: &str, data: Bytes) -> TransferResult<()> {
        let target = self.resolve(remote_path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&target, &data).await?;
        info!("Stored {} bytes at {:?}", data.len(), target);
        Ok(())
    }

    async fn remove(&mut self, remote_path: &str) -> TransferResult<()> {
        let target = self.resolve(remote_path)?;
        fs::remove_file(&target)
            .await
            .map_err(|e| TransferError::Remote(format!("cannot remove {}: {}", remote_path, e)))
    }

    async fn close(self: Box<Self>) {
        debug!("Closed local transfer session");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_then_remove() {
        let dir = tempfile::tempdir().unwrap();
        let connector = LocalConnector::new(dir.path());

        let mut session = connector.connect().await.unwrap();
        session
            .upload("/uploads/1-letter.pdf", Bytes::from_static(b"%PDF"))
            .await
            .unwrap();
        assert_eq!(std::fs::read(dir.path().join("uploads/1-letter.pdf")).unwrap(), b"%PDF");

        session.remove("/uploads/1-letter.pdf").await.unwrap();
        assert!(!dir.path().join("uploads/1-letter.pdf").exists());
        assert!(session.remove("/uploads/1-letter.pdf").await.is_err());
        session.close().await;
    }

    #[tokio::test]
    async fn traversal_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let connector = LocalConnector::new(dir.path());
        let mut session = connector.connect().await.unwrap();

        let err = session
            .upload("/uploads/../../etc/passwd", Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::InvalidPath(_)));
        session.close().await;
    }
}
