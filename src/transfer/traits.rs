use async_trait::async_trait;
use axum::body::Bytes;

use super::error::TransferResult;

/// Opens authenticated sessions against a file-transfer server.
#[async_trait]
pub trait TransferConnector: Send + Sync {
    /// Backend name for logs
    fn name(&self) -> &'static str;

    /// Connect and authenticate. Each call yields an independent session.
    async fn connect(&self) -> TransferResult<Box<dyn TransferSession>>;
}

/// One open connection. Callers must `close` it on every exit path.
#[async_trait]
pub trait TransferSession: Send {
    /// Store `data` at `remote_path`, replacing nothing: names are unique per call.
    async fn upload(&mut self, remote_path: &str, data: Bytes) -> TransferResult<()>;

    async fn remove(&mut self, remote_path: &str) -> TransferResult<()>;

    async fn close(self: Box<Self>);
}
