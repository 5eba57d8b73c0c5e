//! FTP backend.
//!
//! suppaftp's synchronous client runs on the blocking pool; the stream is
//! moved into each blocking task and handed back when it finishes.

use async_trait::async_trait;
use axum::body::Bytes;
use std::io::Cursor;
use std::net::{SocketAddr, ToSocketAddrs};
use std::time::Duration;
use suppaftp::types::FileType;
use suppaftp::{FtpError, FtpStream};
use tracing::{debug, info, warn};

use super::error::{TransferError, TransferResult};
use super::traits::{TransferConnector, TransferSession};

pub struct FtpConnector {
    host: String,
    port: u16,
    user: String,
    password: String,
    timeout: Duration,
}

impl FtpConnector {
    pub fn new(host: String, port: u16, user: String, password: String, timeout: Duration) -> Self {
        Self {
            host,
            port,
            user,
            password,
            timeout,
        }
    }
}

/// Blocking DNS lookup; call from the blocking pool only.
fn resolve(host: &str, port: u16) -> TransferResult<SocketAddr> {
    (host, port)
        .to_socket_addrs()
        .map_err(|e| TransferError::Connect(format!("cannot resolve {}:{}: {}", host, port, e)))?
        .next()
        .ok_or_else(|| TransferError::Connect(format!("no address for {}:{}", host, port)))
}

#[async_trait]
impl TransferConnector for FtpConnector {
    fn name(&self) -> &'static str {
        "ftp"
    }

    async fn connect(&self) -> TransferResult<Box<dyn TransferSession>> {
        let host = self.host.clone();
        let port = self.port;
        let timeout = self.timeout;
        let user = self.user.clone();
        let password = self.password.clone();

        let (addr, stream) = tokio::task::spawn_blocking(move || -> TransferResult<(SocketAddr, FtpStream)> {
            let addr = resolve(&host, port)?;
            let mut stream = FtpStream::connect_timeout(addr, timeout).map_err(|e| TransferError::Connect(e.to_string()))?;
            stream
                .login(user.as_str(), password.as_str())
                .map_err(|e| TransferError::Auth(e.to_string()))?;
            stream.transfer_type(FileType::Binary).map_err(remote_error)?;
            Ok((addr, stream))
        })
        .await
        .map_err(|e| TransferError::Connect(format!("connect task failed: {}", e)))??;

        info!("Connected to FTP server {}", addr);
        Ok(Box::new(FtpSession { stream: Some(stream) }))
    }
}

struct FtpSession {
    stream: Option<FtpStream>,
}

impl FtpSession {
    async fn run<T, F>(&mut self, op: F) -> TransferResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut FtpStream) -> Result<T, FtpError> + Send + 'static,
    {
        let mut stream = self.stream.take().ok_or(TransferError::Closed)?;
        let (stream, result) = tokio::task::spawn_blocking(move || {
            let result = op(&mut stream);
            (stream, result)
        })
        .await
        .map_err(|e| TransferError::Remote(format!("transfer task failed: {}", e)))?;
        self.stream = Some(stream);
        result.map_err(remote_error)
    }
}

fn remote_error(err: FtpError) -> TransferError {
    TransferError::Remote(err.to_string())
}

#[async_trait]
impl TransferSession for FtpSession {
    async fn upload(&mut self, remote_path: &str, data: Bytes) -> TransferResult<()> {
        let path = remote_path.to_string();
        let size = data.len();
        self.run(move |stream| {
            let mut reader = Cursor::new(data);
            stream.put_file(path.as_str(), &mut reader)
        })
        .await?;
        debug!("Stored {} bytes at {}", size, remote_path);
        Ok(())
    }

    async fn remove(&mut self, remote_path: &str) -> TransferResult<()> {
        let path = remote_path.to_string();
        self.run(move |stream| stream.rm(path.as_str())).await
    }

    async fn close(mut self: Box<Self>) {
        if self.stream.is_none() {
            return;
        }
        if let Err(e) = self.run(|stream| stream.quit()).await {
            warn!("FTP quit failed: {}", e);
        }
        self.stream = None;
        info!("FTP connection closed");
    }
}
