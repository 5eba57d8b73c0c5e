use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransferError {
    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("Invalid remote path: {0}")]
    InvalidPath(String),

    #[error("Transfer session already closed")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type TransferResult<T> = Result<T, TransferError>;
