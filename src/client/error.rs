use thiserror::Error;

use crate::models::ValidationError;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("Invalid value for {field}: '{value}'")]
    InvalidValue { field: String, value: String },

    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Relay(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<ValidationError> for ClientError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingFields(fields) => ClientError::MissingFields(fields),
            ValidationError::InvalidValue { field, value } => ClientError::InvalidValue { field, value },
        }
    }
}

impl ClientError {
    /// Errors that mean the stored session can no longer be used.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            ClientError::SessionExpired | ClientError::NotAuthenticated | ClientError::Api { status: 401, .. }
        )
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
