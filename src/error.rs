// Upload relay error types
use axum::extract::multipart::MultipartError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::transfer::TransferError;

/// Relay error with the status codes and bodies upload clients expect
#[derive(Debug)]
pub enum RelayError {
    // 400 Bad Request (missing or unexpected form parts)
    BadRequest(String),

    // Multipart stream rejected by the extractor (size limit, malformed body)
    Rejected { status: StatusCode, message: String },

    // 500 Internal Server Error (connect, authenticate or store failed)
    TransferFailed(String),
}

impl RelayError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            RelayError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RelayError::Rejected { status, .. } => *status,
            RelayError::TransferFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RelayError::BadRequest(msg) => msg,
            RelayError::Rejected { message, .. } => message,
            RelayError::TransferFailed(_) => "File upload failed",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            RelayError::TransferFailed(details) => json!({
                "error": self.message(),
                "details": details,
            }),
            _ => json!({ "error": self.message() }),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        RelayError::BadRequest(message.into())
    }

    pub fn transfer_failed(details: impl Into<String>) -> Self {
        RelayError::TransferFailed(details.into())
    }
}

impl From<TransferError> for RelayError {
    fn from(err: TransferError) -> Self {
        tracing::error!("Upload error: {}", err);
        RelayError::TransferFailed(err.to_string())
    }
}

impl From<MultipartError> for RelayError {
    fn from(err: MultipartError) -> Self {
        RelayError::Rejected {
            status: err.status(),
            message: err.body_text(),
        }
    }
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::TransferFailed(details) => write!(f, "{}: {}", self.message(), details),
            _ => write!(f, "{}", self.message()),
        }
    }
}

impl std::error::Error for RelayError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for RelayError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
