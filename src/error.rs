use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;
use thiserror::Error;

use crate::{repository::RepositoryError, storage::StorageError};

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid file type: {0}")]
    InvalidFileType(String),

    #[error("No file provided")]
    MissingFile,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Multipart error: {0}")]
    Multipart(String),

    #[error("Failed to persist photo metadata: {0}")]
    PersistenceFailure(#[from] RepositoryError),

    #[error("Storage failure: {0}")]
    StorageFailure(#[from] StorageError),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidFileType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::MissingFile | AppError::Multipart(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::PersistenceFailure(_)
            | AppError::StorageFailure(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Convert `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();

        // Server-side failures are logged, never echoed to the client
        let error_message = if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
            "Internal server error".to_string()
        } else {
            match self {
                AppError::NotFound(msg) => msg,
                other => other.to_string(),
            }
        };

        // Return standardized JSON error response
        let body = Json(json!({"error": error_message, "status": status.as_u16()}));
        (status, body).into_response()
    }
}
