//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes:
//! `{"error": "<kind>", "message": "<text>"}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use songbook_core::ValidationError;

use crate::db::StoreError;

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Body or query string could not be decoded (400)
    Malformed { message: String },

    /// Validation failed (400)
    Validation(ValidationError),

    /// Persistence operation failed (status depends on the kind)
    Store(StoreError),

    /// A handler panicked (500)
    Panicked { detail: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Malformed { .. } | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Panicked { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(e) => match e {
                StoreError::SongExists { .. } => StatusCode::CONFLICT,
                StoreError::SongNotFound { .. } => StatusCode::NOT_FOUND,
                StoreError::NoChanges { .. } => StatusCode::BAD_REQUEST,
                StoreError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
                StoreError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::Malformed { message } => json!({
                "error": "malformed_request",
                "message": message
            }),
            Self::Validation(e) => json!({
                "error": "validation_error",
                "message": e.to_string()
            }),
            Self::Store(e @ StoreError::SongExists { .. }) => {
                tracing::warn!(error = %e, "song already exists");
                json!({
                    "error": "already_exists",
                    "message": "song already exists"
                })
            }
            Self::Store(StoreError::SongNotFound { .. }) => json!({
                "error": "not_found",
                "message": "song not found"
            }),
            Self::Store(StoreError::NoChanges { .. }) => json!({
                "error": "no_changes",
                "message": "nothing to update: provide link, lyrics or release_date"
            }),
            Self::Store(e @ StoreError::Timeout { .. }) => {
                tracing::error!(error = %e, "storage timeout");
                json!({
                    "error": "timeout",
                    "message": "the operation timed out"
                })
            }
            Self::Store(e @ StoreError::Storage { .. }) => {
                // Log the actual error, return generic message
                tracing::error!(error = %e, "storage error");
                json!({
                    "error": "internal_error",
                    "message": "an internal error occurred"
                })
            }
            Self::Panicked { detail } => {
                tracing::error!(panic = %detail, "handler panicked");
                json!({
                    "error": "internal_error",
                    "message": "an internal error occurred"
                })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}
