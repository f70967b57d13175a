//! API error handling.
//!
//! Maps domain errors onto HTTP status codes and a `{ "error": message }`
//! JSON body. Storage failures are logged here and reported to the client
//! with a generic message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::TaskflowError;

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API error response containing status code and message.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Task not found")
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<TaskflowError> for ApiError {
    fn from(error: TaskflowError) -> Self {
        match error {
            TaskflowError::NotFound(_) => Self::not_found(),
            TaskflowError::InvalidData(msg) => Self::bad_request(msg),
            // Internal errors should not expose details to clients.
            other => {
                tracing::error!(error = %other, storage = other.is_storage(), "request failed");
                Self::internal("Internal storage error")
            }
        }
    }
}
