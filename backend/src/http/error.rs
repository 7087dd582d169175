//! HTTP error handling and response types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::services::forwarder::{RelayError, BACKEND_FAILURE, INTERNAL_FAILURE};

/// Error body of the relay: `{ "error": ..., "details": ... }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    /// Error label
    pub error: String,
    /// Whatever detail is available (backend body or failure message)
    pub details: Value,
}

impl ApiError {
    pub fn new(error: impl Into<String>, details: impl Into<Value>) -> Self {
        Self {
            error: error.into(),
            details: details.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    /// The backend answered with a failure status
    Backend { status: u16, details: Value },
    /// Transport failure, unreadable request, or anything unexpected
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            AppError::Backend { status, details } => (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                ApiError::new(BACKEND_FAILURE, details),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new(INTERNAL_FAILURE, msg),
            ),
        };

        (status, Json(error)).into_response()
    }
}

impl From<RelayError> for AppError {
    fn from(err: RelayError) -> Self {
        match err {
            RelayError::Backend { status, details } => AppError::Backend { status, details },
            RelayError::Transport(msg) => AppError::Internal(msg),
        }
    }
}
