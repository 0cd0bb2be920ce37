//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps session guard violations and grid edit rejections to HTTP status
//! codes with a consistent JSON error body. Backend cycle failures are NOT
//! errors at this layer — they travel inside the session view as outcomes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use zksq_core::GridError;
use zksq_workflow::SessionError;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "CONFLICT").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404): unknown session or out-of-bounds cell.
    #[error("not found: {0}")]
    NotFound(String),

    /// Request content is invalid (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation conflicts with the session's state (409): wrong
    /// phase, locked cell, or missing proof.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The HTTP status code and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Construct a not-found error for a session id.
    pub fn session_not_found(id: uuid::Uuid) -> Self {
        Self::NotFound(format!("session {id} does not exist"))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Never expose internal error messages to clients.
        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if let Self::Internal(_) = &self {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Convert session guard violations to API errors.
impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match &err {
            SessionError::WrongPhase { .. }
            | SessionError::ProofNotReady
            | SessionError::NoProofToVerify => Self::Conflict(err.to_string()),
            SessionError::Grid(grid) => match grid {
                GridError::OutOfBounds { .. } => Self::NotFound(err.to_string()),
                GridError::LockedCell { .. } => Self::Conflict(err.to_string()),
            },
        }
    }
}
