//! Error handling module
//!
//! Centralized error types and HTTP response conversion.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;
use crate::idempotency::IdempotencyError;
use crate::repository::RepositoryError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Missing required header: {0}")]
    MissingHeader(String),

    #[error(transparent)]
    IdempotencyInProgress(#[from] IdempotencyError),

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Internal server error")]
    Persistence(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status and stable error code for this error
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            // 400 Bad Request
            AppError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "invalid_request"),
            AppError::MissingHeader(_) => (StatusCode::BAD_REQUEST, "missing_header"),

            // 409 Conflict
            AppError::IdempotencyInProgress(_) => (StatusCode::CONFLICT, "idempotency_in_progress"),

            // Domain errors - map by kind, never by message text
            AppError::Domain(domain_err) => {
                let status = if domain_err.is_not_found() {
                    StatusCode::NOT_FOUND
                } else if domain_err.is_conflict_error() {
                    StatusCode::CONFLICT
                } else {
                    StatusCode::BAD_REQUEST
                };
                (status, domain_err.error_code())
            }

            // 500 Internal Server Error
            AppError::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "persistence_failure"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub error_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code) = self.status_and_code();

        // Storage detail stays in the logs
        let details = match &self {
            AppError::InvalidRequest(msg) => Some(msg.clone()),
            AppError::MissingHeader(header) => Some(header.clone()),
            AppError::Persistence(e) => {
                tracing::error!("Persistence failure: {:?}", e);
                None
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                None
            }
            AppError::IdempotencyInProgress(_) | AppError::Domain(_) => None,
        };

        let error = match &self {
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error,
            error_code: error_code.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}
