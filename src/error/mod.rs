//! Unified error handling for Portal Gate

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Errors raised by the pure gate core.
///
/// These are programming errors (an inconsistent context, a malformed label in
/// configuration), never runtime conditions caused by an inbound request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GateError {
    #[error("Invalid domain context: {0}")]
    InvalidContext(String),

    #[error("Invalid tenant key: {0}")]
    InvalidTenantKey(String),

    #[error("Unknown caller role: {0}")]
    UnknownRole(String),

    #[error("Unknown tenant class: {0}")]
    UnknownClass(String),
}

/// Errors raised while asking the role provider who the caller is
#[derive(Error, Debug)]
pub enum RoleProviderError {
    #[error("Role provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Role provider returned status {0}")]
    Status(u16),

    #[error("Role provider error: {0}")]
    Other(String),
}

/// HTTP-facing error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Gate error: {0}")]
    Gate(#[from] GateError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            AppError::Gate(e) => {
                tracing::error!("Gate invariant violated: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "gate_error",
                    "The request could not be routed".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
        });

        (status, body).into_response()
    }
}
