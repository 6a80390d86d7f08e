//! Application error types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use explore_core::upstream::RelayError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Convenience alias for handler return types.
pub type AppResult<T> = Result<T, AppError>;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Application-level errors.
///
/// The widget only distinguishes success from failure, so every variant is
/// reported as `500 {"error": "Internal Server Error"}`. The detail goes to
/// the log, never to the client.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid request body: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("Internal server error")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Internal(detail) => error!("Internal error: {detail}"),
            other => error!("Request failed: {other}"),
        }
        let body = Json(ErrorResponse {
            error: "Internal Server Error".to_string(),
        });
        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
