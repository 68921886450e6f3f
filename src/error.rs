//! Unified error types for the kill switch service.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::api::handlers::ErrorResponse;
use crate::store::StoreBackend;

/// Unified error type for configuration loading.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration loaded but failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Status store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The underlying medium (file, connection) could not be used.
    #[error("{backend} store unavailable: {reason}")]
    Unavailable {
        /// Backend that failed.
        backend: StoreBackend,
        /// Underlying cause.
        reason: String,
    },
}

impl StoreError {
    /// Build an `Unavailable` error from any displayable cause.
    pub fn unavailable(backend: StoreBackend, reason: impl std::fmt::Display) -> Self {
        StoreError::Unavailable {
            backend,
            reason: reason.to_string(),
        }
    }
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::unavailable(StoreBackend::Mongo, err)
    }
}

/// Errors surfaced by the HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// API key missing or not equal to the configured secret.
    #[error("Invalid API Key")]
    Unauthorized,

    /// Reading the flag failed.
    #[error("Error reading app status")]
    ReadFailed(#[source] StoreError),

    /// Toggling the flag failed.
    #[error("Error updating app status")]
    UpdateFailed(#[source] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, details) = match &self {
            ApiError::Unauthorized => (StatusCode::FORBIDDEN, None),
            ApiError::ReadFailed(err) | ApiError::UpdateFailed(err) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Some(err.to_string()))
            }
        };

        let body = ErrorResponse {
            error: self.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
