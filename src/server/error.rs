//! Boundary error type for HTTP handlers.
//!
//! Module errors convert into [`ApiError`], which picks the status code and
//! renders the body:
//!
//! | Variant | Status | Body |
//! |---|---|---|
//! | `Validation` | 400 | `{"error": ...}` |
//! | `NotFound` | 404 | `{"error": ...}` |
//! | `ImageNotFound` | 404 | plain text |
//! | `Internal` | 500 | `{"error": ...}` |

use crate::annotation::AnnotationError;
use crate::imaging::BackendError;
use crate::scan::ScanError;
use crate::starred::StarredError;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    /// Missing file behind `/image` or `/thumbnail`.
    #[error("Image not found")]
    ImageNotFound,
    #[error("{0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) | ApiError::ImageNotFound => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        match self {
            ApiError::ImageNotFound => (status, "Image not found").into_response(),
            ApiError::Internal(message) => {
                tracing::error!(error = %message, "request failed");
                (status, Json(ErrorResponse { error: message })).into_response()
            }
            other => (
                status,
                Json(ErrorResponse {
                    error: other.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<ScanError> for ApiError {
    fn from(err: ScanError) -> Self {
        match err {
            ScanError::NotFound(_) => ApiError::NotFound(err.to_string()),
        }
    }
}

impl From<AnnotationError> for ApiError {
    fn from(err: AnnotationError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<StarredError> for ApiError {
    fn from(err: StarredError) -> Self {
        match err {
            StarredError::Validation(message) => ApiError::Validation(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(err: std::io::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ApiError {
    fn from(err: tokio::task::JoinError) -> Self {
        ApiError::Internal(format!("background task failed: {err}"))
    }
}
