//! Error types for tuneful-api
//!
//! Every failure a client can see is rendered as `{"message": ...}` with the
//! matching status code. Storage faults are logged in full and reported
//! without internal detail.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::schema::ValidationError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// `Accept` header excludes the response media type (406)
    #[error("Request must accept {0} data")]
    NotAcceptable(String),

    /// Request body has the wrong `Content-Type` (415)
    #[error("Request must contain {0} data")]
    UnsupportedMediaType(String),

    /// Malformed request that never reached validation (400)
    #[error("{0}")]
    BadRequest(String),

    /// Upload body could not be read, status decided by axum (400, 413, ...)
    #[error(transparent)]
    Multipart(#[from] MultipartError),

    /// Payload failed schema validation (422)
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Referenced song or file is absent (404)
    #[error("{0}")]
    NotFound(String),

    /// Resource store or blob store failure (500)
    #[error("Storage error: {0}")]
    Storage(#[from] tuneful_common::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Multipart(err) => err.status(),
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Storage(err) => {
                error!("Request failed: {}", err);
                "Internal server error".to_string()
            }
            ApiError::Multipart(err) => err.body_text(),
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
