//! Error handling for the bookshelf HTTP layer

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Error body returned to clients: `{"error": "<message>"}`
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Application error types that map to HTTP responses
#[derive(Error, Debug)]
pub enum AppError {
    /// Request body could not be decoded (422)
    #[error("unprocessable entity: {message}")]
    Unprocessable { message: String },

    /// Missing input or failed persistence call (400)
    #[error("bad request: {message}")]
    BadRequest { message: String },

    /// Handler did not finish within the configured timeout (408)
    #[error("request timeout: {message}")]
    Timeout { message: String },

    /// Middleware failure with no more specific mapping (500)
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create an unprocessable entity error
    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable {
            message: message.into(),
        }
    }

    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn timeout() -> Self {
        Self::Timeout {
            message: "Request timed out".to_string(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Timeout { .. } => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            AppError::Unprocessable { message }
            | AppError::BadRequest { message }
            | AppError::Timeout { message }
            | AppError::Internal { message } => message,
        };

        tracing::warn!(
            status_code = %status.as_u16(),
            error = %message,
            "request error"
        );

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
