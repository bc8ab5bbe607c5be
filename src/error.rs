//! Error types for s3-image-bridge
//!
//! All request failures are converted to `AppError`,
//! which implements `IntoResponse` so callers always get a JSON body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Application-wide error type
///
/// Each variant is one failure class of the upload pipeline.
/// Everything past request parsing is reported as a 500.
#[derive(Debug, Error)]
pub enum AppError {
    /// Image payload is not valid base64 (400)
    #[error("Invalid base64 image data: {0}")]
    InvalidInput(String),

    /// Request body is not the expected JSON shape (422)
    #[error("Unprocessable entity: {0}")]
    Unprocessable(String),

    /// Request body exceeded a transport limit (413)
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    /// Storage client could not be constructed (500)
    #[error("Storage backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Configuration error, including a bucket the backend does not know (500)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Backend refused the request (500)
    #[error("Access denied: {0}")]
    Authorization(String),

    /// Any other error code reported by the backend (500)
    #[error("S3 error: {0}")]
    Backend(String),

    /// Anything not classified above (500)
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    /// Short label used for logs and the error counter
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Unprocessable(_) => "unprocessable",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::BackendUnavailable(_) => "backend_unavailable",
            AppError::Config(_) => "configuration",
            AppError::Authorization(_) => "authorization",
            AppError::Backend(_) => "backend",
            AppError::Unexpected(_) => "unexpected",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(rejection.body_text()),
            _ => AppError::Unprocessable(rejection.body_text()),
        }
    }
}

impl IntoResponse for AppError {
    /// Convert error to HTTP response
    ///
    /// The body is always `{"detail": "<message>"}`.
    fn into_response(self) -> Response {
        use axum::Json;

        let status = self.status_code();
        let error_type = self.kind();

        if status.is_server_error() {
            tracing::error!(error = %self, error_type, "Request failed");
        } else {
            tracing::warn!(error = %self, error_type, "Request rejected");
        }

        use crate::metrics::ERRORS_TOTAL;
        ERRORS_TOTAL.with_label_values(&[error_type]).inc();

        let body = Json(serde_json::json!({
            "detail": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
