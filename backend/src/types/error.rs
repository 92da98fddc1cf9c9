//! Universal error handling for the API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::{media_storage::BucketError, types::extractors::IngestError};

/// Error body returned to clients: `{"error": "<message>"}`
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    /// Human-readable error message
    pub error: &'static str,
}

/// Application error type that wraps the API error response
#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    inner: ApiErrorResponse,
}

impl AppError {
    /// Message for backend failures
    pub const UPLOAD_FAILED: &'static str = "Failed to upload file";
    /// Message for failures that were not anticipated by the pipeline
    pub const PROCESSING_FAILED: &'static str = "Failed to process upload";

    /// Create a new application error
    #[must_use]
    pub const fn new(status: StatusCode, msg: &'static str) -> Self {
        Self {
            status,
            inner: ApiErrorResponse { error: msg },
        }
    }

    /// Generic 500 for unexpected failures
    #[must_use]
    pub const fn unhandled() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, Self::PROCESSING_FAILED)
    }

    /// HTTP status of this error
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Message sent to the client
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.inner.error
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self.status.as_u16() {
            400..=499 => tracing::warn!("Client error: {} - {}", self.status, self.inner.error),
            500..=599 => tracing::error!("Server error: {} - {}", self.status, self.inner.error),
            _ => {}
        }

        (self.status, Json(self.inner)).into_response()
    }
}

/// Convert ingestion errors to application errors
impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        use IngestError::{Malformed, MissingFile, MultipleFiles, TooLarge};

        match &err {
            MissingFile => Self::new(StatusCode::BAD_REQUEST, "No file uploaded"),
            MultipleFiles => Self::new(StatusCode::BAD_REQUEST, "Only one file may be uploaded"),
            TooLarge => Self::new(StatusCode::PAYLOAD_TOO_LARGE, "File too large"),
            Malformed(reason) => {
                tracing::debug!("Malformed multipart body: {reason}");
                Self::new(StatusCode::BAD_REQUEST, "Malformed multipart body")
            }
        }
    }
}

/// Convert bucket errors to application errors
///
/// The cause is logged here and never reaches the response body.
impl From<BucketError> for AppError {
    fn from(err: BucketError) -> Self {
        match &err {
            BucketError::UpstreamError(msg) => tracing::error!("S3 upstream error: {msg}"),
            BucketError::S3Error(msg) | BucketError::AwsError(msg) => {
                tracing::error!("S3/AWS error: {msg}");
            }
        }

        Self::new(StatusCode::INTERNAL_SERVER_ERROR, Self::UPLOAD_FAILED)
    }
}
