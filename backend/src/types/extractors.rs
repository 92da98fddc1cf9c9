//! Custom extractors for request parsing

use axum::{
    body::Bytes,
    extract::{
        multipart::{Field, MultipartError, MultipartRejection},
        FromRequest, Multipart, Request,
    },
    http::StatusCode,
};
use thiserror::Error;

use crate::types::error::AppError;

/// Multipart field that carries the uploaded file
pub const FILE_FIELD_NAME: &str = "image";

/// Content type assumed when the file part does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Reasons a multipart upload cannot be ingested
#[derive(Error, Debug, PartialEq, Eq)]
pub enum IngestError {
    /// No file field named `image` was sent
    #[error("no file uploaded")]
    MissingFile,

    /// More than one file field named `image` was sent
    #[error("more than one file uploaded")]
    MultipleFiles,

    /// The request body exceeds the configured limit
    #[error("request body too large")]
    TooLarge,

    /// The multipart stream cannot be parsed
    #[error("malformed multipart body: {0}")]
    Malformed(String),
}

impl From<MultipartError> for IngestError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            Self::TooLarge
        } else {
            Self::Malformed(err.body_text())
        }
    }
}

/// A request without a multipart content type carries no file at all
impl From<MultipartRejection> for IngestError {
    fn from(rejection: MultipartRejection) -> Self {
        match rejection {
            MultipartRejection::InvalidBoundary(_) => Self::MissingFile,
            other => Self::Malformed(other.body_text()),
        }
    }
}

/// A single file read fully into memory from a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Raw file contents
    pub bytes: Bytes,
    /// Filename as sent by the client, unmodified
    pub file_name: String,
    /// Content type declared for the file part
    pub content_type: String,
}

impl UploadedFile {
    /// Reads the `image` file field out of a multipart stream
    ///
    /// Other fields are drained and ignored. A field only counts as a file
    /// when its part carries a `filename`.
    ///
    /// # Errors
    ///
    /// See [`IngestError`]
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, IngestError> {
        let mut uploaded: Option<Self> = None;

        while let Some(field) = multipart.next_field().await? {
            if !is_file_field(&field) {
                // Drain so the parser can move on to the next part
                field.bytes().await?;
                continue;
            }

            if uploaded.is_some() {
                return Err(IngestError::MultipleFiles);
            }

            let file_name = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or(DEFAULT_CONTENT_TYPE)
                .to_string();
            let bytes = field.bytes().await?;

            uploaded = Some(Self {
                bytes,
                file_name,
                content_type,
            });
        }

        uploaded.ok_or(IngestError::MissingFile)
    }
}

fn is_file_field(field: &Field<'_>) -> bool {
    field.name() == Some(FILE_FIELD_NAME) && field.file_name().is_some()
}

impl<S> FromRequest<S> for UploadedFile
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(IngestError::from)?;

        Ok(Self::from_multipart(multipart).await?)
    }
}
