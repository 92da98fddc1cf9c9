use axum::{extract::State, Json};
use serde::Serialize;
use tracing::{field, instrument, Span};

use crate::{
    key::generate_key,
    media_storage::ObjectMetadata,
    state::AppState,
    types::{AppError, UploadedFile},
};

/// Body of a successful upload
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    /// Fixed confirmation message
    pub message: &'static str,
    /// Storage key the file was written under
    pub file_key: String,
    /// Public URL of the stored file
    pub file_url: String,
    /// Backend acknowledgment, passed through untouched
    pub data: ObjectMetadata,
}

/// Relays a multipart `image` file to the object store
///
/// 1. The `UploadedFile` extractor buffers the file (400/413 on bad input)
/// 2. A fresh storage key is generated from a v4 UUID and the filename
/// 3. The bytes are put to the configured bucket, once, without retries
/// 4. The access URL is derived from the configured endpoint or bucket and
///    recorded as the acknowledgment's `Location`
///
/// # Errors
///
/// - `IngestError` rejections from the extractor, before any backend call
/// - `BucketError` from the store, mapped to a generic 500
#[instrument(skip_all, fields(file_key = field::Empty))]
pub async fn upload_file(
    State(state): State<AppState>,
    upload: UploadedFile,
) -> Result<Json<UploadResponse>, AppError> {
    let file_key = generate_key(&upload.file_name);
    Span::current().record("file_key", file_key.as_str());

    tracing::info!(
        size = upload.bytes.len(),
        content_type = %upload.content_type,
        "Received upload"
    );

    let mut data = state
        .store
        .put_object(
            &state.config.bucket_name,
            &file_key,
            upload.bytes,
            &upload.content_type,
        )
        .await?;

    let file_url = state.config.file_url(&file_key);
    data.location = Some(file_url.clone());

    tracing::info!(file_url = %file_url, "Upload stored");

    Ok(Json(UploadResponse {
        message: "File uploaded successfully",
        file_key,
        file_url,
        data,
    }))
}
