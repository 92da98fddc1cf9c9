use axum::response::Response;
use axum_test::multipart::{MultipartForm, Part};
use http_body_util::BodyExt;

/// Boundary for hand-written bodies that a form builder cannot produce
pub const BOUNDARY: &str = "------------------------upload-relay-7d9f3a";

/// File part with a filename and a declared content type
pub fn file_part(file_name: &str, content_type: &str, data: &[u8]) -> Part {
    Part::bytes(data.to_vec())
        .file_name(file_name)
        .mime_type(content_type)
}

/// Form with a single `image` file part
pub fn image_form(file_name: &str, content_type: &str, data: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part("image", file_part(file_name, content_type, data))
}

/// Multipart content type matching `BOUNDARY`
pub fn raw_multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Parse response body to JSON
pub async fn parse_response_body(response: Response) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
