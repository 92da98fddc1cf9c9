use axum::http::StatusCode;

/// Liveness probe
///
/// Always 200 with an empty body; the backend is deliberately not consulted.
#[allow(clippy::unused_async)]
pub async fn handler() -> StatusCode {
    StatusCode::OK
}
