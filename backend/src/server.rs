use std::{any::Any, sync::Arc};

use axum::{
    extract::DefaultBodyLimit,
    response::{IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::{
    media_storage::ObjectStore,
    routes,
    state::AppState,
    types::{AppError, BackendConfig},
};

/// Builds the application router with its middleware stack
///
/// The body limit bounds how much of an upload is buffered in memory.
/// Panics anywhere in a request are turned into a generic 500.
pub fn app(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes;

    routes::handler()
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");

    tracing::error!("Unhandled failure while processing request: {detail}");

    AppError::unhandled().into_response()
}

/// Starts the server with the given configuration and object store
///
/// # Errors
///
/// Returns an error if the server fails to bind to the configured address
pub async fn start(config: Arc<BackendConfig>, store: Arc<dyn ObjectStore>) -> anyhow::Result<()> {
    let listener = TcpListener::bind((config.host.as_str(), config.port)).await?;
    let addr = listener.local_addr()?;

    let router = app(AppState::new(store, config));

    tracing::info!("🔄 Upload relay started on http://{addr}");

    axum::serve(listener, router.into_make_service())
        .await
        .map_err(anyhow::Error::from)
}
