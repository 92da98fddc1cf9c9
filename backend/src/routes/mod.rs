mod health;
/// Upload endpoint
pub mod upload;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Creates the router with all handler routes
pub fn handler() -> Router<AppState> {
    Router::new()
        .route("/", get(health::handler))
        .route("/upload", post(upload::upload_file))
}
