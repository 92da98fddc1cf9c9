//! Upload relay service
//!
//! Accepts a single file over multipart upload and relays it to an
//! S3-compatible bucket.

#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    dead_code
)]

/// Storage key generation
pub mod key;

/// Object storage backends
pub mod media_storage;

/// HTTP routes
pub mod routes;

/// HTTP server bootstrap
pub mod server;

/// Application state
pub mod state;

/// Shared types: configuration, errors and extractors
pub mod types;
