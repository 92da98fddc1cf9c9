/// Process configuration
pub mod environment;
/// API error envelope
pub mod error;
/// Request extractors
pub mod extractors;

pub use environment::{BackendConfig, ConfigError, Environment};
pub use error::AppError;
pub use extractors::{IngestError, UploadedFile};
