//! Process configuration read once from the environment at startup

use std::env;

use aws_config::{retry::RetryConfig, BehaviorVersion, Region};
use aws_credential_types::Credentials;
use thiserror::Error;

const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
/// 15 MiB
const DEFAULT_MAX_UPLOAD_BYTES: usize = 15 * 1024 * 1024;

/// Errors raised while reading configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is missing or empty
    #[error("{0} environment variable is not set")]
    Missing(&'static str),

    /// A variable is set but cannot be parsed
    #[error("invalid value for {name}: {value}")]
    Invalid {
        /// Variable name
        name: &'static str,
        /// Offending value
        value: String,
    },
}

/// Deployment stage, only used to pick the log format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment
    Development,
}

impl Environment {
    /// Whether logs should be emitted as JSON
    #[must_use]
    pub const fn json_logs(self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Static backend credentials
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    /// Access key id
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
    /// Optional session token for temporary credentials
    pub session_token: Option<String>,
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Immutable backend and listener configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendConfig {
    /// Deployment stage
    pub environment: Environment,
    /// Signing region
    pub region: String,
    /// Static credentials; `None` falls back to the default provider chain
    pub credentials: Option<StaticCredentials>,
    /// Custom endpoint; switches the client to path-style addressing
    pub endpoint: Option<String>,
    /// Target bucket
    pub bucket_name: String,
    /// Listen host
    pub host: String,
    /// Listen port
    pub port: u16,
    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,
}

impl BackendConfig {
    /// Reads configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if `BUCKET_NAME` is not set
    /// Returns `ConfigError::Invalid` if `PORT`, `MAX_UPLOAD_BYTES` or `APP_ENV` cannot be parsed
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Reads configuration through an arbitrary variable lookup
    ///
    /// Empty values are treated as unset.
    ///
    /// # Errors
    ///
    /// Same as [`BackendConfig::from_env`]
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let environment = match var("APP_ENV")
            .unwrap_or_else(|| "development".to_string())
            .to_lowercase()
            .as_str()
        {
            "production" => Environment::Production,
            "staging" => Environment::Staging,
            "development" => Environment::Development,
            other => {
                return Err(ConfigError::Invalid {
                    name: "APP_ENV",
                    value: other.to_string(),
                })
            }
        };

        let bucket_name = var("BUCKET_NAME").ok_or(ConfigError::Missing("BUCKET_NAME"))?;

        let credentials = match (var("ACCESS_KEY"), var("SECRET_KEY")) {
            (Some(access_key), Some(secret_key)) => Some(StaticCredentials {
                access_key,
                secret_key,
                session_token: var("SESSION_TOKEN"),
            }),
            _ => None,
        };

        let port = match var("PORT") {
            Some(value) => value.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value,
            })?,
            None => DEFAULT_PORT,
        };

        let max_upload_bytes = match var("MAX_UPLOAD_BYTES") {
            Some(value) => match value.parse::<usize>() {
                Ok(limit) if limit > 0 => limit,
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "MAX_UPLOAD_BYTES",
                        value,
                    })
                }
            },
            None => DEFAULT_MAX_UPLOAD_BYTES,
        };

        Ok(Self {
            environment,
            region: var("REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            credentials,
            endpoint: var("ENDPOINT"),
            bucket_name,
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            max_upload_bytes,
        })
    }

    /// Public URL of an object stored under `key`
    ///
    /// `<endpoint>/<key>` with a custom endpoint, otherwise the
    /// virtual-hosted-style `https://<bucket>.s3.amazonaws.com/<key>`.
    #[must_use]
    pub fn file_url(&self, key: &str) -> String {
        match &self.endpoint {
            Some(endpoint) => format!("{endpoint}/{key}"),
            None => format!("https://{}.s3.amazonaws.com/{key}", self.bucket_name),
        }
    }

    /// Shared AWS configuration
    ///
    /// SDK retries are disabled: a failed put is surfaced to the caller as is.
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.region.clone()))
            .retry_config(RetryConfig::disabled());

        if let Some(credentials) = &self.credentials {
            loader = loader.credentials_provider(Credentials::new(
                credentials.access_key.clone(),
                credentials.secret_key.clone(),
                credentials.session_token.clone(),
                None,
                "upload-relay-environment",
            ));
        }

        if let Some(endpoint_url) = &self.endpoint {
            loader = loader.endpoint_url(endpoint_url);
        }

        loader.load().await
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Custom endpoints (MinIO, LocalStack, R2) generally don't resolve
        // bucket subdomains
        if self.endpoint.is_some() {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }
}
