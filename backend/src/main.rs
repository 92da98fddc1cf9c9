use std::sync::Arc;

use aws_sdk_s3::Client as S3Client;

use tracing_subscriber::{fmt, EnvFilter};
use upload_relay::{media_storage::S3Store, server, types::BackendConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine, the process environment is used as is
    dotenvy::dotenv().ok();

    let config = Arc::new(BackendConfig::from_env()?);

    // Use JSON format for staging/production, regular format for development
    if config.environment.json_logs() {
        fmt()
            .json()
            .with_env_filter(EnvFilter::from_default_env())
            .init();
    } else {
        fmt().with_env_filter(EnvFilter::from_default_env()).init();
    }

    tracing::info!(
        bucket = %config.bucket_name,
        region = %config.region,
        endpoint = ?config.endpoint,
        "Configured object storage"
    );

    let s3_client = Arc::new(S3Client::from_conf(config.s3_client_config().await));
    let store = Arc::new(S3Store::new(s3_client));

    server::start(config, store).await
}
