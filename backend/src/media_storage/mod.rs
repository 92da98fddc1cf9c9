//! Object storage for uploaded files
mod error;

use std::sync::Arc;

use aws_sdk_s3::{primitives::ByteStream, Client as S3Client};
use axum::body::Bytes;
use serde::Serialize;

pub use error::{BucketError, BucketResult};

/// Acknowledgment returned by the backend for a stored object
///
/// Passed through to the client untouched, using S3's field names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ObjectMetadata {
    /// Entity tag of the stored object
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e_tag: Option<String>,
    /// Version of the stored object, when bucket versioning is enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    /// Server-side encryption applied by the backend
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server_side_encryption: Option<String>,
    /// Bucket the object was written to
    pub bucket: String,
    /// Key the object was written under
    pub key: String,
    /// Public URL of the object, filled in once the access URL is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// An S3-compatible object store
#[async_trait::async_trait]
pub trait ObjectStore: Send + Sync {
    /// Stores `body` under `key` in `bucket`
    ///
    /// # Errors
    ///
    /// Returns `BucketError` for any backend failure. The call is made once,
    /// without retries.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> BucketResult<ObjectMetadata>;
}

/// Object store backed by the AWS S3 SDK
pub struct S3Store {
    s3_client: Arc<S3Client>,
}

impl S3Store {
    /// Creates a new S3 store
    ///
    /// # Arguments
    ///
    /// * `s3_client` - Pre-configured S3 client (see `BackendConfig::s3_client_config`)
    #[must_use]
    pub const fn new(s3_client: Arc<S3Client>) -> Self {
        Self { s3_client }
    }
}

#[async_trait::async_trait]
impl ObjectStore for S3Store {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> BucketResult<ObjectMetadata> {
        let output = self
            .s3_client
            .put_object()
            .bucket(bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(body))
            .send()
            .await?;

        Ok(ObjectMetadata {
            e_tag: output.e_tag().map(ToString::to_string),
            version_id: output.version_id().map(ToString::to_string),
            server_side_encryption: output
                .server_side_encryption()
                .map(|sse| sse.as_str().to_string()),
            bucket: bucket.to_string(),
            key: key.to_string(),
            location: None,
        })
    }
}

/// In-memory test double for `ObjectStore`
#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex,
    };

    use axum::body::Bytes;

    use super::{BucketError, BucketResult, ObjectMetadata, ObjectStore};

    /// Behaviour of the mock on every `put_object` call
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum MockBehavior {
        /// Accept the object and return a fake ETag
        Succeed,
        /// Fail with an upstream error carrying `MockObjectStore::FAILURE_CAUSE`
        Fail,
        /// Panic inside the call
        Panic,
    }

    /// A stored call, as seen by the mock
    #[derive(Debug, Clone)]
    pub struct PutCall {
        /// Target bucket
        pub bucket: String,
        /// Target key
        pub key: String,
        /// Payload
        pub body: Bytes,
        /// Declared content type
        pub content_type: String,
    }

    /// In-memory object store that records calls
    pub struct MockObjectStore {
        behavior: MockBehavior,
        calls: AtomicUsize,
        puts: Mutex<Vec<PutCall>>,
    }

    impl MockObjectStore {
        /// Cause embedded in simulated failures
        pub const FAILURE_CAUSE: &'static str = "simulated: InvalidAccessKeyId secret-detail";

        /// Creates a mock with the given behaviour and no recorded calls
        #[must_use]
        pub const fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                calls: AtomicUsize::new(0),
                puts: Mutex::new(Vec::new()),
            }
        }

        /// Number of `put_object` calls made so far
        #[must_use]
        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        /// Successful puts recorded so far
        ///
        /// # Panics
        ///
        /// If the internal lock is poisoned
        #[must_use]
        pub fn puts(&self) -> Vec<PutCall> {
            self.puts.lock().expect("mock lock poisoned").clone()
        }
    }

    #[async_trait::async_trait]
    impl ObjectStore for MockObjectStore {
        async fn put_object(
            &self,
            bucket: &str,
            key: &str,
            body: Bytes,
            content_type: &str,
        ) -> BucketResult<ObjectMetadata> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            match self.behavior {
                MockBehavior::Fail => {
                    return Err(BucketError::UpstreamError(Self::FAILURE_CAUSE.to_string()))
                }
                MockBehavior::Panic => panic!("mock object store panicked"),
                MockBehavior::Succeed => {}
            }

            let e_tag = format!("\"{:032x}\"", body.len());
            self.puts.lock().expect("mock lock poisoned").push(PutCall {
                bucket: bucket.to_string(),
                key: key.to_string(),
                body,
                content_type: content_type.to_string(),
            });

            Ok(ObjectMetadata {
                e_tag: Some(e_tag),
                version_id: None,
                server_side_encryption: None,
                bucket: bucket.to_string(),
                key: key.to_string(),
                location: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_metadata_uses_s3_field_names() {
        let metadata = ObjectMetadata {
            e_tag: Some("\"abc\"".to_string()),
            version_id: Some("v1".to_string()),
            server_side_encryption: Some("AES256".to_string()),
            bucket: "media".to_string(),
            key: "k".to_string(),
            location: Some("https://media.s3.amazonaws.com/k".to_string()),
        };

        assert_eq!(
            serde_json::to_value(metadata).unwrap(),
            json!({
                "ETag": "\"abc\"",
                "VersionId": "v1",
                "ServerSideEncryption": "AES256",
                "Bucket": "media",
                "Key": "k",
                "Location": "https://media.s3.amazonaws.com/k",
            })
        );
    }

    #[test]
    fn test_metadata_omits_absent_fields() {
        let metadata = ObjectMetadata {
            bucket: "media".to_string(),
            key: "k".to_string(),
            ..ObjectMetadata::default()
        };

        assert_eq!(
            serde_json::to_value(metadata).unwrap(),
            json!({ "Bucket": "media", "Key": "k" })
        );
    }

    #[tokio::test]
    async fn test_mock_counts_calls_and_records_puts() {
        use super::mock::{MockBehavior, MockObjectStore};

        let store = MockObjectStore::new(MockBehavior::Succeed);
        let metadata = store
            .put_object("bucket", "key-1", Bytes::from_static(b"hello"), "text/plain")
            .await
            .unwrap();

        assert_eq!(store.call_count(), 1);
        assert_eq!(metadata.key, "key-1");
        assert!(metadata.e_tag.is_some());
        assert!(metadata.location.is_none());

        let puts = store.puts();
        assert_eq!(puts.len(), 1);
        assert_eq!(puts[0].body, Bytes::from_static(b"hello"));
        assert_eq!(puts[0].content_type, "text/plain");
    }

    #[tokio::test]
    async fn test_mock_failure_is_an_upstream_error() {
        use super::mock::{MockBehavior, MockObjectStore};

        let store = MockObjectStore::new(MockBehavior::Fail);
        let err = store
            .put_object("bucket", "key", Bytes::new(), "text/plain")
            .await
            .unwrap_err();

        assert!(matches!(err, BucketError::UpstreamError(_)));
        assert_eq!(store.call_count(), 1);
        assert!(store.puts().is_empty());
    }
}
