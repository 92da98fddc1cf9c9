use std::{collections::HashMap, sync::Arc};

use axum::{body::Body, http::Request, response::Response, Router};
use axum_test::{multipart::MultipartForm, TestResponse, TestServer};
use tower::ServiceExt;
use upload_relay::{
    media_storage::{
        mock::{MockBehavior, MockObjectStore},
        ObjectStore,
    },
    server,
    state::AppState,
    types::BackendConfig,
};

pub const TEST_BUCKET: &str = "upload-relay-test";

/// Setup test environment: tracing only, configuration is built explicitly
pub fn setup_test_env() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .try_init()
        .ok();
}

/// Builds a configuration from explicit variables on top of `BUCKET_NAME`
///
/// # Panics
///
/// If the variables do not form a valid configuration
pub fn test_config(vars: &[(&str, &str)]) -> BackendConfig {
    let mut map: HashMap<String, String> = HashMap::new();
    map.insert("BUCKET_NAME".to_string(), TEST_BUCKET.to_string());
    for (name, value) in vars {
        map.insert((*name).to_string(), (*value).to_string());
    }

    BackendConfig::from_lookup(|name| map.get(name).cloned()).expect("invalid test configuration")
}

/// Router wired to a mock object store
pub struct TestSetup {
    pub router: Router,
    pub server: TestServer,
    pub config: Arc<BackendConfig>,
    pub store: Arc<MockObjectStore>,
}

impl TestSetup {
    pub fn new(behavior: MockBehavior) -> Self {
        Self::with_config(behavior, test_config(&[]))
    }

    pub fn with_config(behavior: MockBehavior, config: BackendConfig) -> Self {
        setup_test_env();

        let config = Arc::new(config);
        let store = Arc::new(MockObjectStore::new(behavior));
        let dyn_store: Arc<dyn ObjectStore> = store.clone();

        let router = server::app(AppState::new(dyn_store, config.clone()));
        let server = TestServer::new(router.clone()).expect("Failed to create test server");

        Self {
            router,
            server,
            config,
            store,
        }
    }

    pub async fn send_upload(&self, form: MultipartForm) -> TestResponse {
        self.server.post("/upload").multipart(form).await
    }

    /// Posts `body` as is; `content_type: None` sends no `Content-Type` header
    pub async fn send_raw_upload(
        &self,
        content_type: Option<&str>,
        body: Vec<u8>,
    ) -> Result<Response, Box<dyn std::error::Error>> {
        let mut request = Request::builder().uri("/upload").method("POST");
        if let Some(content_type) = content_type {
            request = request.header("Content-Type", content_type);
        }

        let response = self.router.clone().oneshot(request.body(Body::from(body))?).await?;
        Ok(response)
    }

    pub async fn send_get_request(&self, route: &str) -> TestResponse {
        self.server.get(route).await
    }
}
