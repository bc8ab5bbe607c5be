//! Common test utilities for E2E tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use s3_image_bridge::storage::{
    BackendErrorCode, ObjectStore, StorageBackend, StorageError,
};
use s3_image_bridge::{AppState, config};
use tokio::net::TcpListener;

pub const TEST_BUCKET: &str = "mybucket";

/// Object captured by the in-memory backend
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bucket: String,
    pub key: String,
    pub body: Vec<u8>,
    pub content_type: String,
}

/// How the in-memory backend behaves
#[derive(Debug, Clone)]
pub enum BackendMode {
    /// Accepts every request
    Healthy,
    /// `connect` fails, as with missing credentials
    NoClient,
    /// Every call fails with this backend error code
    Rejecting(&'static str),
    /// Every call fails before the backend answers
    Unreachable,
}

/// In-memory stand-in for S3
#[derive(Debug, Clone)]
pub struct InMemoryBackend {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    mode: BackendMode,
    objects: Mutex<Vec<StoredObject>>,
}

impl InMemoryBackend {
    pub fn new(mode: BackendMode) -> Self {
        Self {
            inner: Arc::new(Inner {
                mode,
                objects: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn objects(&self) -> Vec<StoredObject> {
        self.inner.objects.lock().unwrap().clone()
    }
}

impl Inner {
    fn check(&self) -> Result<(), StorageError> {
        match self.mode {
            BackendMode::Healthy | BackendMode::NoClient => Ok(()),
            BackendMode::Rejecting(code) => Err(StorageError::Service {
                code: BackendErrorCode::parse(code),
                message: format!("{code} returned by test backend"),
            }),
            BackendMode::Unreachable => Err(StorageError::Transport(
                "dispatch failure: connection refused".to_string(),
            )),
        }
    }
}

struct InMemoryClient(Arc<Inner>);

impl StorageBackend for InMemoryBackend {
    fn connect(&self) -> Result<Arc<dyn ObjectStore>, StorageError> {
        if matches!(self.inner.mode, BackendMode::NoClient) {
            return Err(StorageError::Client(
                "AWS credentials are not configured".to_string(),
            ));
        }
        Ok(Arc::new(InMemoryClient(self.inner.clone())))
    }
}

#[async_trait]
impl ObjectStore for InMemoryClient {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.0.check()?;
        self.0.objects.lock().unwrap().push(StoredObject {
            bucket: bucket.to_string(),
            key: key.to_string(),
            body,
            content_type: content_type.to_string(),
        });
        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<String>, StorageError> {
        self.0.check()?;
        Ok(vec![TEST_BUCKET.to_string()])
    }
}

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub backend: InMemoryBackend,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Start a server whose backend accepts everything
    pub async fn new() -> Self {
        Self::with_mode(BackendMode::Healthy).await
    }

    /// Start a server with the given backend behaviour
    pub async fn with_mode(mode: BackendMode) -> Self {
        let credentials = !matches!(mode, BackendMode::NoClient);
        let config = test_config(credentials);
        let backend = InMemoryBackend::new(mode);

        s3_image_bridge::metrics::init_metrics();
        let state = AppState::with_storage(config, Arc::new(backend.clone()));
        let app = s3_image_bridge::build_router(state);

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap();

        Self {
            addr: format!("http://{}", addr),
            backend,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// GET /metrics as text
    pub async fn metrics_text(&self) -> String {
        self.client
            .get(self.url("/metrics"))
            .send()
            .await
            .unwrap()
            .text()
            .await
            .unwrap()
    }

    /// POST /upload-image with the given `image` field
    pub async fn upload(&self, image: &str) -> reqwest::Response {
        self.client
            .post(self.url("/upload-image"))
            .json(&serde_json::json!({ "image": image }))
            .send()
            .await
            .unwrap()
    }
}

fn test_config(credentials: bool) -> config::AppConfig {
    let credential = |value: &str| credentials.then(|| value.to_string());

    config::AppConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
        },
        aws: config::AwsConfig {
            access_key_id: credential("test-key"),
            secret_access_key: credential("test-secret"),
            region: config::DEFAULT_AWS_REGION.to_string(),
            bucket: Some(TEST_BUCKET.to_string()),
        },
        logging: config::LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
    }
}
