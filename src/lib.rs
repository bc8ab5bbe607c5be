//! s3-image-bridge - stores base64 images in an S3 bucket over HTTP
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - POST /upload-image, GET /health                          │
//! │  - GET / (redirect), GET /docs, GET /metrics                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Upload pipeline (decode, key, store, URL)                │
//! │  - Health probe                                             │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Storage Layer                            │
//! │  - AWS S3 (put-object, list-buckets)                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers
//! - `service`: Upload pipeline and health probe
//! - `storage`: Object storage traits and the S3 implementation
//! - `config`: Configuration management
//! - `error`: Error types
//! - `metrics`: Prometheus instruments

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod service;
pub mod storage;

use std::any::Any;
use std::sync::Arc;

use axum::response::{IntoResponse, Response};

/// Application state shared across all handlers
///
/// Cloned for each request. Everything inside is read-only.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Upload pipeline
    pub uploads: Arc<service::UploadService>,

    /// Storage health probe
    pub health: Arc<service::HealthService>,
}

impl AppState {
    /// Initialize application state backed by AWS S3
    pub fn new(config: config::AppConfig) -> Self {
        let storage = Arc::new(storage::S3Backend::new(&config.aws));
        Self::with_storage(config, storage)
    }

    /// Initialize application state with an explicit storage backend
    pub fn with_storage(
        config: config::AppConfig,
        storage: Arc<dyn storage::StorageBackend>,
    ) -> Self {
        tracing::info!(
            bucket = %config.aws.bucket_name(),
            region = %config.aws.region,
            "Initializing application state..."
        );

        Self {
            uploads: Arc::new(service::UploadService::new(storage.clone(), &config.aws)),
            health: Arc::new(service::HealthService::new(storage, &config.aws)),
            config: Arc::new(config),
        }
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use axum::extract::DefaultBodyLimit;
    use axum::routing::{get, post};
    use tower_http::{
        catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
        trace::TraceLayer,
    };

    Router::new()
        .route("/", get(api::root))
        .route("/docs", get(api::api_docs))
        .route("/health", get(api::health_check))
        .route(
            "/upload-image",
            post(api::upload_image).layer(DefaultBodyLimit::disable()),
        )
        .with_state(state)
        .merge(api::metrics_router())
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Turn a handler panic into a JSON 500 instead of dropping the connection
fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "handler panicked".to_string()
    };

    error::AppError::Unexpected(details).into_response()
}
