//! Object storage backend
//!
//! The service talks to S3 through two small traits so handlers
//! never depend on the AWS SDK directly:
//! - `StorageBackend` builds a client from configuration
//! - `ObjectStore` is the client: put-object and list-buckets

mod s3;

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

pub use s3::S3Backend;

/// Error codes the backend can report that the service treats specially
///
/// Anything unrecognised lands in `Other` and keeps its raw code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendErrorCode {
    NoSuchBucket,
    AccessDenied,
    Other(String),
}

impl BackendErrorCode {
    pub fn parse(code: &str) -> Self {
        match code {
            "NoSuchBucket" => Self::NoSuchBucket,
            "AccessDenied" => Self::AccessDenied,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::NoSuchBucket => "NoSuchBucket",
            Self::AccessDenied => "AccessDenied",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for BackendErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage-layer error
#[derive(Debug, Error)]
pub enum StorageError {
    /// Client could not be built from configuration
    #[error("failed to create storage client: {0}")]
    Client(String),

    /// Backend answered with an error code
    #[error("{code}: {message}")]
    Service {
        code: BackendErrorCode,
        message: String,
    },

    /// Request never produced a backend error code (dispatch, timeout, parsing)
    #[error("{0}")]
    Transport(String),
}

/// Client for a single object storage backend
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `body` under `key` in `bucket`
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Names of the buckets visible to the configured credentials
    async fn list_buckets(&self) -> Result<Vec<String>, StorageError>;
}

/// Factory for `ObjectStore` clients
#[cfg_attr(test, mockall::automock)]
pub trait StorageBackend: Send + Sync {
    fn connect(&self) -> Result<Arc<dyn ObjectStore>, StorageError>;
}

pub(crate) fn build_s3_http_client() -> aws_sdk_s3::config::SharedHttpClient {
    use aws_smithy_runtime::client::http::hyper_014::HyperClientBuilder;

    let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
        .with_webpki_roots()
        .https_only()
        .enable_http1()
        .enable_http2()
        .build();

    HyperClientBuilder::new().build(https_connector)
}
