//! AWS S3 implementation of the storage traits

use std::sync::Arc;

use async_trait::async_trait;
use aws_sdk_s3::Client as S3Client;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};

use super::{BackendErrorCode, ObjectStore, StorageBackend, StorageError, build_s3_http_client};
use crate::config::AwsConfig;

/// S3 backend
///
/// Holds the credentials and one shared HTTPS connector. Each call to
/// `connect` builds a fresh client on top of that connector, so
/// connections are pooled while clients stay per-request.
pub struct S3Backend {
    config: AwsConfig,
    http_client: aws_sdk_s3::config::SharedHttpClient,
}

impl S3Backend {
    pub fn new(config: &AwsConfig) -> Self {
        Self {
            config: config.clone(),
            http_client: build_s3_http_client(),
        }
    }
}

impl StorageBackend for S3Backend {
    fn connect(&self) -> Result<Arc<dyn ObjectStore>, StorageError> {
        use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

        if !self.config.credentials_configured() {
            return Err(StorageError::Client(
                "AWS credentials are not configured".to_string(),
            ));
        }

        let credentials = Credentials::new(
            self.config.access_key_id.as_deref().unwrap_or_default(),
            self.config.secret_access_key.as_deref().unwrap_or_default(),
            None,
            None,
            "s3-image-bridge",
        );

        let s3_config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .http_client(self.http_client.clone())
            .region(Region::new(self.config.region.clone()))
            .credentials_provider(credentials)
            .build();

        Ok(Arc::new(S3ObjectStore {
            client: S3Client::from_conf(s3_config),
        }))
    }
}

struct S3ObjectStore {
    client: S3Client,
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        use aws_sdk_s3::primitives::ByteStream;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(())
    }

    async fn list_buckets(&self) -> Result<Vec<String>, StorageError> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(classify_sdk_error)?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect())
    }
}

/// Split SDK failures into coded backend errors and everything else
fn classify_sdk_error<E, R>(error: SdkError<E, R>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match error.code() {
        Some(code) => StorageError::Service {
            code: BackendErrorCode::parse(code),
            message: error
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| DisplayErrorContext(&error).to_string()),
        },
        None => StorageError::Transport(DisplayErrorContext(&error).to_string()),
    }
}
