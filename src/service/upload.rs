//! Image upload service
//!
//! Decodes a base64 payload, stores it under a fresh key and
//! returns the public URL of the stored object.

use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64_STANDARD};
use uuid::Uuid;

use crate::config::AwsConfig;
use crate::error::AppError;
use crate::metrics::{STORAGE_REQUEST_DURATION_SECONDS, UPLOAD_BYTES_TOTAL, UPLOADS_TOTAL};
use crate::storage::{BackendErrorCode, StorageBackend, StorageError};

/// Every object is labelled as PNG, whatever the decoded bytes are.
pub const OBJECT_KEY_SUFFIX: &str = ".png";
pub const OBJECT_CONTENT_TYPE: &str = "image/png";

/// Upload service
pub struct UploadService {
    storage: Arc<dyn StorageBackend>,
    bucket: String,
}

impl UploadService {
    pub fn new(storage: Arc<dyn StorageBackend>, aws: &AwsConfig) -> Self {
        Self {
            storage,
            bucket: aws.bucket_name().to_string(),
        }
    }

    /// Store a base64-encoded image
    ///
    /// # Returns
    /// Public URL of the new object
    ///
    /// # Errors
    /// - `InvalidInput` when `image` is not base64
    /// - `BackendUnavailable` when no client can be built
    /// - `Config`, `Authorization`, `Backend` or `Unexpected` when the put fails
    pub async fn upload(&self, image: &str) -> Result<String, AppError> {
        let result = self.store(image).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(error) => error.kind(),
        };
        UPLOADS_TOTAL.with_label_values(&[outcome]).inc();

        result
    }

    async fn store(&self, image: &str) -> Result<String, AppError> {
        let bytes = decode_image(image)?;
        let key = generate_object_key();

        let client = self
            .storage
            .connect()
            .map_err(|error| AppError::BackendUnavailable(error.to_string()))?;

        let size = bytes.len();
        let _timer = STORAGE_REQUEST_DURATION_SECONDS
            .with_label_values(&["put_object"])
            .start_timer();
        client
            .put_object(&self.bucket, &key, bytes, OBJECT_CONTENT_TYPE)
            .await
            .map_err(|error| classify_put_error(error, &self.bucket))?;

        UPLOAD_BYTES_TOTAL.inc_by(size as u64);
        tracing::info!(bucket = %self.bucket, key = %key, size, "Image uploaded");

        Ok(public_url(&self.bucket, &key))
    }
}

/// Decode with the standard base64 alphabet
///
/// ASCII whitespace is discarded first, so line-wrapped (MIME-style)
/// output from common encoders is accepted.
pub fn decode_image(image: &str) -> Result<Vec<u8>, AppError> {
    let compact: String = image.split_ascii_whitespace().collect();
    BASE64_STANDARD
        .decode(compact)
        .map_err(|error| AppError::InvalidInput(error.to_string()))
}

/// `<uuid-v4>.png`
pub fn generate_object_key() -> String {
    format!("{}{}", Uuid::new_v4(), OBJECT_KEY_SUFFIX)
}

/// Virtual-hosted-style URL of an object
pub fn public_url(bucket: &str, key: &str) -> String {
    format!("https://{}.s3.amazonaws.com/{}", bucket, key)
}

fn classify_put_error(error: StorageError, bucket: &str) -> AppError {
    match error {
        StorageError::Service { code, message } => match code {
            BackendErrorCode::NoSuchBucket => {
                AppError::Config(format!("S3 bucket '{}' does not exist", bucket))
            }
            BackendErrorCode::AccessDenied => AppError::Authorization(format!(
                "cannot write to S3 bucket '{}': {}",
                bucket, message
            )),
            BackendErrorCode::Other(code) => AppError::Backend(format!("{}: {}", code, message)),
        },
        StorageError::Client(message) => AppError::BackendUnavailable(message),
        StorageError::Transport(message) => AppError::Unexpected(message),
    }
}
