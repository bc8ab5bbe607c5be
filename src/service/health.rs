//! Health probe
//!
//! Lists buckets once to confirm the backend is reachable with the
//! configured credentials. Never retries.

use std::sync::Arc;

use serde::Serialize;

use crate::config::AwsConfig;
use crate::metrics::{HEALTH_PROBES_TOTAL, STORAGE_REQUEST_DURATION_SECONDS};
use crate::storage::{StorageBackend, StorageError};

/// Overall probe result, serialized as `"healthy"` or `"unhealthy"`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
}

impl HealthState {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthState::Healthy => "healthy",
            HealthState::Unhealthy => "unhealthy",
        }
    }
}

/// Health report
///
/// Echoes bucket and region, never credential values.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub aws_configured: bool,
    pub s3_bucket: Option<String>,
    pub aws_region: String,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status == HealthState::Healthy
    }
}

/// Health service
pub struct HealthService {
    storage: Arc<dyn StorageBackend>,
    aws: AwsConfig,
}

impl HealthService {
    pub fn new(storage: Arc<dyn StorageBackend>, aws: &AwsConfig) -> Self {
        Self {
            storage,
            aws: aws.clone(),
        }
    }

    pub async fn probe(&self) -> HealthReport {
        let report = match self.check_backend().await {
            Ok(()) => HealthReport {
                status: HealthState::Healthy,
                error: None,
                aws_configured: true,
                s3_bucket: self.configured_bucket(),
                aws_region: self.aws.region.clone(),
            },
            Err(error) => {
                tracing::warn!(%error, "Storage backend health probe failed");
                HealthReport {
                    status: HealthState::Unhealthy,
                    error: Some(error.to_string()),
                    aws_configured: self.aws.credentials_configured(),
                    s3_bucket: self.configured_bucket(),
                    aws_region: self.aws.region.clone(),
                }
            }
        };

        HEALTH_PROBES_TOTAL
            .with_label_values(&[report.status.as_str()])
            .inc();
        report
    }

    async fn check_backend(&self) -> Result<(), StorageError> {
        let client = self.storage.connect()?;

        let _timer = STORAGE_REQUEST_DURATION_SECONDS
            .with_label_values(&["list_buckets"])
            .start_timer();
        let buckets = client.list_buckets().await?;
        tracing::debug!(buckets = buckets.len(), "Storage backend reachable");
        Ok(())
    }

    fn configured_bucket(&self) -> Option<String> {
        self.aws.bucket.clone().filter(|bucket| !bucket.is_empty())
    }
}
