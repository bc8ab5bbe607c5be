//! Prometheus metrics registry and instruments.
//!
//! This module is framework-agnostic and can be used from any layer.

use lazy_static::lazy_static;
use std::sync::Once;

use prometheus::{HistogramOpts, IntCounter, IntCounterVec, Opts, Registry};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // Upload Metrics
    pub static ref UPLOADS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("s3_image_bridge_uploads_total", "Total number of image uploads by outcome"),
        &["outcome"]
    ).expect("metric can be created");
    pub static ref UPLOAD_BYTES_TOTAL: IntCounter = IntCounter::new(
        "s3_image_bridge_upload_bytes_total",
        "Total decoded image bytes written to storage"
    ).expect("metric can be created");

    // Storage Metrics
    pub static ref STORAGE_REQUEST_DURATION_SECONDS: prometheus::HistogramVec = prometheus::HistogramVec::new(
        HistogramOpts::new(
            "s3_image_bridge_storage_request_duration_seconds",
            "Storage backend request duration in seconds"
        ).buckets(vec![0.01, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"]
    ).expect("metric can be created");
    pub static ref HEALTH_PROBES_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("s3_image_bridge_health_probes_total", "Total number of health probes by result"),
        &["status"]
    ).expect("metric can be created");

    // Error Metrics
    pub static ref ERRORS_TOTAL: IntCounterVec = IntCounterVec::new(
        Opts::new("s3_image_bridge_errors_total", "Total number of error responses"),
        &["error_type"]
    ).expect("metric can be created");
}

static INIT: Once = Once::new();

/// Initialize metrics registry.
///
/// Safe to call more than once; only the first call registers.
pub fn init_metrics() {
    INIT.call_once(|| {
        REGISTRY
            .register(Box::new(UPLOADS_TOTAL.clone()))
            .expect("UPLOADS_TOTAL can be registered");
        REGISTRY
            .register(Box::new(UPLOAD_BYTES_TOTAL.clone()))
            .expect("UPLOAD_BYTES_TOTAL can be registered");
        REGISTRY
            .register(Box::new(STORAGE_REQUEST_DURATION_SECONDS.clone()))
            .expect("STORAGE_REQUEST_DURATION_SECONDS can be registered");
        REGISTRY
            .register(Box::new(HEALTH_PROBES_TOTAL.clone()))
            .expect("HEALTH_PROBES_TOTAL can be registered");
        REGISTRY
            .register(Box::new(ERRORS_TOTAL.clone()))
            .expect("ERRORS_TOTAL can be registered");

        tracing::info!("Metrics registry initialized");
    });
}
