//! API layer
//!
//! HTTP handlers for:
//! - Image upload
//! - Health check
//! - API reference page
//! - Metrics (Prometheus)

mod docs;
mod health;
pub mod metrics;
mod upload;

pub use docs::{api_docs, root};
pub use health::health_check;
pub use metrics::metrics_router;
pub use upload::{UploadRequest, UploadResponse, upload_image};
