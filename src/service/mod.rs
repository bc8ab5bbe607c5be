//! Service layer
//!
//! Contains the upload pipeline and health probe, separated from HTTP handlers.

mod health;
mod upload;

pub use health::{HealthReport, HealthService, HealthState};
pub use upload::{
    OBJECT_CONTENT_TYPE, OBJECT_KEY_SUFFIX, UploadService, decode_image, generate_object_key,
    public_url,
};
