//! Image upload endpoint

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::AppError;

/// Request body for `POST /upload-image`
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    /// Base64-encoded image
    pub image: String,
}

/// Response body for a stored image
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    /// Always `true`; failures use the `{detail}` error body
    pub success: bool,
    /// Public URL of the stored object
    pub url: String,
}

/// POST /upload-image
pub async fn upload_image(
    State(state): State<AppState>,
    payload: Result<Json<UploadRequest>, JsonRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let Json(request) = payload?;

    let url = state.uploads.upload(&request.image).await?;

    Ok(Json(UploadResponse { success: true, url }))
}
