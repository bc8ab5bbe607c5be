//! Health check endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;

use crate::AppState;
use crate::service::HealthReport;

/// GET /health
///
/// 200 when the storage backend answers, 500 otherwise.
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let report = state.health.probe().await;

    let status = if report.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (status, Json(report))
}
