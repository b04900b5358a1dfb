//! Health check handler.
//!
//! `/health` doubles as liveness and readiness: it is healthy only while the
//! database answers a ping.

use crate::models::HealthResponse;
use crate::routes::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

/// Handler for GET /health
///
/// Returns 200 `healthy` when the database ping succeeds, 503 `unhealthy`
/// carrying the ping error otherwise.
#[tracing::instrument(skip_all, name = "reqlog.health")]
pub async fn health_check(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    match state.store.ping().await {
        Ok(()) => (StatusCode::OK, Json(HealthResponse::healthy())),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse::unhealthy(e.to_string())),
            )
        }
    }
}
