//! Prometheus metrics endpoint handler.
//!
//! Unauthenticated so Prometheus can scrape it. Labels carry no client data.

use crate::routes::AppState;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use std::sync::Arc;

/// Content type of the Prometheus text exposition format.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Handler for GET /metrics
///
/// Refreshes `db_connections_active` from the pool, then renders every
/// metric:
/// ```text
/// # TYPE http_requests_total counter
/// http_requests_total{method="GET",endpoint="/health",status="200"} 42
/// ```
#[tracing::instrument(skip_all, name = "reqlog.metrics.scrape")]
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state
        .metrics
        .set_db_connections_active(state.store.connections_in_use());

    ([(CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], state.metrics.render())
}
