//! HTTP routes for the request log service.
//!
//! Defines the Axum router and application state.

use crate::config::Config;
use crate::handlers;
use crate::middleware::http_metrics_middleware;
use crate::observability::ServiceMetrics;
use crate::repositories::RequestLogStore;
use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Request log storage.
    pub store: Arc<dyn RequestLogStore>,

    /// Service configuration.
    pub config: Config,

    /// Metrics registry for this instance.
    pub metrics: ServiceMetrics,
}

/// Build the application routes.
///
/// - `GET /` - service information
/// - `POST /api` - log a request
/// - `GET /api?limit=N` - list recent requests
/// - `GET /health` - database-backed health check
/// - `GET /metrics` - Prometheus exposition
///
/// TraceLayer logs each request; the metrics middleware is the outermost
/// layer so it sees every response, including 404 and 405.
pub fn build_routes(state: Arc<AppState>) -> Router {
    let metrics = state.metrics.clone();

    Router::new()
        .route("/", get(handlers::service_info))
        .route(
            "/api",
            get(handlers::list_requests).post(handlers::submit_request),
        )
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn_with_state(
            metrics,
            http_metrics_middleware,
        ))
}
