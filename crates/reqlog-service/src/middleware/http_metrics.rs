//! HTTP metrics middleware.
//!
//! Wraps the whole router so every response is counted, including
//! framework-level rejections that never reach a handler:
//! - 404 Not Found
//! - 405 Method Not Allowed
//! - 400 Bad Request (malformed query strings)

use axum::{extract::Request, extract::State, middleware::Next, response::Response};
use std::time::Instant;

use crate::observability::ServiceMetrics;

/// Records method, path, status code and duration of every request.
///
/// The status is read from the response the inner service returns, so a
/// handler that never sets one is recorded as 200.
pub async fn http_metrics_middleware(
    State(metrics): State<ServiceMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let path = request.uri().path().to_string();

    let response = next.run(request).await;

    metrics.record_http_request(&method, &path, response.status().as_u16(), start.elapsed());

    response
}
