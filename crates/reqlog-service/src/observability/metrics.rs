//! Metrics definitions for the request log service.
//!
//! Metrics are recorded into a [`ServiceMetrics`] instance that owns its own
//! Prometheus recorder. Nothing is installed as the process-wide recorder, so
//! each server (and each test) has an isolated registry.
//!
//! # Metrics
//!
//! - `http_requests_total{method, endpoint, status}` (counter)
//! - `http_request_duration_seconds{method, endpoint}` (histogram)
//! - `db_connections_active` (gauge)
//!
//! # Cardinality
//!
//! `endpoint` is bounded: routed paths are kept verbatim, anything else is
//! recorded as `/other`.

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{
    BuildError, Matcher, PrometheusBuilder, PrometheusHandle, PrometheusRecorder,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";
pub const HTTP_REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
pub const DB_CONNECTIONS_ACTIVE: &str = "db_connections_active";

/// Request latency buckets in seconds, from 5ms up to 10s.
pub const HTTP_DURATION_BUCKETS: &[f64] = &[
    0.005, 0.010, 0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.500, 5.000, 10.000,
];

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Failed to configure Prometheus recorder: {0}")]
    Build(#[from] BuildError),
}

/// Metrics registry for one service instance.
///
/// Cheap to clone; clones share the same recorder.
#[derive(Clone)]
pub struct ServiceMetrics {
    recorder: Arc<PrometheusRecorder>,
    handle: PrometheusHandle,
}

impl ServiceMetrics {
    /// Build a recorder with the HTTP latency buckets and register every
    /// metric so the exposition lists them before the first request.
    pub fn new() -> Result<Self, MetricsError> {
        let recorder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Full(HTTP_REQUEST_DURATION_SECONDS.to_string()),
                HTTP_DURATION_BUCKETS,
            )?
            .build_recorder();
        let handle = recorder.handle();

        let metrics = Self {
            recorder: Arc::new(recorder),
            handle,
        };

        metrics.with_recorder(|| {
            describe_counter!(HTTP_REQUESTS_TOTAL, "Total number of HTTP requests");
            describe_histogram!(
                HTTP_REQUEST_DURATION_SECONDS,
                "HTTP request duration in seconds"
            );
            describe_gauge!(
                DB_CONNECTIONS_ACTIVE,
                "Number of active database connections"
            );
            gauge!(DB_CONNECTIONS_ACTIVE).set(0.0);
        });

        Ok(metrics)
    }

    fn with_recorder<T>(&self, f: impl FnOnce() -> T) -> T {
        metrics::with_local_recorder(self.recorder.as_ref(), f)
    }

    /// Record one completed HTTP request.
    pub fn record_http_request(
        &self,
        method: &str,
        endpoint: &str,
        status_code: u16,
        duration: Duration,
    ) {
        let endpoint = normalize_endpoint(endpoint);

        self.with_recorder(|| {
            histogram!(HTTP_REQUEST_DURATION_SECONDS,
                "method" => method.to_string(),
                "endpoint" => endpoint
            )
            .record(duration.as_secs_f64());

            counter!(HTTP_REQUESTS_TOTAL,
                "method" => method.to_string(),
                "endpoint" => endpoint,
                "status" => status_code.to_string()
            )
            .increment(1);
        });
    }

    /// Set the in-use database connection count.
    pub fn set_db_connections_active(&self, count: u32) {
        self.with_recorder(|| {
            gauge!(DB_CONNECTIONS_ACTIVE).set(f64::from(count));
        });
    }

    /// Prometheus text exposition of everything recorded so far.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Map a request path onto a bounded label value.
fn normalize_endpoint(path: &str) -> &'static str {
    match path {
        "/" => "/",
        "/api" => "/api",
        "/health" => "/health",
        "/metrics" => "/metrics",
        _ => "/other",
    }
}
