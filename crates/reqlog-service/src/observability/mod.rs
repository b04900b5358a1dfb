//! Observability for the request log service.
//!
//! Provides the metrics registry and tracing subscriber setup.

pub mod metrics;
pub mod tracing_init;

pub use metrics::{MetricsError, ServiceMetrics};
pub use tracing_init::init_tracing;
