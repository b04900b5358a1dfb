//! HTTP request handlers for the request log service.

pub mod api_requests;
pub mod health;
pub mod metrics;
pub mod root;

pub use api_requests::{list_requests, submit_request};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use root::service_info;
