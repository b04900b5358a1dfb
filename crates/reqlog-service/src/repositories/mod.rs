//! Repository layer for the request log service.
//!
//! Handlers reach storage only through [`RequestLogStore`]. The production
//! implementation is [`PgRequestLog`]; [`MockRequestLog`] is an in-memory
//! stand-in for handler tests.

pub mod api_requests;

use crate::errors::ApiError;
use crate::models::LoggedRequest;
use chrono::{DateTime, Utc};

pub use api_requests::mock::MockRequestLog;
pub use api_requests::PgRequestLog;

/// Storage operations for logged requests.
#[async_trait::async_trait]
pub trait RequestLogStore: Send + Sync {
    /// Append one record and return its storage-assigned identifier.
    async fn insert(
        &self,
        client_ip: &str,
        user_agent: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<i64, ApiError>;

    /// Up to `limit` most recent records, newest first.
    async fn list(&self, limit: i64) -> Result<Vec<LoggedRequest>, ApiError>;

    /// Liveness probe.
    async fn ping(&self) -> Result<(), ApiError>;

    /// Number of storage connections currently checked out.
    fn connections_in_use(&self) -> u32;
}
