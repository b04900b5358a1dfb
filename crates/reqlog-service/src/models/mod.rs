//! Request log service models.
//!
//! `LoggedRequest` is the persisted entity. Everything else here is a
//! transient response view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default number of records returned by the list endpoint.
pub const DEFAULT_LIST_LIMIT: i64 = 20;

/// Largest `limit` the list endpoint accepts.
pub const MAX_LIST_LIMIT: i64 = 100;

/// One logged API submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct LoggedRequest {
    /// Storage-assigned identifier.
    pub id: i64,

    /// Client address as reported by the proxy headers or the peer socket.
    pub client_ip: String,

    /// User-Agent header, if the client sent one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// When the request was logged.
    pub timestamp: DateTime<Utc>,
}

/// Uniform response envelope for the JSON endpoints (except health).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    /// Envelope stamped with the current time.
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now(),
            data: Some(data),
        }
    }
}

/// Payload of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub version: String,
    pub environment: String,
    pub pod_name: String,
    pub database: String,
}

/// Payload of `POST /api`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitResult {
    pub id: i64,
    pub client_ip: String,
    pub user_agent: Option<String>,
}

/// Payload of `GET /api`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestList {
    pub requests: Vec<LoggedRequest>,
    pub count: usize,
    pub limit: i64,
}

/// Query string of `GET /api`.
///
/// `limit` is kept as a raw string so malformed values can be normalized
/// instead of rejected by the extractor.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub limit: Option<String>,
}

impl ListQuery {
    /// The limit to apply: the parsed value when it lies in
    /// `1..=MAX_LIST_LIMIT`, otherwise `DEFAULT_LIST_LIMIT`.
    pub fn effective_limit(&self) -> i64 {
        self.limit
            .as_deref()
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|n| (1..=MAX_LIST_LIMIT).contains(n))
            .unwrap_or(DEFAULT_LIST_LIMIT)
    }
}

/// Response of `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy".
    pub status: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Some(Utc::now()),
            database: Some("connected".to_string()),
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: "unhealthy".to_string(),
            timestamp: None,
            database: None,
            error: Some(error.into()),
        }
    }
}
