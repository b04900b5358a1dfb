//! `api_requests` table access.
//!
//! # Security
//!
//! - All queries use parameterized statements
//! - Connection details and the password are never logged

use crate::config::Config;
use crate::errors::ApiError;
use crate::models::LoggedRequest;
use crate::repositories::RequestLogStore;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::{FromRow, PgPool};
use tracing::instrument;

const CREATE_TABLE_SQL: &str = r#"
    CREATE TABLE IF NOT EXISTS api_requests (
        id BIGSERIAL PRIMARY KEY,
        client_ip VARCHAR(45) NOT NULL,
        user_agent TEXT,
        timestamp TIMESTAMPTZ DEFAULT NOW()
    )
"#;

const CREATE_INDEX_SQL: &str = r#"
    CREATE INDEX IF NOT EXISTS idx_api_requests_timestamp
        ON api_requests (timestamp DESC)
"#;

/// PostgreSQL-backed request log.
#[derive(Clone)]
pub struct PgRequestLog {
    pool: PgPool,
}

impl PgRequestLog {
    /// Open a pool from configuration and verify it with a liveness probe.
    pub async fn connect(config: &Config) -> Result<Self, ApiError> {
        let pool = PgPoolOptions::new()
            .connect_with(config.connect_options())
            .await
            .map_err(|e| ApiError::Database(format!("Failed to connect: {}", e)))?;

        let store = Self::from_pool(pool);
        store.ping().await?;
        Ok(store)
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the `api_requests` table and its timestamp index if absent.
    #[instrument(skip_all, name = "reqlog.db.ensure_schema")]
    pub async fn ensure_schema(&self) -> Result<(), ApiError> {
        sqlx::query(CREATE_TABLE_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Database(format!("Failed to create table: {}", e)))?;

        sqlx::query(CREATE_INDEX_SQL)
            .execute(&self.pool)
            .await
            .map_err(|e| ApiError::Database(format!("Failed to create index: {}", e)))?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl RequestLogStore for PgRequestLog {
    #[instrument(skip_all, name = "reqlog.db.insert")]
    async fn insert(
        &self,
        client_ip: &str,
        user_agent: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<i64, ApiError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO api_requests (client_ip, user_agent, timestamp)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(client_ip)
        .bind(user_agent)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to insert request: {}", e)))?;

        Ok(id)
    }

    #[instrument(skip_all, name = "reqlog.db.list", fields(limit = limit))]
    async fn list(&self, limit: i64) -> Result<Vec<LoggedRequest>, ApiError> {
        let rows = sqlx::query(
            r#"
            SELECT id, client_ip, user_agent, timestamp
            FROM api_requests
            ORDER BY timestamp DESC, id DESC
            LIMIT $1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ApiError::Database(format!("Failed to query requests: {}", e)))?;

        // Best-effort: an undecodable row is logged and dropped, not fatal.
        let requests = rows
            .iter()
            .filter_map(|row| match LoggedRequest::from_row(row) {
                Ok(request) => Some(request),
                Err(e) => {
                    tracing::warn!(target: "reqlog.database", error = %e, "Skipping undecodable row");
                    None
                }
            })
            .collect();

        Ok(requests)
    }

    async fn ping(&self) -> Result<(), ApiError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    fn connections_in_use(&self) -> u32 {
        let idle = u32::try_from(self.pool.num_idle()).unwrap_or(u32::MAX);
        self.pool.size().saturating_sub(idle)
    }
}

/// In-memory request log for tests.
pub mod mock {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct State {
        next_id: i64,
        rows: Vec<LoggedRequest>,
    }

    /// Mock request log. Either stores records in memory or fails every call.
    #[derive(Default)]
    pub struct MockRequestLog {
        state: Mutex<State>,
        return_error: bool,
    }

    impl MockRequestLog {
        /// A mock that behaves like an empty, reachable database.
        pub fn healthy() -> Self {
            Self::default()
        }

        /// A mock whose every operation fails.
        pub fn failing() -> Self {
            Self {
                state: Mutex::default(),
                return_error: true,
            }
        }

        /// Number of stored records.
        pub async fn len(&self) -> usize {
            self.state.lock().await.rows.len()
        }

        /// Whether no record has been stored.
        pub async fn is_empty(&self) -> bool {
            self.len().await == 0
        }

        fn check(&self) -> Result<(), ApiError> {
            if self.return_error {
                return Err(ApiError::Database("Mock request log error".to_string()));
            }
            Ok(())
        }
    }

    #[async_trait::async_trait]
    impl RequestLogStore for MockRequestLog {
        async fn insert(
            &self,
            client_ip: &str,
            user_agent: Option<&str>,
            timestamp: DateTime<Utc>,
        ) -> Result<i64, ApiError> {
            self.check()?;

            let mut state = self.state.lock().await;
            state.next_id += 1;
            let id = state.next_id;
            state.rows.push(LoggedRequest {
                id,
                client_ip: client_ip.to_string(),
                user_agent: user_agent.map(str::to_string),
                timestamp,
            });
            Ok(id)
        }

        async fn list(&self, limit: i64) -> Result<Vec<LoggedRequest>, ApiError> {
            self.check()?;

            let state = self.state.lock().await;
            let mut rows = state.rows.clone();
            rows.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.id.cmp(&a.id)));
            rows.truncate(usize::try_from(limit).unwrap_or(0));
            Ok(rows)
        }

        async fn ping(&self) -> Result<(), ApiError> {
            self.check()
        }

        fn connections_in_use(&self) -> u32 {
            0
        }
    }

}
