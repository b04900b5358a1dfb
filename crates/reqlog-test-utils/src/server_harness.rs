//! Test server harness for E2E testing
//!
//! Provides `TestReqlogServer` for spawning real request log server
//! instances in tests.

use reqlog_service::config::Config;
use reqlog_service::observability::ServiceMetrics;
use reqlog_service::repositories::PgRequestLog;
use reqlog_service::routes::{self, AppState};
use sqlx::PgPool;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Environment label reported by test servers.
pub const TEST_ENVIRONMENT: &str = "test";

/// Host identifier reported by test servers.
pub const TEST_HOSTNAME: &str = "reqlog-test-0";

/// Test harness for spawning the request log server in E2E tests.
///
/// # Example
/// ```rust,ignore
/// #[sqlx::test(migrations = false)]
/// async fn test_health_flow_e2e(pool: PgPool) -> Result<()> {
///     let server = TestReqlogServer::spawn(pool).await?;
///
///     let response = reqwest::get(format!("{}/health", server.url())).await?;
///
///     assert_eq!(response.status(), 200);
///     Ok(())
/// }
/// ```
pub struct TestReqlogServer {
    addr: SocketAddr,
    pool: PgPool,
    config: Config,
    metrics: ServiceMetrics,
    _handle: JoinHandle<()>,
}

impl TestReqlogServer {
    /// Spawn a new test server instance on the given pool.
    ///
    /// The server will:
    /// - Create the `api_requests` table if absent
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Start the HTTP server in the background with its own metrics registry
    pub async fn spawn(pool: PgPool) -> Result<Self, anyhow::Error> {
        let vars = HashMap::from([
            ("DB_PASSWORD".to_string(), "test-password".to_string()),
            ("PORT".to_string(), "0".to_string()),
            ("ENVIRONMENT".to_string(), TEST_ENVIRONMENT.to_string()),
            ("HOSTNAME".to_string(), TEST_HOSTNAME.to_string()),
        ]);

        let config = Config::from_vars(&vars)
            .map_err(|e| anyhow::anyhow!("Failed to create config: {}", e))?;

        let store = PgRequestLog::from_pool(pool.clone());
        store
            .ensure_schema()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create schema: {}", e))?;

        let metrics = ServiceMetrics::new()
            .map_err(|e| anyhow::anyhow!("Failed to create metrics: {}", e))?;

        let state = Arc::new(AppState {
            store: Arc::new(store),
            config: config.clone(),
            metrics: metrics.clone(),
        });

        // Build routes using the service's real route builder
        let app = routes::build_routes(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            // ConnectInfo lets the submit handler fall back to the peer address
            let make_service = app.into_make_service_with_connect_info::<SocketAddr>();
            if let Err(e) = axum::serve(listener, make_service).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            pool,
            config,
            metrics,
            _handle: handle,
        })
    }

    /// Get reference to the database pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Get the base URL of the test server.
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Get reference to the server configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the server's metrics registry.
    pub fn metrics(&self) -> &ServiceMetrics {
        &self.metrics
    }
}

impl Drop for TestReqlogServer {
    fn drop(&mut self) {
        self._handle.abort();
    }
}
