//! Request Log Service
//!
//! Entry point: loads configuration, connects to PostgreSQL, ensures the
//! schema and serves HTTP until SIGINT/SIGTERM.

use reqlog_service::config::{Config, LogFormat};
use reqlog_service::observability::{init_tracing, ServiceMetrics};
use reqlog_service::repositories::PgRequestLog;
use reqlog_service::routes::{self, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Tracing format depends on config, so config errors log in text format.
    let config = match Config::from_env() {
        Ok(config) => {
            init_tracing(config.log_format);
            config
        }
        Err(e) => {
            init_tracing(LogFormat::Text);
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    info!(
        environment = %config.environment,
        hostname = %config.hostname,
        port = config.port,
        "Starting request log service"
    );

    info!("Connecting to database...");
    let store = PgRequestLog::connect(&config).await.map_err(|e| {
        error!("Failed to connect to database: {}", e);
        e
    })?;

    store.ensure_schema().await.map_err(|e| {
        error!("Failed to create database schema: {}", e);
        e
    })?;

    info!(
        db_host = %config.db_host,
        db_port = config.db_port,
        "Connected to PostgreSQL, table ready"
    );

    let metrics = ServiceMetrics::new().map_err(|e| {
        error!("Failed to initialize metrics: {}", e);
        e
    })?;

    let addr: SocketAddr = config.bind_address().parse().map_err(|e| {
        error!("Invalid bind address: {}", e);
        e
    })?;

    let state = Arc::new(AppState {
        store: Arc::new(store),
        config,
        metrics,
    });

    let app = routes::build_routes(state);

    info!("Request log service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Request log service shutdown complete");

    Ok(())
}

/// Listens for shutdown signals (SIGTERM, SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received SIGINT, starting graceful shutdown..."),
            Err(e) => error!("Failed to listen for SIGINT: {}", e),
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, starting graceful shutdown...");
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
