//! Root informational endpoint.

use crate::models::{Envelope, ServiceInfo};
use crate::routes::AppState;
use axum::extract::State;
use axum::Json;
use std::sync::Arc;

/// Name reported by `GET /`.
pub const SERVICE_NAME: &str = "reqlog-service";

/// Storage description reported by `GET /`.
pub const DATABASE_DESCRIPTION: &str = "PostgreSQL";

/// Handler for GET /
///
/// Static service information stamped with the current time. Never touches
/// storage.
#[tracing::instrument(skip_all, name = "reqlog.root")]
pub async fn service_info(State(state): State<Arc<AppState>>) -> Json<Envelope<ServiceInfo>> {
    Json(Envelope::new(
        "Hello from the request log service",
        ServiceInfo {
            service: SERVICE_NAME.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: state.config.environment.clone(),
            pod_name: state.config.hostname.clone(),
            database: DATABASE_DESCRIPTION.to_string(),
        },
    ))
}
