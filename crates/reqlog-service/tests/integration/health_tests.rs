//! Health and root endpoint integration tests.

use reqlog_test_utils::{TestReqlogServer, TEST_ENVIRONMENT, TEST_HOSTNAME};
use sqlx::PgPool;

/// /health reports healthy while the database answers.
#[sqlx::test(migrations = false)]
async fn test_health_endpoint_returns_200(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
    assert!(body["timestamp"].is_string());

    Ok(())
}

/// / returns the envelope with version and a fresh timestamp.
#[sqlx::test(migrations = false)]
async fn test_root_endpoint_returns_service_info(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    // Serialized timestamps carry sub-second precision; compare at second floor.
    let sent_at = chrono::Utc::now().timestamp();

    let response = client.get(format!("{}/", server.url())).send().await?;

    assert_eq!(response.status(), 200);

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok());
    assert!(
        content_type.is_some_and(|ct| ct.contains("application/json")),
        "Expected application/json content type, got {:?}",
        content_type
    );

    let body: serde_json::Value = response.json().await?;
    assert!(body["data"]["version"].is_string());
    assert_eq!(body["data"]["environment"], TEST_ENVIRONMENT);
    assert_eq!(body["data"]["pod_name"], TEST_HOSTNAME);

    let timestamp: chrono::DateTime<chrono::Utc> =
        serde_json::from_value(body["timestamp"].clone())?;
    assert!(timestamp.timestamp() >= sent_at);

    Ok(())
}

/// Unknown routes return 404.
#[sqlx::test(migrations = false)]
async fn test_unknown_route_returns_404(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{}/v1/nonexistent", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), 404);

    Ok(())
}
