//! /metrics integration tests.

use reqlog_test_utils::{sample_value, TestReqlogServer};
use sqlx::PgPool;

async fn scrape(client: &reqwest::Client, server: &TestReqlogServer) -> anyhow::Result<String> {
    let response = client
        .get(format!("{}/metrics", server.url()))
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    Ok(response.text().await?)
}

#[sqlx::test(migrations = false)]
async fn test_metrics_include_prior_request(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/api", server.url()))
        .header("User-Agent", "test-agent")
        .send()
        .await?;
    assert_eq!(response.status(), 201);

    let text = scrape(&client, &server).await?;

    assert_eq!(
        sample_value(
            &text,
            "http_requests_total",
            &[r#"method="POST""#, r#"endpoint="/api""#, r#"status="201""#],
        ),
        Some(1.0)
    );
    assert!(sample_value(
        &text,
        "http_request_duration_seconds_count",
        &[r#"method="POST""#, r#"endpoint="/api""#],
    )
    .is_some_and(|count| count >= 1.0));

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_metrics_count_each_status(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    for _ in 0..3 {
        client.get(format!("{}/health", server.url())).send().await?;
    }
    client
        .get(format!("{}/does-not-exist", server.url()))
        .send()
        .await?;

    let text = scrape(&client, &server).await?;

    assert_eq!(
        sample_value(
            &text,
            "http_requests_total",
            &[r#"method="GET""#, r#"endpoint="/health""#, r#"status="200""#],
        ),
        Some(3.0)
    );
    assert_eq!(
        sample_value(
            &text,
            "http_requests_total",
            &[r#"endpoint="/other""#, r#"status="404""#],
        ),
        Some(1.0)
    );

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_metrics_expose_db_connections_gauge(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let text = scrape(&client, &server).await?;

    assert!(text.contains("# TYPE db_connections_active gauge"));
    assert!(sample_value(&text, "db_connections_active", &[]).is_some_and(|v| v >= 0.0));

    Ok(())
}
