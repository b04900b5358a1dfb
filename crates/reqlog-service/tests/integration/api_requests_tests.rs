//! Integration tests for POST /api and GET /api.

use reqlog_test_utils::TestReqlogServer;
use serde_json::Value;
use sqlx::PgPool;

async fn submit(client: &reqwest::Client, server: &TestReqlogServer) -> anyhow::Result<Value> {
    let response = client
        .post(format!("{}/api", server.url()))
        .header("X-Forwarded-For", "203.0.113.5")
        .header("User-Agent", "test-agent")
        .send()
        .await?;
    assert_eq!(response.status(), 201);
    Ok(response.json().await?)
}

async fn list(
    client: &reqwest::Client,
    server: &TestReqlogServer,
    query: &str,
) -> anyhow::Result<Value> {
    let response = client
        .get(format!("{}/api{}", server.url(), query))
        .send()
        .await?;
    assert_eq!(response.status(), 200);
    Ok(response.json().await?)
}

fn ids(body: &Value) -> Vec<i64> {
    body["data"]["requests"]
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r["id"].as_i64()).collect())
        .unwrap_or_default()
}

#[sqlx::test(migrations = false)]
async fn test_submit_echoes_forwarded_client(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let body = submit(&client, &server).await?;

    assert_eq!(body["message"], "Request logged successfully");
    assert_eq!(body["data"]["client_ip"], "203.0.113.5");
    assert_eq!(body["data"]["user_agent"], "test-agent");
    assert!(body["data"]["id"].as_i64().is_some_and(|id| id > 0));

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_submit_without_headers_uses_peer_address(
    pool: PgPool,
) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool.clone()).await?;
    let client = reqwest::Client::new();

    let response = client.post(format!("{}/api", server.url())).send().await?;
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await?;
    assert_eq!(body["data"]["client_ip"], "127.0.0.1");

    let id = body["data"]["id"].as_i64().unwrap_or_default();
    let (stored_ip,): (String,) = sqlx::query_as("SELECT client_ip FROM api_requests WHERE id = $1")
        .bind(id)
        .fetch_one(&pool)
        .await?;
    assert_eq!(stored_ip, "127.0.0.1");

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_ids_strictly_increase(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    let mut previous = 0;
    for _ in 0..5 {
        let body = submit(&client, &server).await?;
        let id = body["data"]["id"].as_i64().unwrap_or_default();
        assert!(id > previous, "id {id} should exceed {previous}");
        previous = id;
    }

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_limit_one_returns_latest_submission(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    submit(&client, &server).await?;
    let second = submit(&client, &server).await?;

    let body = list(&client, &server, "?limit=1").await?;

    assert_eq!(body["data"]["count"], 1);
    assert_eq!(body["data"]["limit"], 1);
    assert_eq!(ids(&body), vec![second["data"]["id"].as_i64().unwrap_or_default()]);

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_list_orders_newest_first(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool).await?;
    let client = reqwest::Client::new();

    for _ in 0..6 {
        submit(&client, &server).await?;
    }

    let body = list(&client, &server, "?limit=4").await?;
    let listed = ids(&body);

    assert_eq!(listed.len(), 4);
    assert!(listed.windows(2).all(|w| w[0] > w[1]), "{listed:?}");

    let timestamps: Vec<chrono::DateTime<chrono::Utc>> = body["data"]["requests"]
        .as_array()
        .map(|rows| {
            rows.iter()
                .filter_map(|r| serde_json::from_value(r["timestamp"].clone()).ok())
                .collect()
        })
        .unwrap_or_default();
    assert!(timestamps.windows(2).all(|w| w[0] >= w[1]));

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_invalid_limits_fall_back_to_default(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool.clone()).await?;
    let client = reqwest::Client::new();

    sqlx::query(
        "INSERT INTO api_requests (client_ip, user_agent)
         SELECT '198.51.100.' || n, 'seed' FROM generate_series(1, 25) AS n",
    )
    .execute(&pool)
    .await?;

    let baseline = list(&client, &server, "").await?;
    assert_eq!(baseline["data"]["limit"], 20);
    assert_eq!(baseline["data"]["count"], 20);

    for query in ["?limit=0", "?limit=-5", "?limit=101", "?limit=abc"] {
        let body = list(&client, &server, query).await?;
        assert_eq!(body["data"]["limit"], 20, "{query}");
        assert_eq!(ids(&body), ids(&baseline), "{query}");
    }

    let body = list(&client, &server, "?limit=100").await?;
    assert_eq!(body["data"]["limit"], 100);
    assert_eq!(body["data"]["count"], 25);

    Ok(())
}

#[sqlx::test(migrations = false)]
async fn test_undecodable_rows_are_skipped(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestReqlogServer::spawn(pool.clone()).await?;
    let client = reqwest::Client::new();

    let kept = submit(&client, &server).await?;

    // A NULL timestamp cannot decode into a LoggedRequest.
    sqlx::query("INSERT INTO api_requests (client_ip, timestamp) VALUES ('192.0.2.1', NULL)")
        .execute(&pool)
        .await?;

    let body = list(&client, &server, "?limit=10").await?;

    assert_eq!(body["data"]["count"], 1);
    assert_eq!(ids(&body), vec![kept["data"]["id"].as_i64().unwrap_or_default()]);

    Ok(())
}
