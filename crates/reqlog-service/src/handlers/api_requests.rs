//! Request logging handlers.
//!
//! - `POST /api` logs the caller's address and user agent
//! - `GET /api?limit=N` lists the most recent entries

use crate::errors::ApiError;
use crate::models::{Envelope, ListQuery, RequestList, SubmitResult};
use crate::routes::AppState;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use std::net::SocketAddr;
use std::sync::Arc;

/// Reported when neither proxy headers nor the peer address are available.
const UNKNOWN_CLIENT_IP: &str = "unknown";

/// Resolve the client address.
///
/// Preference order: first hop of `X-Forwarded-For`, then `X-Real-IP`, then
/// the socket peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> String {
    if let Some(first_hop) = header_value(headers, "x-forwarded-for")
        .and_then(|xff| xff.split(',').next())
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
    {
        return first_hop.to_string();
    }

    if let Some(real_ip) = header_value(headers, "x-real-ip") {
        return real_ip.to_string();
    }

    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT_IP.to_string())
}

/// Trimmed, non-empty value of a header.
fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Handler for POST /api
///
/// Logs one request and returns 201 with the assigned id. Storage failures
/// become an opaque 500.
#[tracing::instrument(skip_all, name = "reqlog.api.submit")]
pub async fn submit_request(
    State(state): State<Arc<AppState>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<(StatusCode, Json<Envelope<SubmitResult>>), ApiError> {
    let client_ip = client_ip(&headers, connect_info.map(|ConnectInfo(addr)| addr));
    let user_agent = user_agent(&headers);

    let id = state
        .store
        .insert(&client_ip, user_agent.as_deref(), Utc::now())
        .await?;

    tracing::debug!(id, client_ip = %client_ip, "Request logged");

    Ok((
        StatusCode::CREATED,
        Json(Envelope::new(
            "Request logged successfully",
            SubmitResult {
                id,
                client_ip,
                user_agent,
            },
        )),
    ))
}

/// Handler for GET /api
///
/// A missing, malformed or out-of-range `limit` is replaced by the default
/// rather than rejected.
#[tracing::instrument(skip_all, name = "reqlog.api.list")]
pub async fn list_requests(
    State(state): State<Arc<AppState>>,
    query: Option<Query<ListQuery>>,
) -> Result<Json<Envelope<RequestList>>, ApiError> {
    let limit = query
        .map(|Query(q)| q)
        .unwrap_or_default()
        .effective_limit();

    let requests = state.store.list(limit).await?;
    let count = requests.len();

    Ok(Json(Envelope::new(
        format!("Retrieved {} API requests", count),
        RequestList {
            requests,
            count,
            limit,
        },
    )))
}
