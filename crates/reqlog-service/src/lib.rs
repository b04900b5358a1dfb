//! Request Log Service Library
//!
//! A small HTTP service that records who called it into PostgreSQL:
//!
//! - Logging inbound API submissions (client address, user agent, time)
//! - Listing the most recent submissions
//! - Database-backed health reporting
//! - Prometheus request metrics
//!
//! # Architecture
//!
//! ```text
//! routes/mod.rs -> handlers/*.rs -> repositories/*.rs
//! ```
//!
//! # Modules
//!
//! - `config` - Service configuration from environment
//! - `errors` - Error types with HTTP status code mapping
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Persisted record and response views
//! - `observability` - Metrics registry and tracing setup
//! - `repositories` - Request log storage
//! - `routes` - Axum router setup

pub mod config;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
