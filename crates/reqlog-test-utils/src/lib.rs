//! # Request Log Test Utilities
//!
//! Shared test utilities for the request log service.
//!
//! This crate provides:
//! - Server test harness (`TestReqlogServer` for E2E tests)
//! - Exposition helpers for asserting on `/metrics` output
//!
//! ## Usage
//!
//! ```rust,ignore
//! use reqlog_test_utils::*;
//!
//! #[sqlx::test(migrations = false)]
//! async fn test_example(pool: PgPool) -> Result<()> {
//!     let server = TestReqlogServer::spawn(pool).await?;
//!     let client = reqwest::Client::new();
//!
//!     let response = client
//!         .get(format!("{}/health", server.url()))
//!         .send()
//!         .await?;
//!
//!     assert_eq!(response.status(), 200);
//!     Ok(())
//! }
//! ```

pub mod metrics_text;
pub mod server_harness;

// Re-export commonly used items
pub use metrics_text::*;
pub use server_harness::*;
