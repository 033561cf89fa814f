//! Integration tests for the CRM service.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and run migrations
//! cargo run -p crm-cli -- migrate
//!
//! # Start the server
//! cargo run -p crm-server
//!
//! # Run integration tests
//! cargo test -p crm-integration-tests -- --ignored
//! ```
//!
//! Tests hit a running server over HTTP; the base URL defaults to
//! `http://localhost:8080` and can be overridden via `CRM_BASE_URL`.

/// Base URL for the CRM API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("CRM_BASE_URL").unwrap_or_else(|_| "http://localhost:8080".to_string())
}

/// A unique email address for test isolation.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", uuid::Uuid::new_v4())
}
