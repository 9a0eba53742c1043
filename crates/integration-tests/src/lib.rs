//! Integration tests for Demitasse.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database, run migrations, seed the catalog
//! cargo run -p demitasse-cli -- migrate
//! cargo run -p demitasse-cli -- seed
//!
//! # Start both servers
//! cargo run -p demitasse-storefront &
//! cargo run -p demitasse-admin &
//!
//! # Run integration tests
//! cargo test -p demitasse-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `storefront_*` - Customer API tests (menu, cart, orders)
//! - `admin_*` - Staff API tests (order queue, stock, statistics)

use reqwest::Client;

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_owned())
}

/// Base URL for the admin API (configurable via environment).
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_owned())
}

/// A client with a cookie store, so a login carries into later requests.
///
/// # Panics
///
/// Panics when the client cannot be constructed; tests have no way to
/// proceed without one.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}
