//! HTTP route handlers for the admin dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Health check
//!
//! # Auth
//! POST /auth/login                      - Staff login
//! POST /auth/logout                     - Logout
//!
//! # Orders (requires staff)
//! GET  /orders?tab={new|ready|completed} - Dashboard tabs
//! POST /orders/{id}/status              - Change an order's status
//!
//! # Stock (requires staff)
//! GET  /menu-stock                      - Stock-managed products
//! POST /menu-stock/update-multiple      - Bulk restock
//! POST /menu-stock/undo-last-update     - Undo the last restock
//!
//! # Statistics (requires staff)
//! GET  /statistics                      - Sales and volume dashboard
//! ```

pub mod auth;
pub mod menu_stock;
pub mod orders;
pub mod statistics;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the stock routes router.
pub fn stock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(menu_stock::index))
        .route("/update-multiple", post(menu_stock::update_multiple))
        .route("/undo-last-update", post(menu_stock::undo_last_update))
}

/// Create all routes for the admin dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/orders", get(orders::index))
        .route("/orders/{id}/status", post(orders::update_status))
        .nest("/menu-stock", stock_routes())
        .route("/statistics", get(statistics::index))
        .nest("/auth", auth_routes())
}

/// Health check endpoint.
async fn health() -> &'static str {
    "OK"
}
