//! HTTP route handlers for the storefront.
//!
//! Every page handler returns a JSON page-props payload the frontend
//! renders client side.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (featured selection)
//! GET  /health                 - Health check
//!
//! # Menu
//! GET  /menu                   - Full menu, grouped by category
//! GET  /products/{slug}        - Product detail with variations and options
//!
//! # Cart (requires auth)
//! GET  /cart                   - Cart page, repriced at read
//! POST /cart/add               - Add a product (merges identical lines)
//! POST /cart/update            - Change a line's quantity
//! POST /cart/update-options    - Change a line's option tuple
//! POST /cart/remove            - Remove a line
//! POST /cart/clear             - Empty the cart
//!
//! # Orders (requires auth)
//! POST /orders                 - Place an order from the cart
//!
//! # Auth
//! POST /auth/register          - Create an account and log in
//! POST /auth/login             - Login action
//! POST /auth/logout            - Logout action
//!
//! # Account (requires auth)
//! GET  /account                - Account overview
//! GET  /account/orders         - Order history
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod home;
pub mod menu;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/update-options", post(cart::update_options))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/orders", get(account::orders))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(home::health))
        .route("/menu", get(menu::index))
        .route("/products/{slug}", get(products::show))
        .nest("/cart", cart_routes())
        .route("/orders", post(orders::place))
        .nest("/account", account_routes())
        .nest("/auth", auth_routes())
}
