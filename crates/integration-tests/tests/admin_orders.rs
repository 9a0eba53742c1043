//! Integration tests for the admin order queue.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed applied
//! - Both servers running (demitasse-storefront and demitasse-admin)
//! - A staff account, set `STAFF_EMAIL` and `STAFF_PASSWORD`
//!   (grant with: cargo run -p demitasse-cli -- staff grant --email <email>)
//!
//! Run with: cargo test -p demitasse-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use demitasse_integration_tests::{admin_base_url, session_client, storefront_base_url};

/// Log a staff member into the admin panel and return the session client.
async fn staff_client() -> Client {
    let client = session_client();
    let base_url = admin_base_url();
    let email = std::env::var("STAFF_EMAIL").unwrap_or_else(|_| "staff@example.com".to_string());
    let password =
        std::env::var("STAFF_PASSWORD").unwrap_or_else(|_| "a long enough password".to_string());

    let resp = client
        .post(format!("{base_url}/auth/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await
        .expect("Failed to log in as staff");
    assert_eq!(resp.status(), StatusCode::OK, "staff login failed");

    client
}

/// Place a fresh order through the storefront so the queue is never empty.
async fn place_order() -> i64 {
    let client = session_client();
    let base_url = storefront_base_url();
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();

    let resp = client
        .post(format!("{base_url}/auth/register"))
        .json(&json!({
            "name": "Queue Customer",
            "phone": format!("8997{:07}", suffix % 10_000_000),
            "email": format!("queue-{suffix}@example.com"),
            "password": "a long enough password",
        }))
        .send()
        .await
        .expect("Failed to register");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let product: Value = client
        .get(format!("{base_url}/products/latte-medium"))
        .send()
        .await
        .expect("Failed to fetch product")
        .json()
        .await
        .expect("Failed to read product body");

    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product["id"], "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let placed: Value = client
        .post(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to place order")
        .json()
        .await
        .expect("Failed to read order body");
    placed["order_id"].as_i64().expect("order_id missing")
}

#[tokio::test]
#[ignore = "Requires running admin server and a staff account"]
async fn test_orders_require_staff_login() {
    let client = session_client();
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to fetch orders");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running admin server and a staff account"]
async fn test_new_tab_lists_placed_order_with_customer_details() {
    let order_id = place_order().await;
    let client = staff_client().await;
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/orders?tab=new"))
        .send()
        .await
        .expect("Failed to fetch orders");
    assert_eq!(resp.status(), StatusCode::OK);

    let orders: Value = resp.json().await.expect("Failed to read orders body");
    let order = orders
        .as_array()
        .expect("orders is not an array")
        .iter()
        .find(|o| o["id"].as_i64() == Some(order_id))
        .expect("placed order not in new tab");
    assert_eq!(order["status"], "Preparing");
    assert_eq!(order["customer_name"], "Queue Customer");
    assert!(!order["lines"].as_array().expect("lines missing").is_empty());
}

#[tokio::test]
#[ignore = "Requires running admin server and a staff account"]
async fn test_status_walks_preparing_ready_completed() {
    let order_id = place_order().await;
    let client = staff_client().await;
    let base_url = admin_base_url();

    for status in ["Ready", "Completed"] {
        let resp = client
            .post(format!("{base_url}/orders/{order_id}/status"))
            .json(&json!({ "status": status }))
            .send()
            .await
            .expect("Failed to update status");
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = resp.json().await.expect("Failed to read status body");
        assert_eq!(body["status"], status);
    }

    // Completed is terminal except for Received
    let resp = client
        .post(format!("{base_url}/orders/{order_id}/status"))
        .json(&json!({ "status": "Preparing" }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running admin server and a staff account"]
async fn test_skipping_ready_is_rejected() {
    let order_id = place_order().await;
    let client = staff_client().await;
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/orders/{order_id}/status"))
        .json(&json!({ "status": "Received" }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running admin server and a staff account"]
async fn test_unknown_order_is_not_found() {
    let client = staff_client().await;
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/orders/999999/status"))
        .json(&json!({ "status": "Ready" }))
        .send()
        .await
        .expect("Failed to update status");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
