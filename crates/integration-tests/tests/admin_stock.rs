//! Integration tests for stock management and statistics in the admin panel.
//!
//! See `admin_orders.rs` for the required environment.
//!
//! Run with: cargo test -p demitasse-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use demitasse_integration_tests::{admin_base_url, session_client};

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

async fn stock_list(client: &Client) -> Vec<Value> {
    let base_url = admin_base_url();
    let resp = client
        .get(format!("{base_url}/menu-stock"))
        .send()
        .await
        .expect("Failed to fetch stock");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to read stock body");
    body.as_array().expect("stock is not an array").clone()
}

#[tokio::test]
#[ignore = "Requires running admin server and a staff account"]
async fn test_stock_list_only_shows_stock_managed_products() {
    let client = staff_client().await;
    let products = stock_list(&client).await;

    assert!(!products.is_empty());
    // Drinks are not stock managed and must never appear here
    assert!(products.iter().all(|p| p["name"] != "Latte"));
    assert!(products.iter().all(|p| p["stock_count"].as_i64().is_some()));
}

#[tokio::test]
#[ignore = "Requires running admin server and a staff account"]
async fn test_restock_then_undo_restores_previous_counts() {
    let client = staff_client().await;
    let base_url = admin_base_url();

    let before = stock_list(&client).await;
    let product_id = before[0]["id"].as_i64().expect("id missing");
    let previous = before[0]["stock_count"].as_i64().expect("count missing");

    let resp = client
        .post(format!("{base_url}/menu-stock/update-multiple"))
        .json(&json!({ "items": [{ "product_id": product_id, "added": 5 }] }))
        .send()
        .await
        .expect("Failed to restock");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read restock body");
    assert_eq!(body["updated"], 1);

    let after = stock_list(&client).await;
    let restocked = after
        .iter()
        .find(|p| p["id"].as_i64() == Some(product_id))
        .expect("product missing after restock");
    assert_eq!(restocked["stock_count"].as_i64(), Some(previous + 5));

    let resp = client
        .post(format!("{base_url}/menu-stock/undo-last-update"))
        .send()
        .await
        .expect("Failed to undo");
    assert_eq!(resp.status(), StatusCode::OK);

    let restored = stock_list(&client).await;
    let restored = restored
        .iter()
        .find(|p| p["id"].as_i64() == Some(product_id))
        .expect("product missing after undo");
    assert_eq!(restored["stock_count"].as_i64(), Some(previous));
}

#[tokio::test]
#[ignore = "Requires running admin server and a staff account"]
async fn test_undo_twice_has_nothing_to_revert() {
    let client = staff_client().await;
    let base_url = admin_base_url();

    let before = stock_list(&client).await;
    let product_id = before[0]["id"].as_i64().expect("id missing");

    let resp = client
        .post(format!("{base_url}/menu-stock/update-multiple"))
        .json(&json!({ "items": [{ "product_id": product_id, "added": 1 }] }))
        .send()
        .await
        .expect("Failed to restock");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .post(format!("{base_url}/menu-stock/undo-last-update"))
        .send()
        .await
        .expect("Failed to undo");
    assert_eq!(resp.status(), StatusCode::OK);

    // The undo buffer is one level deep and was just consumed
    let resp = client
        .post(format!("{base_url}/menu-stock/undo-last-update"))
        .send()
        .await
        .expect("Failed to undo");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running admin server and a staff account"]
async fn test_negative_restock_amount_is_rejected() {
    let client = staff_client().await;
    let base_url = admin_base_url();

    let before = stock_list(&client).await;
    let product_id = before[0]["id"].as_i64().expect("id missing");

    let resp = client
        .post(format!("{base_url}/menu-stock/update-multiple"))
        .json(&json!({ "items": [{ "product_id": product_id, "added": -3 }] }))
        .send()
        .await
        .expect("Failed to restock");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running admin server and a staff account"]
async fn test_statistics_page_has_all_sections() {
    let client = staff_client().await;
    let base_url = admin_base_url();

    let resp = client
        .get(format!("{base_url}/statistics"))
        .send()
        .await
        .expect("Failed to fetch statistics");
    assert_eq!(resp.status(), StatusCode::OK);

    let stats: Value = resp.json().await.expect("Failed to read statistics body");
    assert!(stats["order_counts"]["all_time"].as_i64().is_some());
    assert!(stats["revenue"]["average_check"].is_string() || stats["revenue"]["average_check"].is_number());
    assert!(stats["top_products_by_units"].is_array());
    assert!(stats["top_products_by_revenue"].is_array());
    assert!(stats["category_revenue"].is_array());
    assert!(stats["popular_extras"].is_array());
    assert!(stats["peak_hours"].is_array());
}
