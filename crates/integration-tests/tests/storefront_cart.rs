//! Integration tests for the storefront cart and order flow.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed applied
//! - The storefront server running (cargo run -p demitasse-storefront)
//!
//! Run with: cargo test -p demitasse-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use demitasse_integration_tests::{session_client, storefront_base_url};

/// Register a throwaway customer and leave the session logged in.
async fn register_customer(client: &Client) -> Value {
    let base_url = storefront_base_url();
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock before epoch")
        .as_nanos();

    let resp = client
        .post(format!("{base_url}/auth/register"))
        .json(&json!({
            "name": "Test Customer",
            "phone": format!("+7999{:07}", suffix % 10_000_000),
            "email": format!("customer-{suffix}@example.com"),
            "password": "correct horse battery",
        }))
        .send()
        .await
        .expect("Failed to register");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to read registration body")
}

/// Find a seeded product id by fetching a known detail page.
async fn seeded_product_id(client: &Client, slug: &str) -> i64 {
    let base_url = storefront_base_url();
    let resp = client
        .get(format!("{base_url}/products/{slug}"))
        .send()
        .await
        .expect("Failed to fetch product");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = resp.json().await.expect("Failed to read product body");
    body["id"].as_i64().expect("product id missing")
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_menu_lists_categories_with_entries() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/menu"))
        .send()
        .await
        .expect("Failed to fetch menu");
    assert_eq!(resp.status(), StatusCode::OK);

    let sections: Value = resp.json().await.expect("Failed to read menu body");
    let sections = sections.as_array().expect("menu is not an array");
    assert!(!sections.is_empty());

    // Coffee variations collapse into one entry per name
    let coffee = sections
        .iter()
        .find(|s| s["category"]["name"] == "Coffee")
        .expect("no coffee section");
    let latte = coffee["entries"]
        .as_array()
        .expect("entries missing")
        .iter()
        .find(|e| e["name"] == "Latte")
        .expect("no latte entry");
    assert_eq!(latte["price_prefix"], "from");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_cart_requires_login() {
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_add_to_cart_merges_identical_lines() {
    let client = session_client();
    let base_url = storefront_base_url();
    register_customer(&client).await;

    let product_id = seeded_product_id(&client, "latte-medium").await;
    let line = json!({ "product_id": product_id, "quantity": 2, "sugar_quantity": 1 });

    for _ in 0..2 {
        let resp = client
            .post(format!("{base_url}/cart/add"))
            .json(&line)
            .send()
            .await
            .expect("Failed to add to cart");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to read cart body");

    // Same product and same options: one line, quantity 4
    let lines = cart["lines"].as_array().expect("lines missing");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["quantity"], 4);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_black_coffee_silently_drops_milk() {
    let client = session_client();
    let base_url = storefront_base_url();
    register_customer(&client).await;

    let product_id = seeded_product_id(&client, "americano").await;
    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({
            "product_id": product_id,
            "quantity": 1,
            "milk_extra_id": 1,
        }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to read cart body");
    assert_eq!(cart["lines"][0]["milk_extra_id"], Value::Null);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_merge_over_the_line_cap_is_rejected() {
    let client = session_client();
    let base_url = storefront_base_url();
    register_customer(&client).await;

    let product_id = seeded_product_id(&client, "latte-medium").await;
    let line = json!({ "product_id": product_id, "quantity": 6 });

    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&line)
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // 6 + 6 would exceed the 10-per-line cap; the merge must error, not clamp
    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&line)
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to read cart body");
    assert_eq!(cart["lines"][0]["quantity"], 6);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_foreign_cart_line_is_forbidden() {
    let base_url = storefront_base_url();

    let owner = session_client();
    register_customer(&owner).await;
    let product_id = seeded_product_id(&owner, "latte-medium").await;
    let resp = owner
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let cart: Value = owner
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to read cart body");
    let line_id = cart["lines"][0]["id"].as_i64().expect("line id missing");

    let intruder = session_client();
    register_customer(&intruder).await;
    let resp = intruder
        .post(format!("{base_url}/cart/remove"))
        .json(&json!({ "line_id": line_id }))
        .send()
        .await
        .expect("Failed to remove line");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = intruder
        .post(format!("{base_url}/cart/update"))
        .json(&json!({ "line_id": line_id, "quantity": 2 }))
        .send()
        .await
        .expect("Failed to update line");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // The owner's line is untouched
    let cart: Value = owner
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to read cart body");
    assert_eq!(cart["lines"][0]["quantity"], 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_quantity_out_of_range_is_rejected() {
    let client = session_client();
    let base_url = storefront_base_url();
    register_customer(&client).await;

    let product_id = seeded_product_id(&client, "latte-medium").await;
    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 11 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_placing_an_order_empties_the_cart() {
    let client = session_client();
    let base_url = storefront_base_url();
    register_customer(&client).await;

    let product_id = seeded_product_id(&client, "latte-medium").await;
    let resp = client
        .post(format!("{base_url}/cart/add"))
        .json(&json!({ "product_id": product_id, "quantity": 1 }))
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = client
        .post(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let placed: Value = resp.json().await.expect("Failed to read order body");
    assert!(placed["order_id"].as_i64().is_some());

    let cart: Value = client
        .get(format!("{base_url}/cart"))
        .send()
        .await
        .expect("Failed to fetch cart")
        .json()
        .await
        .expect("Failed to read cart body");
    assert_eq!(cart["lines"].as_array().expect("lines missing").len(), 0);

    // The order shows up in history as Preparing
    let history: Value = client
        .get(format!("{base_url}/account/orders"))
        .send()
        .await
        .expect("Failed to fetch history")
        .json()
        .await
        .expect("Failed to read history body");
    assert_eq!(history[0]["status"], "Preparing");
}

#[tokio::test]
#[ignore = "Requires running storefront server and seeded database"]
async fn test_placing_with_empty_cart_is_rejected() {
    let client = session_client();
    let base_url = storefront_base_url();
    register_customer(&client).await;

    let resp = client
        .post(format!("{base_url}/orders"))
        .send()
        .await
        .expect("Failed to place order");
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
