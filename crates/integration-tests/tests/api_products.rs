//! Integration tests for the product API.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The CRM server running (cargo run -p crm-server)
//!
//! Run with: cargo test -p crm-integration-tests -- --ignored

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use crm_integration_tests::base_url;

#[tokio::test]
#[ignore = "Requires running CRM server and database"]
async fn test_product_create() {
    let client = Client::new();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/products"))
        .json(&json!({
            "name": "Laptop",
            "price": "999.99",
            "stock": 10
        }))
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse response");

    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Product created successfully")
    );
    let product = body.get("product").expect("Missing product");
    assert_eq!(product.get("name").and_then(Value::as_str), Some("Laptop"));
    // Prices serialize as decimal strings
    assert_eq!(
        product.get("price").and_then(Value::as_str),
        Some("999.99")
    );
    assert_eq!(product.get("stock").and_then(Value::as_i64), Some(10));
}

#[tokio::test]
#[ignore = "Requires running CRM server and database"]
async fn test_product_create_defaults_stock_to_zero() {
    let client = Client::new();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/products"))
        .json(&json!({"name": "Sticker", "price": "1.50"}))
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(body["product"]["stock"].as_i64(), Some(0));
}

#[tokio::test]
#[ignore = "Requires running CRM server and database"]
async fn test_product_create_rejects_bad_price() {
    let client = Client::new();
    let base_url = base_url();

    // Not a decimal at all
    let resp = client
        .post(format!("{base_url}/products"))
        .json(&json!({"name": "Junk", "price": "abc"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Invalid decimal format for price")
    );
    assert_eq!(body.get("error").and_then(Value::as_str), Some("format"));

    // Zero is not positive
    let resp = client
        .post(format!("{base_url}/products"))
        .json(&json!({"name": "Free", "price": "0"}))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Price must be positive")
    );
}

#[tokio::test]
#[ignore = "Requires running CRM server and database"]
async fn test_product_create_rejects_negative_stock() {
    let client = Client::new();
    let base_url = base_url();

    let resp = client
        .post(format!("{base_url}/products"))
        .json(&json!({"name": "Phantom", "price": "5.00", "stock": -1}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("Failed to parse response");
    assert_eq!(
        body.get("message").and_then(Value::as_str),
        Some("Stock cannot be negative")
    );
}

#[tokio::test]
#[ignore = "Requires running CRM server and database"]
async fn test_product_list_price_range_filter() {
    let client = Client::new();
    let base_url = base_url();

    let marker = uuid::Uuid::new_v4().simple().to_string();
    for (name, price) in [("Cheap", "9.99"), ("Mid", "49.99"), ("Dear", "199.99")] {
        let resp = client
            .post(format!("{base_url}/products"))
            .json(&json!({
                "name": format!("{name} {marker}"),
                "price": price,
                "stock": 5
            }))
            .send()
            .await
            .expect("Failed to create product");
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let resp = client
        .get(format!("{base_url}/products"))
        .query(&[
            ("name_contains", marker.as_str()),
            ("price_gte", "10"),
            ("price_lte", "100"),
            ("order_by", "-price"),
        ])
        .send()
        .await
        .expect("Failed to list products");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to parse response");
    let items = body["items"].as_array().expect("Missing items");
    assert_eq!(items.len(), 1);
    assert!(
        items[0]["name"]
            .as_str()
            .is_some_and(|n| n.starts_with("Mid"))
    );
}
