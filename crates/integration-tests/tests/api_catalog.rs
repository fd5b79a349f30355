//! Integration tests for the catalog endpoints.

use axum::http::StatusCode;
use serde_json::{Value, json};
use shopfront_api::db::Collection;
use shopfront_integration_tests::TestContext;

// =============================================================================
// Listing
// =============================================================================

#[tokio::test]
async fn test_empty_catalog_lists_empty_array() {
    let ctx = TestContext::new();

    let response = ctx.get("/api/products").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
}

#[tokio::test]
async fn test_list_returns_every_inserted_product() {
    let ctx = TestContext::new();
    let products = [
        json!({"id": 1, "name": "Wireless Mouse", "description": "Optical", "price": 25.99, "image": "https://cdn.example.com/1.png"}),
        json!({"id": 2, "name": "Keyboard", "description": "Mechanical", "price": 89.0, "image": "https://cdn.example.com/2.png"}),
        json!({"id": 3, "name": "USB-C Hub", "description": "", "price": 39.5, "image": ""}),
    ];

    for product in &products {
        let response = ctx.post("/api/products", &product.to_string()).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let listed = ctx.get("/api/products").await.json();
    let Value::Array(listed) = listed else {
        panic!("expected an array, got {listed}");
    };
    assert_eq!(listed.len(), products.len());

    for (expected, actual) in products.iter().zip(&listed) {
        for field in ["id", "name", "description", "price", "image"] {
            assert_eq!(expected[field], actual[field], "field {field} differs");
        }
    }
}

#[tokio::test]
async fn test_repeated_listing_is_stable() {
    let ctx = TestContext::new();
    ctx.post("/api/products", r#"{"id": 1, "name": "Mouse", "price": 10}"#)
        .await;
    ctx.post("/api/products", r#"{"id": 2, "name": "Pad", "price": 5}"#)
        .await;

    let first = ctx.get("/api/products").await;
    let second = ctx.get("/api/products").await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body, second.body);
}

#[tokio::test]
async fn test_listing_accepts_ids_beyond_32_bits() {
    let ctx = TestContext::new();

    let response = ctx
        .post(
            "/api/products",
            r#"{"id": 3000000000, "name": "Wireless Mouse", "price": 10}"#,
        )
        .await;
    assert_eq!(response.status, StatusCode::CREATED);

    let response = ctx.get("/api/products").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()[0]["id"], json!(3_000_000_000_i64));
}

#[tokio::test]
async fn test_listing_reads_whole_number_float_ids() {
    let ctx = TestContext::new();
    ctx.post("/api/products", r#"{"id": 2.0, "name": "Keyboard", "price": 45}"#)
        .await;

    let response = ctx.get("/api/products").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()[0]["id"], json!(2));
}

#[tokio::test]
async fn test_listing_fails_when_a_document_is_not_a_product() {
    let ctx = TestContext::new();
    ctx.post("/api/products", r#"{"id": 1, "name": "Mouse", "price": 10}"#)
        .await;
    // Stored unvalidated, rejected on read.
    ctx.post("/api/products", r#"{"title": "Gift card"}"#).await;

    let response = ctx.get("/api/products").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.text().contains("products"));
}

// =============================================================================
// Insertion
// =============================================================================

#[tokio::test]
async fn test_create_product_returns_store_id() {
    let ctx = TestContext::new();

    let response = ctx
        .post("/api/products", r#"{"id": 7, "name": "Webcam", "price": 59.9}"#)
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    let body = response.json();
    assert_eq!(body["message"], "Product added successfully");
    assert!(body["id"].as_str().is_some_and(|id| !id.is_empty()));
}

#[tokio::test]
async fn test_create_product_stores_arbitrary_fields() {
    let ctx = TestContext::new();

    ctx.post(
        "/api/products",
        r#"{"id": 8, "name": "Lamp", "price": 20, "color": "green", "tags": ["desk"]}"#,
    )
    .await;

    let stored = ctx
        .store
        .find(Collection::Products, &shopfront_api::db::Filter::All, None)
        .await
        .unwrap_or_default();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored.first().and_then(|d| d.get("color")), Some(&json!("green")));
}

#[tokio::test]
async fn test_create_product_keeps_numeric_store_id() {
    let ctx = TestContext::new();

    let response = ctx
        .post("/api/products", r#"{"_id": 5, "id": 5, "name": "Cable", "price": 3}"#)
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.json()["id"], json!("5"));

    let stored = ctx
        .store
        .find(Collection::Products, &shopfront_api::db::Filter::All, None)
        .await
        .unwrap_or_default();
    assert_eq!(stored.first().and_then(|d| d.get("_id")), Some(&json!(5)));

    let duplicate = ctx
        .post("/api/products", r#"{"_id": 5, "id": 6, "name": "Plug", "price": 4}"#)
        .await;
    assert_eq!(duplicate.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(ctx.count(Collection::Products).await, 1);
}

#[tokio::test]
async fn test_malformed_product_is_rejected() {
    let ctx = TestContext::new();

    for body in ["{\"id\": 1,", "not json", "[1, 2, 3]", "\"just a string\""] {
        let response = ctx.post("/api/products", body).await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST, "body: {body}");
        assert!(!response.text().is_empty());
    }

    assert_eq!(ctx.count(Collection::Products).await, 0);
}
