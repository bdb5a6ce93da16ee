//! Categories and products: validated writes, the single reload after each
//! write, search paging and the low-stock listing.

mod common;

use axum::http::{Method, StatusCode};
use common::{decimal, response_json, TestApp};
use rust_decimal_macros::dec;
use serde_json::json;

#[tokio::test]
async fn invalid_category_writes_nothing_and_reloads_nothing() {
    let app = TestApp::new();
    let response = app
        .request_authenticated(Method::POST, "/categories", Some(json!({ "name": "" })))
        .await;
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["notice"]["message"], "Name is required");
    assert_eq!(app.store.calls("create_category"), 0);
    assert_eq!(app.store.calls("list_categories"), 0);
}

#[tokio::test]
async fn created_category_comes_back_in_a_single_reload() {
    let app = TestApp::new();
    let response = app
        .request_authenticated(
            Method::POST,
            "/categories",
            Some(json!({ "name": " Stationery ", "description": "  " })),
        )
        .await;
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["notice"]["level"], "success");
    assert_eq!(body["notice"]["message"], "Category created successfully");
    assert_eq!(body["data"][0]["name"], "Stationery");
    assert!(body["data"][0]["description"].is_null());
    assert_eq!(app.store.calls("create_category"), 1);
    assert_eq!(app.store.calls("list_categories"), 1);
}

#[tokio::test]
async fn category_update_and_delete() {
    let app = TestApp::new();
    let category = app.store.add_category("Snacks");

    let response = app
        .request_authenticated(
            Method::PUT,
            &format!("/categories/{}", category.id),
            Some(json!({ "name": "Drinks", "description": "Cold" })),
        )
        .await;
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Drinks");
    assert_eq!(body["data"][0]["description"], "Cold");

    let response = app
        .request_authenticated(Method::DELETE, &format!("/categories/{}", category.id), None)
        .await;
    let (status, body) = response_json(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
async fn updating_a_missing_category_is_404() {
    let app = TestApp::new();
    let response = app
        .request_authenticated(
            Method::PUT,
            &format!("/categories/{}", uuid::Uuid::new_v4()),
            Some(json!({ "name": "Ghost" })),
        )
        .await;
    let (status, _) = response_json(response).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.store.calls("list_categories"), 0);
}

#[tokio::test]
async fn category_in_use_cannot_be_deleted() {
    let app = TestApp::new();
    let category = app.store.add_category("Snacks");
    app.store.add_product(category.id, "Chips", dec!(50), 10, 2);

    let response = app
        .request_authenticated(Method::DELETE, &format!("/categories/{}", category.id), None)
        .await;
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["notice"]["message"], "Category is still used by products");
}

#[tokio::test]
async fn product_listing_carries_category_names_and_form_categories() {
    let app = TestApp::new();
    let category = app.store.add_category("Snacks");
    app.store.add_product(category.id, "Chips", dec!(1500), 10, 2);
    app.store.add_product(category.id, "Biscuits", dec!(20), 1, 5);

    let response = app
        .request_authenticated(Method::GET, "/products", None)
        .await;
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::OK);
    let products = body["products"].as_array().expect("products");
    assert_eq!(products[0]["name"], "Biscuits");
    assert_eq!(products[0]["low_stock"], true);
    assert_eq!(products[1]["category_name"], "Snacks");
    assert_eq!(products[1]["unit_price_display"], "RS 1.5K");
    assert_eq!(body["categories"][0]["name"], "Snacks");
}

#[tokio::test]
async fn product_form_rejects_negative_stock_without_writing() {
    let app = TestApp::new();
    let category = app.store.add_category("Snacks");

    let response = app
        .request_authenticated(
            Method::POST,
            "/products",
            Some(json!({
                "category_id": category.id,
                "sku": "CH-1",
                "name": "Chips",
                "unit_price": "50",
                "current_stock": -1,
                "minimum_stock": 0
            })),
        )
        .await;
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"][0]["field"], "current_stock");
    assert_eq!(app.store.calls("create_product"), 0);
    assert_eq!(app.store.calls("list_products"), 0);
}

#[tokio::test]
async fn product_without_category_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request_authenticated(
            Method::POST,
            "/products",
            Some(json!({
                "sku": "CH-1",
                "name": "Chips",
                "unit_price": "50",
                "current_stock": 3,
                "minimum_stock": 1
            })),
        )
        .await;
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["notice"]["message"], "Category is required");
}

#[tokio::test]
async fn created_product_reloads_the_product_list_once() {
    let app = TestApp::new();
    let category = app.store.add_category("Snacks");

    let response = app
        .request_authenticated(
            Method::POST,
            "/products",
            Some(json!({
                "category_id": category.id,
                "sku": "CH-1",
                "name": "Chips",
                "unit_price": "49.99",
                "current_stock": 12,
                "minimum_stock": 4
            })),
        )
        .await;
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"][0]["sku"], "CH-1");
    assert_eq!(decimal(&body["data"][0]["unit_price"]), dec!(49.99));
    assert_eq!(app.store.calls("list_products"), 1);
}

#[tokio::test]
async fn search_pages_four_products_at_a_time() {
    let app = TestApp::new();
    let category = app.store.add_category("Pens");
    for name in ["Pen A", "Pen B", "Pen C", "Pen D", "Pen E", "Pencil"] {
        app.store.add_product(category.id, name, dec!(10), 5, 1);
    }

    let response = app
        .request_authenticated(Method::GET, "/products/search?q=pen&page=1", None)
        .await;
    let (_, first) = response_json(response).await;
    assert_eq!(first["products"].as_array().map(Vec::len), Some(4));
    assert_eq!(first["has_more"], true);

    let response = app
        .request_authenticated(Method::GET, "/products/search?q=PEN&page=2", None)
        .await;
    let (_, second) = response_json(response).await;
    assert_eq!(second["products"].as_array().map(Vec::len), Some(2));
    assert_eq!(second["products"][1]["name"], "Pencil");
    assert_eq!(second["has_more"], false);
}

#[tokio::test]
async fn low_stock_lists_products_at_or_below_minimum() {
    let app = TestApp::new();
    let category = app.store.add_category("Snacks");
    app.store.add_product(category.id, "Chips", dec!(50), 10, 2);
    app.store.add_product(category.id, "Gum", dec!(5), 3, 3);

    let response = app
        .request_authenticated(Method::GET, "/products/low-stock", None)
        .await;
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|p| p["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["Gum"]);
}

#[tokio::test]
async fn categories_are_listed_by_name() {
    let app = TestApp::new();
    app.store.add_category("Toys");
    app.store.add_category("Drinks");
    app.store.add_category("Snacks");

    let response = app
        .request_authenticated(Method::GET, "/categories", None)
        .await;
    let (_, body) = response_json(response).await;

    let names: Vec<_> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|c| c["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, vec!["Drinks", "Snacks", "Toys"]);
}

#[tokio::test]
async fn search_page_beyond_range_is_rejected() {
    let app = TestApp::new();
    let response = app
        .request_authenticated(
            Method::GET,
            &format!("/products/search?q=&page={}", i64::MAX),
            None,
        )
        .await;
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["notice"]["message"], "Page is out of range");
    assert_eq!(app.store.calls("search_products"), 0);
}

#[tokio::test]
async fn unit_price_above_cap_is_rejected() {
    let app = TestApp::new();
    let category = app.store.add_category("Jewellery");

    let response = app
        .request_authenticated(
            Method::POST,
            "/products",
            Some(json!({
                "category_id": category.id,
                "sku": "GOLD-1",
                "name": "Gold bar",
                "unit_price": "79228162514264337593543950335",
                "current_stock": 1,
                "minimum_stock": 0
            })),
        )
        .await;
    let (status, body) = response_json(response).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["notice"]["message"], "Unit price is too large");
    assert_eq!(app.store.calls("create_product"), 0);
}
