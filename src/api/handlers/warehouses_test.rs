//! Integration tests for Warehouse API endpoints.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api::{AppState, create_router};
use crate::db::{Database, MemoryDatabase, SqliteDatabase};

/// Create a test app with an in-memory SQLite database
async fn test_app() -> Router {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");
    create_router(AppState::new(db))
}

/// Send a request and return status plus parsed JSON body
async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/json"
    );
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn warehouse_body(name: &str) -> Value {
    json!({
        "name": name,
        "address": "A1",
        "telephone": "T1",
        "capacity": 100
    })
}

async fn create_warehouse(app: &Router, name: &str) -> i64 {
    let (status, body) = send(app, "POST", "/warehouses", Some(warehouse_body(name))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_i64().unwrap()
}

async fn create_product(app: &Router, code_value: &str, warehouse_id: i64) {
    let (status, _) = send(
        app,
        "POST",
        "/products",
        Some(json!({
            "name": "product",
            "quantity": 1,
            "code_value": code_value,
            "is_published": false,
            "expiration": "2030-01-01",
            "price": 9.99,
            "warehouse_id": warehouse_id
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

// =============================================================================
// POST /warehouses + GET /warehouses/{id}
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn create_then_get_warehouse() {
    let app = test_app().await;

    let (status, created) = send(&app, "POST", "/warehouses", Some(warehouse_body("W1"))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["message"], "warehouse created");
    let id = created["data"]["id"].as_i64().unwrap();
    assert!(id > 0);

    let (status, body) = send(&app, "GET", &format!("/warehouses/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "warehouse found");
    assert_eq!(
        body["warehouse"],
        json!({
            "id": id,
            "name": "W1",
            "address": "A1",
            "telephone": "T1",
            "capacity": 100
        })
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn create_warehouse_duplicate_name_conflicts() {
    let app = test_app().await;
    create_warehouse(&app, "W1").await;

    let (status, body) = send(&app, "POST", "/warehouses", Some(warehouse_body("W1"))).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "warehouse already exists");
}

#[tokio::test(flavor = "multi_thread")]
async fn create_warehouse_missing_field_is_bad_request() {
    let app = test_app().await;

    let (status, body) = send(&app, "POST", "/warehouses", Some(json!({ "name": "W1" }))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid request body");
}

#[tokio::test(flavor = "multi_thread")]
async fn get_warehouse_not_found() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/warehouses/3", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "warehouse not found");
}

#[tokio::test(flavor = "multi_thread")]
async fn get_warehouse_invalid_id_is_bad_request() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/warehouses/abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid id");
}

// =============================================================================
// GET /warehouses - List Warehouses
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn list_warehouses_returns_all() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/warehouses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "warehouses found");
    assert!(body["warehouses"].as_array().unwrap().is_empty());

    create_warehouse(&app, "W1").await;
    create_warehouse(&app, "W2").await;

    let (_, body) = send(&app, "GET", "/warehouses", None).await;
    let names: Vec<&str> = body["warehouses"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["W1", "W2"]);
}

// =============================================================================
// GET /warehouses/reportProducts
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn report_products_counts_every_warehouse() {
    let app = test_app().await;
    let w1 = create_warehouse(&app, "W1").await;
    create_warehouse(&app, "W2").await;
    create_product(&app, "a", w1).await;
    create_product(&app, "b", w1).await;

    for uri in [
        "/warehouses/reportProducts",
        "/warehouses/reportProducts?id=",
        "/warehouses/reportProducts?id=0",
    ] {
        let (status, body) = send(&app, "GET", uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["message"], "generate report product success");
        assert_eq!(
            body["data"],
            json!([
                { "name": "W1", "product_count": 2 },
                { "name": "W2", "product_count": 0 }
            ])
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn report_products_for_one_warehouse() {
    let app = test_app().await;
    create_warehouse(&app, "W1").await;
    let w2 = create_warehouse(&app, "W2").await;
    create_product(&app, "c", w2).await;

    let (status, body) = send(
        &app,
        "GET",
        &format!("/warehouses/reportProducts?id={}", w2),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([{ "name": "W2", "product_count": 1 }]));
}

#[tokio::test(flavor = "multi_thread")]
async fn report_products_unknown_warehouse_is_empty() {
    let app = test_app().await;
    create_warehouse(&app, "W1").await;

    let (status, body) = send(&app, "GET", "/warehouses/reportProducts?id=99", None).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn report_products_invalid_id_is_bad_request() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/warehouses/reportProducts?id=abc", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "invalid id");
}

#[tokio::test(flavor = "multi_thread")]
async fn report_products_repeated_id_is_json_bad_request() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/warehouses/reportProducts?id=1&id=2", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "message": "invalid id" }));
}

// =============================================================================
// Unrouted requests
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn unsupported_method_is_json_method_not_allowed() {
    let app = test_app().await;
    let id = create_warehouse(&app, "W1").await;

    let (status, body) = send(&app, "DELETE", &format!("/warehouses/{}", id), None).await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["message"], "method not allowed");
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_route_is_json_not_found() {
    let app = test_app().await;

    let (status, body) = send(&app, "GET", "/storages", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "route not found");
}

// =============================================================================
// In-memory backend
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn memory_backend_reports_like_sqlite() {
    let db = MemoryDatabase::new();
    db.migrate().await.unwrap();
    let app = create_router(AppState::new(db));
    let w1 = create_warehouse(&app, "W1").await;
    create_warehouse(&app, "W2").await;
    create_product(&app, "m", w1).await;

    let (status, body) = send(&app, "GET", "/warehouses/reportProducts", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([
            { "name": "W1", "product_count": 1 },
            { "name": "W2", "product_count": 0 }
        ])
    );
}
