//! Tests for the health endpoint.

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::api::{AppState, create_router};
use crate::db::{Database, MemoryDatabase, SqliteDatabase};

async fn get_health(app: Router) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test(flavor = "multi_thread")]
async fn health_ok_with_sqlite() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    db.migrate().await.expect("Failed to run migrations");

    let (status, body) = get_health(create_router(AppState::new(db))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));
}

#[tokio::test(flavor = "multi_thread")]
async fn health_ok_with_memory_backend() {
    let (status, body) = get_health(create_router(AppState::new(MemoryDatabase::new()))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test(flavor = "multi_thread")]
async fn health_reports_closed_pool_as_internal_error() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create test database");
    let pool = db.pool().clone();
    let app = create_router(AppState::new(db));
    pool.close().await;

    let (status, body) = get_health(app).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "internal server error");
}
