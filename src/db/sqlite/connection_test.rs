//! Tests for SQLite database connection and migrations.

use crate::db::{Database, DatabaseConfig, DbError, SqliteDatabase, WarehouseRepository};

#[tokio::test(flavor = "multi_thread")]
async fn migrate_creates_all_tables() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");

    db.migrate().await.expect("Migration should succeed");

    let tables: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .fetch_all(db.pool())
            .await
            .expect("Query should succeed");

    for table in ["_sqlx_migrations", "products", "warehouses"] {
        assert!(
            tables.iter().any(|t| t == table),
            "Missing table: {}. Found tables: {:?}",
            table,
            tables
        );
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn migrate_is_idempotent() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");

    db.migrate().await.expect("First migration should succeed");
    db.migrate().await.expect("Second migration should succeed");
}

#[tokio::test(flavor = "multi_thread")]
async fn foreign_keys_are_enforced() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");

    let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
        .fetch_one(db.pool())
        .await
        .expect("Query should succeed");

    assert_eq!(enabled, 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn open_creates_file_backed_database() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("inventory.db");
    let config = DatabaseConfig::default().with_url(format!("sqlite://{}", path.display()));

    let db = SqliteDatabase::open(&config)
        .await
        .expect("Open should succeed");
    db.migrate().await.expect("Migration should succeed");

    assert!(path.exists());
    assert!(db.warehouses().get_all().await.unwrap().is_empty());
    db.close().await;
}

#[tokio::test(flavor = "multi_thread")]
async fn open_reports_unreachable_path_as_connection_error() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("missing").join("inventory.db");
    let config = DatabaseConfig::default().with_url(format!("sqlite://{}", path.display()));

    let result = SqliteDatabase::open(&config).await;
    assert!(matches!(result, Err(DbError::Connection { .. })));
}

#[tokio::test(flavor = "multi_thread")]
async fn ping_fails_once_pool_is_closed() {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");

    db.ping().await.expect("Ping should succeed");

    db.close().await;
    assert!(matches!(db.ping().await, Err(DbError::Database { .. })));
}
