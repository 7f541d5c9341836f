//! SQLite database connection and migration management.

use std::str::FromStr;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use super::helpers::{storage_error, with_deadline};
use super::{SqliteProductRepository, SqliteWarehouseRepository};
use crate::db::{Database, DatabaseConfig, DbError, DbResult};

/// SQLite database implementation.
///
/// Owns a connection pool shared by every repository it hands out. Clones
/// share the same pool.
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
    statement_timeout: Duration,
}

impl SqliteDatabase {
    /// Open (creating if missing) the database described by `config`.
    pub async fn open(config: &DatabaseConfig) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.url)
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.statement_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self {
            pool,
            statement_timeout: config.statement_timeout,
        })
    }

    /// Create an in-memory database (useful for testing).
    ///
    /// Every SQLite `:memory:` connection is its own database, so the pool is
    /// pinned to a single connection that is never recycled.
    pub async fn in_memory() -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await
            .map_err(|e| DbError::Connection {
                message: e.to_string(),
            })?;

        Ok(Self {
            pool,
            statement_timeout: DatabaseConfig::default().statement_timeout,
        })
    }

    /// Access the underlying pool, e.g. for seeding fixtures in tests.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl Database for SqliteDatabase {
    type Products<'a> = SqliteProductRepository<'a>;
    type Warehouses<'a> = SqliteWarehouseRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        sqlx::migrate!("data/sql/sqlite")
            .run(&self.pool)
            .await
            .map_err(|e| DbError::Migration {
                message: e.to_string(),
            })
    }

    async fn ping(&self) -> DbResult<()> {
        with_deadline(self.statement_timeout, async {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(storage_error)?;
            Ok(())
        })
        .await
    }

    fn products(&self) -> Self::Products<'_> {
        SqliteProductRepository {
            pool: &self.pool,
            timeout: self.statement_timeout,
        }
    }

    fn warehouses(&self) -> Self::Warehouses<'_> {
        SqliteWarehouseRepository {
            pool: &self.pool,
            timeout: self.statement_timeout,
        }
    }
}
