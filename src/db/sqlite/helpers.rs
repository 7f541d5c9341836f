//! Shared helper functions for SQLite repositories.

use std::future::Future;
use std::time::Duration;

use crate::db::{DbError, DbResult};

/// Run one repository call under the statement deadline.
///
/// On expiry the inner future is dropped, which aborts the in-flight
/// statement and returns its connection to the pool.
pub async fn with_deadline<T, F>(limit: Duration, call: F) -> DbResult<T>
where
    F: Future<Output = DbResult<T>>,
{
    tokio::time::timeout(limit, call)
        .await
        .map_err(|_| DbError::Timeout {
            millis: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
        })?
}

/// Classify a driver error that carries no domain meaning.
pub fn storage_error(e: sqlx::Error) -> DbError {
    DbError::Database {
        message: e.to_string(),
    }
}

/// Classify a driver error raised by an INSERT or UPDATE.
///
/// Unique-index violations become `AlreadyExists` for `entity_type`/`key`;
/// everything else, foreign-key failures included, is a storage fault.
pub fn write_error(entity_type: &str, key: &str, e: sqlx::Error) -> DbError {
    let unique = e
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation());

    if unique {
        DbError::already_exists(entity_type, key)
    } else {
        storage_error(e)
    }
}
