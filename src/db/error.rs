//! Database error types.
//!
//! This module provides abstracted error types for database operations.
//! It uses miette for fancy diagnostic output and thiserror for derive macros.
//! The error types are storage-backend agnostic: each backend classifies its
//! own signals (missing rows, unique-key violations) into these variants.

use miette::Diagnostic;
use thiserror::Error;

/// Database operation errors.
#[derive(Error, Diagnostic, Debug)]
pub enum DbError {
    #[error("Entity not found: {entity_type} with id '{id}'")]
    #[diagnostic(code(inventory::db::not_found))]
    NotFound { entity_type: String, id: String },

    #[error("Entity already exists: {entity_type} '{key}'")]
    #[diagnostic(code(inventory::db::already_exists))]
    AlreadyExists { entity_type: String, key: String },

    #[error("Database error: {message}")]
    #[diagnostic(code(inventory::db::database_error))]
    Database { message: String },

    #[error("Statement timed out after {millis}ms")]
    #[diagnostic(
        code(inventory::db::timeout),
        help("Raise INVENTORY_DB_STATEMENT_TIMEOUT_MS if the store is slow but healthy")
    )]
    Timeout { millis: u64 },

    #[error("Migration error: {message}")]
    #[diagnostic(code(inventory::db::migration_error))]
    Migration { message: String },

    #[error("Connection error: {message}")]
    #[diagnostic(code(inventory::db::connection_error))]
    Connection { message: String },
}

impl DbError {
    pub(crate) fn not_found(entity_type: &str, id: impl ToString) -> Self {
        DbError::NotFound {
            entity_type: entity_type.to_string(),
            id: id.to_string(),
        }
    }

    pub(crate) fn already_exists(entity_type: &str, key: impl ToString) -> Self {
        DbError::AlreadyExists {
            entity_type: entity_type.to_string(),
            key: key.to_string(),
        }
    }

    /// True for failures of the store itself rather than domain outcomes.
    pub fn is_storage_fault(&self) -> bool {
        !matches!(
            self,
            DbError::NotFound { .. } | DbError::AlreadyExists { .. }
        )
    }
}

/// Result type for database operations.
pub type DbResult<T> = Result<T, DbError>;
