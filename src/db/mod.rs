//! Database abstraction layer.
//!
//! This module provides trait-based abstractions for data access,
//! allowing different storage backends (SQLite, in-memory) to be swapped
//! without changing the HTTP layer.
//!
//! # Architecture
//!
//! - `config`: Connection settings read from the environment
//! - `error`: Storage-agnostic error types
//! - `models`: Domain entities (Product, Warehouse, ReportProduct)
//! - `repository`: Trait definitions for data access
//! - `sqlite`: SQLx-backed implementation
//! - `memory`: In-process implementation with the same contract

mod config;
mod error;
mod memory;
mod models;
mod repository;
mod sqlite;


pub use config::DatabaseConfig;
pub use error::{DbError, DbResult};
pub use memory::{MemoryDatabase, MemoryProductRepository, MemoryWarehouseRepository};
pub use models::*;
pub use repository::*;
pub use sqlite::{SqliteDatabase, SqliteProductRepository, SqliteWarehouseRepository};
