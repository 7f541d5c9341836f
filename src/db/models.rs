//! Domain models for the inventory database.
//!
//! These models are storage-agnostic and represent the core entities
//! used throughout the application.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Integer primary key assigned by the store. `0` means "not yet persisted".
pub type Id = i64;

/// A stocked product, always attached to one warehouse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: Id,
    pub name: String,
    pub quantity: i64,
    /// Business code, unique across all products.
    pub code_value: String,
    pub is_published: bool,
    /// Calendar date only; serialized as `YYYY-MM-DD`.
    pub expiration: NaiveDate,
    pub price: f64,
    pub warehouse_id: Id,
}

/// Partial product update. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub code_value: Option<String>,
    pub is_published: Option<bool>,
    pub expiration: Option<NaiveDate>,
    pub price: Option<f64>,
    pub warehouse_id: Option<Id>,
}

impl ProductPatch {
    /// Apply the patch onto an existing product.
    pub fn apply(&self, product: &mut Product) {
        if let Some(name) = &self.name {
            product.name = name.clone();
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
        if let Some(code_value) = &self.code_value {
            product.code_value = code_value.clone();
        }
        if let Some(is_published) = self.is_published {
            product.is_published = is_published;
        }
        if let Some(expiration) = self.expiration {
            product.expiration = expiration;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(warehouse_id) = self.warehouse_id {
            product.warehouse_id = warehouse_id;
        }
    }
}

/// A storage location. Names are unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warehouse {
    pub id: Id,
    pub name: String,
    pub address: String,
    pub telephone: String,
    pub capacity: i64,
}

/// Product count per warehouse, computed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportProduct {
    /// Warehouse name.
    pub name: String,
    pub product_count: i64,
}

/// Which branch an upsert took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}
