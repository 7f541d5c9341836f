//! In-memory implementation of the database traits.
//!
//! Mirrors the SQLite contract (unique names and codes, the product to
//! warehouse foreign key, not-found semantics) without a real store. Used by
//! handler tests and handy for local experiments.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::db::{
    Database, DbError, DbResult, Id, Product, ProductPatch, ProductRepository, ReportProduct,
    UpsertOutcome, Warehouse, WarehouseRepository,
};

#[derive(Default)]
struct Tables {
    products: BTreeMap<Id, Product>,
    warehouses: BTreeMap<Id, Warehouse>,
    last_product_id: Id,
    last_warehouse_id: Id,
}

impl Tables {
    /// Reject a product that would break the unique code or the foreign key.
    fn check_product(&self, product: &Product) -> DbResult<()> {
        let code_taken = self
            .products
            .values()
            .any(|p| p.id != product.id && p.code_value == product.code_value);
        if code_taken {
            return Err(DbError::already_exists("Product", &product.code_value));
        }
        if !self.warehouses.contains_key(&product.warehouse_id) {
            return Err(DbError::Database {
                message: "FOREIGN KEY constraint failed".to_string(),
            });
        }
        Ok(())
    }
}

/// Thread-safe in-memory database.
#[derive(Default)]
pub struct MemoryDatabase {
    tables: Mutex<Tables>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Tables>> {
        self.tables.lock().map_err(|e| DbError::Database {
            message: format!("Failed to acquire database lock: {}", e),
        })
    }
}

/// Product repository over [`MemoryDatabase`].
pub struct MemoryProductRepository<'a> {
    db: &'a MemoryDatabase,
}

/// Warehouse repository over [`MemoryDatabase`].
pub struct MemoryWarehouseRepository<'a> {
    db: &'a MemoryDatabase,
}

impl<'a> ProductRepository for MemoryProductRepository<'a> {
    async fn get_all(&self) -> DbResult<Vec<Product>> {
        Ok(self.db.lock()?.products.values().cloned().collect())
    }

    async fn get_one(&self, id: Id) -> DbResult<Product> {
        self.db
            .lock()?
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    async fn store(&self, product: &mut Product) -> DbResult<()> {
        let mut tables = self.db.lock()?;
        let id = tables.last_product_id + 1;
        let stored = Product {
            id,
            ..product.clone()
        };
        tables.check_product(&stored)?;

        tables.last_product_id = id;
        tables.products.insert(id, stored);
        product.id = id;
        Ok(())
    }

    async fn update(&self, product: &Product) -> DbResult<()> {
        let mut tables = self.db.lock()?;
        if !tables.products.contains_key(&product.id) {
            return Err(DbError::not_found("Product", product.id));
        }
        tables.check_product(product)?;
        tables.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn update_partial(&self, id: Id, patch: &ProductPatch) -> DbResult<Product> {
        let mut tables = self.db.lock()?;
        let mut product = tables
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Product", id))?;

        patch.apply(&mut product);
        tables.check_product(&product)?;
        tables.products.insert(id, product.clone());
        Ok(product)
    }

    async fn upsert(&self, product: &Product) -> DbResult<UpsertOutcome> {
        let mut tables = self.db.lock()?;
        tables.check_product(product)?;

        let outcome = match tables.products.insert(product.id, product.clone()) {
            Some(_) => UpsertOutcome::Updated,
            None => UpsertOutcome::Created,
        };
        tables.last_product_id = tables.last_product_id.max(product.id);
        Ok(outcome)
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        self.db
            .lock()?
            .products
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| DbError::not_found("Product", id))
    }
}

impl<'a> WarehouseRepository for MemoryWarehouseRepository<'a> {
    async fn get_all(&self) -> DbResult<Vec<Warehouse>> {
        Ok(self.db.lock()?.warehouses.values().cloned().collect())
    }

    async fn get_one(&self, id: Id) -> DbResult<Warehouse> {
        self.db
            .lock()?
            .warehouses
            .get(&id)
            .cloned()
            .ok_or_else(|| DbError::not_found("Warehouse", id))
    }

    async fn store(&self, warehouse: &mut Warehouse) -> DbResult<()> {
        let mut tables = self.db.lock()?;
        if tables.warehouses.values().any(|w| w.name == warehouse.name) {
            return Err(DbError::already_exists("Warehouse", &warehouse.name));
        }

        let id = tables.last_warehouse_id + 1;
        tables.last_warehouse_id = id;
        tables.warehouses.insert(
            id,
            Warehouse {
                id,
                ..warehouse.clone()
            },
        );
        warehouse.id = id;
        Ok(())
    }

    async fn report_products(&self, warehouse_id: Option<Id>) -> DbResult<Vec<ReportProduct>> {
        let tables = self.db.lock()?;
        let report = tables
            .warehouses
            .values()
            .filter(|w| warehouse_id.is_none_or(|id| w.id == id))
            .map(|w| ReportProduct {
                name: w.name.clone(),
                product_count: tables
                    .products
                    .values()
                    .filter(|p| p.warehouse_id == w.id)
                    .count() as i64,
            })
            .collect();
        Ok(report)
    }
}

impl Database for MemoryDatabase {
    type Products<'a> = MemoryProductRepository<'a>;
    type Warehouses<'a> = MemoryWarehouseRepository<'a>;

    async fn migrate(&self) -> DbResult<()> {
        Ok(())
    }

    async fn ping(&self) -> DbResult<()> {
        self.lock().map(|_| ())
    }

    fn products(&self) -> Self::Products<'_> {
        MemoryProductRepository { db: self }
    }

    fn warehouses(&self) -> Self::Warehouses<'_> {
        MemoryWarehouseRepository { db: self }
    }
}
