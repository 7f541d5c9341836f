//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing the HTTP layer.
//! Methods return `Send` futures so handlers generic over [`Database`]
//! can be served from a multi-threaded runtime.

use std::future::Future;

use crate::db::{
    DbResult,
    models::{Id, Product, ProductPatch, ReportProduct, UpsertOutcome, Warehouse},
};

/// Repository for Product operations.
pub trait ProductRepository: Send + Sync {
    /// Get all products, ordered by id.
    fn get_all(&self) -> impl Future<Output = DbResult<Vec<Product>>> + Send;

    /// Get a product by ID.
    fn get_one(&self, id: Id) -> impl Future<Output = DbResult<Product>> + Send;

    /// Insert a new product and write the assigned id back into it.
    fn store(&self, product: &mut Product) -> impl Future<Output = DbResult<()>> + Send;

    /// Replace every mutable field of an existing product.
    fn update(&self, product: &Product) -> impl Future<Output = DbResult<()>> + Send;

    /// Overwrite only the fields present in `patch` and return the result.
    fn update_partial(
        &self,
        id: Id,
        patch: &ProductPatch,
    ) -> impl Future<Output = DbResult<Product>> + Send;

    /// Update the product at `product.id`, creating it there if absent.
    fn upsert(&self, product: &Product) -> impl Future<Output = DbResult<UpsertOutcome>> + Send;

    /// Delete a product by ID.
    fn delete(&self, id: Id) -> impl Future<Output = DbResult<()>> + Send;
}

/// Repository for Warehouse operations.
pub trait WarehouseRepository: Send + Sync {
    /// Get all warehouses, ordered by id.
    fn get_all(&self) -> impl Future<Output = DbResult<Vec<Warehouse>>> + Send;

    /// Get a warehouse by ID.
    fn get_one(&self, id: Id) -> impl Future<Output = DbResult<Warehouse>> + Send;

    /// Insert a new warehouse and write the assigned id back into it.
    fn store(&self, warehouse: &mut Warehouse) -> impl Future<Output = DbResult<()>> + Send;

    /// Count products per warehouse.
    ///
    /// `None` reports every warehouse, including empty ones. `Some(id)`
    /// restricts the report to that warehouse; an unknown id yields an
    /// empty report rather than `NotFound`.
    fn report_products(
        &self,
        warehouse_id: Option<Id>,
    ) -> impl Future<Output = DbResult<Vec<ReportProduct>>> + Send;
}

/// Combined database interface.
///
/// Provides access to repositories via associated types, avoiding dynamic dispatch.
pub trait Database: Send + Sync {
    type Products<'a>: ProductRepository
    where
        Self: 'a;
    type Warehouses<'a>: WarehouseRepository
    where
        Self: 'a;

    /// Apply the schema.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Round-trip to the store without touching any table.
    fn ping(&self) -> impl Future<Output = DbResult<()>> + Send;

    /// Get the product repository.
    fn products(&self) -> Self::Products<'_>;

    /// Get the warehouse repository.
    fn warehouses(&self) -> Self::Warehouses<'_>;
}
