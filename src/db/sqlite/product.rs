//! SQLite ProductRepository implementation.

use std::time::Duration;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::helpers::{storage_error, with_deadline, write_error};
use crate::db::{
    DbError, DbResult, Id, Product, ProductPatch, ProductRepository, UpsertOutcome,
};

const ENTITY: &str = "Product";

const COLUMNS: &str =
    "id, name, quantity, code_value, is_published, expiration, price, id_warehouse";

/// SQLx-backed product repository.
pub struct SqliteProductRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
    pub(crate) timeout: Duration,
}

fn product_from_row(row: &SqliteRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        quantity: row.try_get("quantity")?,
        code_value: row.try_get("code_value")?,
        is_published: row.try_get("is_published")?,
        expiration: row.try_get("expiration")?,
        price: row.try_get("price")?,
        warehouse_id: row.try_get("id_warehouse")?,
    })
}

impl<'a> ProductRepository for SqliteProductRepository<'a> {
    async fn get_all(&self) -> DbResult<Vec<Product>> {
        with_deadline(self.timeout, async {
            let rows = sqlx::query(&format!("SELECT {COLUMNS} FROM products ORDER BY id"))
                .fetch_all(self.pool)
                .await
                .map_err(storage_error)?;

            rows.iter()
                .map(product_from_row)
                .collect::<Result<Vec<_>, _>>()
                .map_err(storage_error)
        })
        .await
    }

    async fn get_one(&self, id: Id) -> DbResult<Product> {
        with_deadline(self.timeout, async {
            let row = sqlx::query(&format!("SELECT {COLUMNS} FROM products WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.pool)
                .await
                .map_err(storage_error)?;

            let row = row.ok_or_else(|| DbError::not_found(ENTITY, id))?;
            product_from_row(&row).map_err(storage_error)
        })
        .await
    }

    async fn store(&self, product: &mut Product) -> DbResult<()> {
        let new_id = with_deadline(self.timeout, async {
            let result = sqlx::query(
                "INSERT INTO products (name, quantity, code_value, is_published, expiration, price, id_warehouse) \
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
            )
            .bind(&product.name)
            .bind(product.quantity)
            .bind(&product.code_value)
            .bind(product.is_published)
            .bind(product.expiration)
            .bind(product.price)
            .bind(product.warehouse_id)
            .execute(self.pool)
            .await
            .map_err(|e| write_error(ENTITY, &product.code_value, e))?;

            Ok(result.last_insert_rowid())
        })
        .await?;

        product.id = new_id;
        Ok(())
    }

    async fn update(&self, product: &Product) -> DbResult<()> {
        with_deadline(self.timeout, async {
            let result = sqlx::query(
                "UPDATE products SET name = ?, quantity = ?, code_value = ?, is_published = ?, \
                 expiration = ?, price = ?, id_warehouse = ? WHERE id = ?",
            )
            .bind(&product.name)
            .bind(product.quantity)
            .bind(&product.code_value)
            .bind(product.is_published)
            .bind(product.expiration)
            .bind(product.price)
            .bind(product.warehouse_id)
            .bind(product.id)
            .execute(self.pool)
            .await
            .map_err(|e| write_error(ENTITY, &product.code_value, e))?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found(ENTITY, product.id));
            }
            Ok(())
        })
        .await
    }

    async fn update_partial(&self, id: Id, patch: &ProductPatch) -> DbResult<Product> {
        with_deadline(self.timeout, async {
            let row = sqlx::query(&format!(
                "UPDATE products SET \
                 name = COALESCE(?, name), \
                 quantity = COALESCE(?, quantity), \
                 code_value = COALESCE(?, code_value), \
                 is_published = COALESCE(?, is_published), \
                 expiration = COALESCE(?, expiration), \
                 price = COALESCE(?, price), \
                 id_warehouse = COALESCE(?, id_warehouse) \
                 WHERE id = ? RETURNING {COLUMNS}"
            ))
            .bind(&patch.name)
            .bind(patch.quantity)
            .bind(&patch.code_value)
            .bind(patch.is_published)
            .bind(patch.expiration)
            .bind(patch.price)
            .bind(patch.warehouse_id)
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(|e| write_error(ENTITY, patch.code_value.as_deref().unwrap_or_default(), e))?;

            let row = row.ok_or_else(|| DbError::not_found(ENTITY, id))?;
            product_from_row(&row).map_err(storage_error)
        })
        .await
    }

    async fn upsert(&self, product: &Product) -> DbResult<UpsertOutcome> {
        with_deadline(self.timeout, async {
            let mut tx = self.pool.begin().await.map_err(storage_error)?;

            let updated = sqlx::query(
                "UPDATE products SET name = ?, quantity = ?, code_value = ?, is_published = ?, \
                 expiration = ?, price = ?, id_warehouse = ? WHERE id = ?",
            )
            .bind(&product.name)
            .bind(product.quantity)
            .bind(&product.code_value)
            .bind(product.is_published)
            .bind(product.expiration)
            .bind(product.price)
            .bind(product.warehouse_id)
            .bind(product.id)
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(ENTITY, &product.code_value, e))?
            .rows_affected();

            let outcome = if updated > 0 {
                UpsertOutcome::Updated
            } else {
                sqlx::query(
                    "INSERT INTO products (id, name, quantity, code_value, is_published, expiration, price, id_warehouse) \
                     VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
                )
                .bind(product.id)
                .bind(&product.name)
                .bind(product.quantity)
                .bind(&product.code_value)
                .bind(product.is_published)
                .bind(product.expiration)
                .bind(product.price)
                .bind(product.warehouse_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| write_error(ENTITY, &product.code_value, e))?;
                UpsertOutcome::Created
            };

            tx.commit().await.map_err(storage_error)?;
            Ok(outcome)
        })
        .await
    }

    async fn delete(&self, id: Id) -> DbResult<()> {
        with_deadline(self.timeout, async {
            let result = sqlx::query("DELETE FROM products WHERE id = ?")
                .bind(id)
                .execute(self.pool)
                .await
                .map_err(storage_error)?;

            if result.rows_affected() == 0 {
                return Err(DbError::not_found(ENTITY, id));
            }
            Ok(())
        })
        .await
    }
}
