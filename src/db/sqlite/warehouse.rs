//! SQLite WarehouseRepository implementation.

use std::time::Duration;

use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::helpers::{storage_error, with_deadline, write_error};
use crate::db::{DbError, DbResult, Id, ReportProduct, Warehouse, WarehouseRepository};

const ENTITY: &str = "Warehouse";

/// SQLx-backed warehouse repository.
pub struct SqliteWarehouseRepository<'a> {
    pub(crate) pool: &'a SqlitePool,
    pub(crate) timeout: Duration,
}

// The column is spelled `adress` in the schema.
fn warehouse_from_row(row: &SqliteRow) -> Result<Warehouse, sqlx::Error> {
    Ok(Warehouse {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        address: row.try_get("adress")?,
        telephone: row.try_get("telephone")?,
        capacity: row.try_get("capacity")?,
    })
}

/// Build the report statement; the WHERE clause only exists for a single warehouse.
fn report_query(filtered: bool) -> String {
    let mut sql = String::from(
        "SELECT w.name, COUNT(p.id) AS product_count \
         FROM warehouses w LEFT JOIN products p ON p.id_warehouse = w.id ",
    );
    if filtered {
        sql.push_str("WHERE w.id = ? ");
    }
    sql.push_str("GROUP BY w.id, w.name ORDER BY w.id");
    sql
}

impl<'a> WarehouseRepository for SqliteWarehouseRepository<'a> {
    async fn get_all(&self) -> DbResult<Vec<Warehouse>> {
        with_deadline(self.timeout, async {
            let rows = sqlx::query(
                "SELECT id, name, adress, telephone, capacity FROM warehouses ORDER BY id",
            )
            .fetch_all(self.pool)
            .await
            .map_err(storage_error)?;

            rows.iter()
                .map(warehouse_from_row)
                .collect::<Result<Vec<_>, _>>()
                .map_err(storage_error)
        })
        .await
    }

    async fn get_one(&self, id: Id) -> DbResult<Warehouse> {
        with_deadline(self.timeout, async {
            let row = sqlx::query(
                "SELECT id, name, adress, telephone, capacity FROM warehouses WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(self.pool)
            .await
            .map_err(storage_error)?;

            let row = row.ok_or_else(|| DbError::not_found(ENTITY, id))?;
            warehouse_from_row(&row).map_err(storage_error)
        })
        .await
    }

    async fn store(&self, warehouse: &mut Warehouse) -> DbResult<()> {
        let new_id = with_deadline(self.timeout, async {
            let result = sqlx::query(
                "INSERT INTO warehouses (name, adress, telephone, capacity) VALUES (?, ?, ?, ?)",
            )
            .bind(&warehouse.name)
            .bind(&warehouse.address)
            .bind(&warehouse.telephone)
            .bind(warehouse.capacity)
            .execute(self.pool)
            .await
            .map_err(|e| write_error(ENTITY, &warehouse.name, e))?;

            Ok(result.last_insert_rowid())
        })
        .await?;

        warehouse.id = new_id;
        Ok(())
    }

    async fn report_products(&self, warehouse_id: Option<Id>) -> DbResult<Vec<ReportProduct>> {
        with_deadline(self.timeout, async {
            let sql = report_query(warehouse_id.is_some());
            let mut query = sqlx::query(&sql);
            if let Some(id) = warehouse_id {
                query = query.bind(id);
            }

            let rows = query.fetch_all(self.pool).await.map_err(storage_error)?;

            rows.iter()
                .map(|row| -> Result<ReportProduct, sqlx::Error> {
                    Ok(ReportProduct {
                        name: row.try_get("name")?,
                        product_count: row.try_get("product_count")?,
                    })
                })
                .collect::<Result<Vec<_>, _>>()
                .map_err(storage_error)
        })
        .await
    }
}
