//! Warehouse management handlers.
//!
//! Reads answer with entity-named keys (`warehouses`, `warehouse`); the
//! create and report endpoints use `data`.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::{IntoParams, ToSchema};

use crate::api::AppState;
use crate::api::error::{ApiError, ErrorResponse, json_body, path_id, query_params};
use crate::db::{Database, Id, ReportProduct, Warehouse, WarehouseRepository};

const ENTITY: &str = "warehouse";

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// Warehouse response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct WarehouseResponse {
    #[schema(example = 1)]
    pub id: Id,
    #[schema(example = "warehouse 1")]
    pub name: String,
    #[schema(example = "address 1")]
    pub address: String,
    #[schema(example = "telephone 1")]
    pub telephone: String,
    #[schema(example = 100)]
    pub capacity: i64,
}

impl From<Warehouse> for WarehouseResponse {
    fn from(w: Warehouse) -> Self {
        Self {
            id: w.id,
            name: w.name,
            address: w.address,
            telephone: w.telephone,
            capacity: w.capacity,
        }
    }
}

/// Create warehouse request DTO
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateWarehouseRequest {
    #[schema(example = "warehouse 1")]
    pub name: String,
    #[schema(example = "address 1")]
    pub address: String,
    #[schema(example = "telephone 1")]
    pub telephone: String,
    #[schema(example = 100)]
    pub capacity: i64,
}

/// One report row
#[derive(Debug, Serialize, ToSchema)]
pub struct ReportProductResponse {
    /// Warehouse name
    #[schema(example = "warehouse 1")]
    pub name: String,
    #[schema(example = 3)]
    pub product_count: i64,
}

impl From<ReportProduct> for ReportProductResponse {
    fn from(r: ReportProduct) -> Self {
        Self {
            name: r.name,
            product_count: r.product_count,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportProductsQuery {
    /// Warehouse ID; absent or 0 reports every warehouse
    #[param(example = "1")]
    pub id: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct WarehouseListEnvelope {
    #[schema(example = "warehouses found")]
    pub message: String,
    pub warehouses: Vec<WarehouseResponse>,
}

#[derive(Serialize, ToSchema)]
pub struct WarehouseEnvelope {
    #[schema(example = "warehouse found")]
    pub message: String,
    pub warehouse: WarehouseResponse,
}

#[derive(Serialize, ToSchema)]
pub struct WarehouseCreatedEnvelope {
    #[schema(example = "warehouse created")]
    pub message: String,
    pub data: WarehouseResponse,
}

#[derive(Serialize, ToSchema)]
pub struct ReportProductsEnvelope {
    #[schema(example = "generate report product success")]
    pub message: String,
    pub data: Vec<ReportProductResponse>,
}

/// Resolve the report scope from the raw `id` query value.
fn report_scope(raw: Option<&str>) -> Result<Option<Id>, ApiError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => match s.parse::<Id>() {
            Ok(0) => Ok(None),
            Ok(id) if id > 0 => Ok(Some(id)),
            _ => Err(ApiError::InvalidInput("invalid id".to_string())),
        },
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// List all warehouses
#[utoipa::path(
    get,
    path = "/warehouses",
    tag = "warehouses",
    responses(
        (status = 200, description = "All warehouses", body = WarehouseListEnvelope),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_warehouses<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<WarehouseListEnvelope>, ApiError> {
    let warehouses = state
        .db()
        .warehouses()
        .get_all()
        .await
        .map_err(ApiError::from_db(ENTITY))?;

    Ok(Json(WarehouseListEnvelope {
        message: "warehouses found".to_string(),
        warehouses: warehouses
            .into_iter()
            .map(WarehouseResponse::from)
            .collect(),
    }))
}

/// Get a warehouse by ID
#[utoipa::path(
    get,
    path = "/warehouses/{id}",
    tag = "warehouses",
    params(
        ("id" = i64, Path, description = "Warehouse ID")
    ),
    responses(
        (status = 200, description = "Warehouse found", body = WarehouseEnvelope),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Warehouse not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_warehouse<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<WarehouseEnvelope>, ApiError> {
    let id = path_id(id)?;

    let warehouse = state
        .db()
        .warehouses()
        .get_one(id)
        .await
        .map_err(ApiError::from_db(ENTITY))?;

    Ok(Json(WarehouseEnvelope {
        message: "warehouse found".to_string(),
        warehouse: WarehouseResponse::from(warehouse),
    }))
}

/// Create a new warehouse
#[utoipa::path(
    post,
    path = "/warehouses",
    tag = "warehouses",
    request_body = CreateWarehouseRequest,
    responses(
        (status = 201, description = "Warehouse created", body = WarehouseCreatedEnvelope),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 409, description = "Warehouse name already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_warehouse<D: Database>(
    State(state): State<AppState<D>>,
    body: Result<Json<CreateWarehouseRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<WarehouseCreatedEnvelope>), ApiError> {
    let req = json_body(body)?;
    let mut warehouse = Warehouse {
        id: 0,
        name: req.name,
        address: req.address,
        telephone: req.telephone,
        capacity: req.capacity,
    };

    state
        .db()
        .warehouses()
        .store(&mut warehouse)
        .await
        .map_err(ApiError::from_db(ENTITY))?;

    Ok((
        StatusCode::CREATED,
        Json(WarehouseCreatedEnvelope {
            message: "warehouse created".to_string(),
            data: WarehouseResponse::from(warehouse),
        }),
    ))
}

/// Count products per warehouse
///
/// Without `id` (or with `id=0`) every warehouse is reported, empty ones
/// included. An id matching no warehouse yields an empty list.
#[utoipa::path(
    get,
    path = "/warehouses/reportProducts",
    tag = "warehouses",
    params(ReportProductsQuery),
    responses(
        (status = 200, description = "Product counts", body = ReportProductsEnvelope),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn report_products<D: Database>(
    State(state): State<AppState<D>>,
    query: Result<Query<ReportProductsQuery>, QueryRejection>,
) -> Result<Json<ReportProductsEnvelope>, ApiError> {
    let query = query_params(query)?;
    let scope = report_scope(query.id.as_deref())?;

    let report = state
        .db()
        .warehouses()
        .report_products(scope)
        .await
        .map_err(ApiError::from_db(ENTITY))?;

    Ok(Json(ReportProductsEnvelope {
        message: "generate report product success".to_string(),
        data: report.into_iter().map(ReportProductResponse::from).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::report_scope;

    #[test]
    fn report_scope_treats_absent_empty_and_zero_as_all() {
        assert_eq!(report_scope(None).unwrap(), None);
        assert_eq!(report_scope(Some("")).unwrap(), None);
        assert_eq!(report_scope(Some("0")).unwrap(), None);
    }

    #[test]
    fn report_scope_accepts_positive_ids() {
        assert_eq!(report_scope(Some("12")).unwrap(), Some(12));
    }

    #[test]
    fn report_scope_rejects_garbage() {
        assert!(report_scope(Some("abc")).is_err());
        assert!(report_scope(Some("-1")).is_err());
    }
}
