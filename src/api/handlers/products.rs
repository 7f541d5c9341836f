//! Product management handlers.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;

use crate::api::AppState;
use crate::api::error::{ApiError, ErrorResponse, json_body, path_id};
use crate::db::{Database, Id, Product, ProductPatch, ProductRepository, UpsertOutcome};

use super::MessageResponse;

const ENTITY: &str = "product";

// =============================================================================
// DTOs (Data Transfer Objects)
// =============================================================================

/// Product response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct ProductResponse {
    #[schema(example = 1)]
    pub id: Id,
    #[schema(example = "product 1")]
    pub name: String,
    #[schema(example = 100)]
    pub quantity: i64,
    #[schema(example = "code_value 1")]
    pub code_value: String,
    #[schema(example = true)]
    pub is_published: bool,
    /// Expiration date (YYYY-MM-DD)
    #[schema(example = "2021-12-31")]
    pub expiration: NaiveDate,
    #[schema(example = 100.0)]
    pub price: f64,
    #[schema(example = 1)]
    pub warehouse_id: Id,
}

impl From<Product> for ProductResponse {
    fn from(p: Product) -> Self {
        Self {
            id: p.id,
            name: p.name,
            quantity: p.quantity,
            code_value: p.code_value,
            is_published: p.is_published,
            expiration: p.expiration,
            price: p.price,
            warehouse_id: p.warehouse_id,
        }
    }
}

/// Full product body, used to create (POST) and to replace-or-create (PUT)
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    #[schema(example = "product 1")]
    pub name: String,
    #[schema(example = 100)]
    pub quantity: i64,
    #[schema(example = "code_value 1")]
    pub code_value: String,
    #[schema(example = true)]
    pub is_published: bool,
    #[schema(example = "2021-12-31")]
    pub expiration: NaiveDate,
    #[schema(example = 100.0)]
    pub price: f64,
    #[schema(example = 1)]
    pub warehouse_id: Id,
}

impl CreateProductRequest {
    fn into_product(self, id: Id) -> Product {
        Product {
            id,
            name: self.name,
            quantity: self.quantity,
            code_value: self.code_value,
            is_published: self.is_published,
            expiration: self.expiration,
            price: self.price,
            warehouse_id: self.warehouse_id,
        }
    }
}

/// Partial product body; omitted fields keep their stored value
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub quantity: Option<i64>,
    pub code_value: Option<String>,
    pub is_published: Option<bool>,
    #[schema(example = "2022-06-30")]
    pub expiration: Option<NaiveDate>,
    pub price: Option<f64>,
    pub warehouse_id: Option<Id>,
}

impl From<UpdateProductRequest> for ProductPatch {
    fn from(r: UpdateProductRequest) -> Self {
        Self {
            name: r.name,
            quantity: r.quantity,
            code_value: r.code_value,
            is_published: r.is_published,
            expiration: r.expiration,
            price: r.price,
            warehouse_id: r.warehouse_id,
        }
    }
}

/// `{message, data}` envelope around one product
#[derive(Serialize, ToSchema)]
pub struct ProductEnvelope {
    #[schema(example = "product found")]
    pub message: String,
    pub data: ProductResponse,
}

/// `{message, data}` envelope around a product list
#[derive(Serialize, ToSchema)]
pub struct ProductListEnvelope {
    #[schema(example = "products found")]
    pub message: String,
    pub data: Vec<ProductResponse>,
}

fn envelope(message: &str, product: Product) -> Json<ProductEnvelope> {
    Json(ProductEnvelope {
        message: message.to_string(),
        data: ProductResponse::from(product),
    })
}

// =============================================================================
// Handlers
// =============================================================================

/// List all products
#[utoipa::path(
    get,
    path = "/products",
    tag = "products",
    responses(
        (status = 200, description = "All products", body = ProductListEnvelope),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn list_products<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<ProductListEnvelope>, ApiError> {
    let products = state
        .db()
        .products()
        .get_all()
        .await
        .map_err(ApiError::from_db(ENTITY))?;

    Ok(Json(ProductListEnvelope {
        message: "products found".to_string(),
        data: products.into_iter().map(ProductResponse::from).collect(),
    }))
}

/// Get a product by ID
#[utoipa::path(
    get,
    path = "/products/{id}",
    tag = "products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product found", body = ProductEnvelope),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_product<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<ProductEnvelope>, ApiError> {
    let id = path_id(id)?;

    let product = state
        .db()
        .products()
        .get_one(id)
        .await
        .map_err(ApiError::from_db(ENTITY))?;

    Ok(envelope("product found", product))
}

/// Create a new product
///
/// The id is assigned by the store and returned in the body.
#[utoipa::path(
    post,
    path = "/products",
    tag = "products",
    request_body = CreateProductRequest,
    responses(
        (status = 201, description = "Product created", body = ProductEnvelope),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 409, description = "Code value already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error, including unknown warehouse_id", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn create_product<D: Database>(
    State(state): State<AppState<D>>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductEnvelope>), ApiError> {
    let mut product = json_body(body)?.into_product(0);

    state
        .db()
        .products()
        .store(&mut product)
        .await
        .map_err(ApiError::from_db(ENTITY))?;

    Ok((StatusCode::CREATED, envelope("product created", product)))
}

/// Partially update a product
#[utoipa::path(
    patch,
    path = "/products/{id}",
    tag = "products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = UpdateProductRequest,
    responses(
        (status = 200, description = "Product updated", body = ProductEnvelope),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 409, description = "Code value already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn update_product<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
    body: Result<Json<UpdateProductRequest>, JsonRejection>,
) -> Result<Json<ProductEnvelope>, ApiError> {
    let id = path_id(id)?;
    let patch = ProductPatch::from(json_body(body)?);

    let product = state
        .db()
        .products()
        .update_partial(id, &patch)
        .await
        .map_err(ApiError::from_db(ENTITY))?;

    Ok(envelope("product updated", product))
}

/// Replace a product, creating it at this id if absent
#[utoipa::path(
    put,
    path = "/products/{id}",
    tag = "products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = CreateProductRequest,
    responses(
        (status = 200, description = "Product replaced", body = ProductEnvelope),
        (status = 201, description = "Product created", body = ProductEnvelope),
        (status = 400, description = "Invalid id or body", body = ErrorResponse),
        (status = 409, description = "Code value already in use", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn upsert_product<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
    body: Result<Json<CreateProductRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductEnvelope>), ApiError> {
    let id = path_id(id)?;
    let product = json_body(body)?.into_product(id);

    let outcome = state
        .db()
        .products()
        .upsert(&product)
        .await
        .map_err(ApiError::from_db(ENTITY))?;

    Ok(match outcome {
        UpsertOutcome::Created => (StatusCode::CREATED, envelope("product created", product)),
        UpsertOutcome::Updated => (StatusCode::OK, envelope("product updated", product)),
    })
}

/// Delete a product
#[utoipa::path(
    delete,
    path = "/products/{id}",
    tag = "products",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Product deleted", body = MessageResponse),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 404, description = "Product not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn delete_product<D: Database>(
    State(state): State<AppState<D>>,
    id: Result<Path<Id>, PathRejection>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = path_id(id)?;

    state
        .db()
        .products()
        .delete(id)
        .await
        .map_err(ApiError::from_db(ENTITY))?;

    Ok(Json(MessageResponse {
        message: "product deleted".to_string(),
    }))
}
