//! API route configuration.

use axum::Router;
use axum::routing::{delete, get, patch, post, put};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::error::ErrorResponse;
use super::handlers::{
    self, CreateProductRequest, CreateWarehouseRequest, HealthResponse, MessageResponse,
    ProductEnvelope, ProductListEnvelope, ProductResponse, ReportProductResponse,
    ReportProductsEnvelope, UpdateProductRequest, WarehouseCreatedEnvelope, WarehouseEnvelope,
    WarehouseListEnvelope, WarehouseResponse,
};
use super::state::AppState;
use crate::db::Database;

/// Build routes with generic database type.
///
/// Applies the turbofish to every handler so each route is registered
/// against the concrete `Database`.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Inventory API",
        version = "0.1.0",
        description = "Product and warehouse inventory service",
        license(name = "GPL-2.0")
    ),
    paths(
        handlers::health,
        handlers::list_products,
        handlers::get_product,
        handlers::create_product,
        handlers::update_product,
        handlers::upsert_product,
        handlers::delete_product,
        handlers::list_warehouses,
        handlers::get_warehouse,
        handlers::create_warehouse,
        handlers::report_products,
    ),
    components(
        schemas(
            HealthResponse,
            ProductResponse,
            CreateProductRequest,
            UpdateProductRequest,
            ProductEnvelope,
            ProductListEnvelope,
            WarehouseResponse,
            CreateWarehouseRequest,
            WarehouseEnvelope,
            WarehouseListEnvelope,
            WarehouseCreatedEnvelope,
            ReportProductResponse,
            ReportProductsEnvelope,
            MessageResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "products", description = "Product management endpoints"),
        (name = "warehouses", description = "Warehouse management and reporting endpoints")
    )
)]
pub struct ApiDoc;

/// Create the API router with OpenAPI documentation
pub fn create_router<D: Database + 'static>(state: AppState<D>) -> Router {
    let api = ApiDoc::openapi();

    let system_routes = routes!(D => {
        get "/health" => handlers::health,
    });

    let product_routes = routes!(D => {
        get "/products" => handlers::list_products,
        post "/products" => handlers::create_product,
        get "/products/{id}" => handlers::get_product,
        patch "/products/{id}" => handlers::update_product,
        put "/products/{id}" => handlers::upsert_product,
        delete "/products/{id}" => handlers::delete_product,
    });

    // The static report path wins over the `{id}` capture.
    let warehouse_routes = routes!(D => {
        get "/warehouses" => handlers::list_warehouses,
        post "/warehouses" => handlers::create_warehouse,
        get "/warehouses/reportProducts" => handlers::report_products,
        get "/warehouses/{id}" => handlers::get_warehouse,
    });

    system_routes
        .merge(product_routes)
        .merge(warehouse_routes)
        .merge(Scalar::with_url("/docs", api))
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(state)
}
