//! Liveness probe and the JSON answers for unrouted requests.

use axum::{Json, extract::State, http::Method, http::Uri};
use serde::Serialize;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use crate::api::AppState;
use crate::api::error::{ApiError, ErrorResponse};
use crate::db::Database;

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

/// Health check endpoint
///
/// Answers `ok` only when the store responds.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    responses(
        (status = 200, description = "Store reachable", body = HealthResponse),
        (status = 500, description = "Store unreachable", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn health<D: Database>(
    State(state): State<AppState<D>>,
) -> Result<Json<HealthResponse>, ApiError> {
    state
        .db()
        .ping()
        .await
        .map_err(ApiError::from_db("database"))?;

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
    }))
}

pub async fn route_not_found(uri: Uri) -> ApiError {
    debug!(%uri, "no route");
    ApiError::NoRoute
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> ApiError {
    debug!(%method, %uri, "method not allowed");
    ApiError::MethodNotAllowed
}
