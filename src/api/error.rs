//! HTTP error mapping.
//!
//! Every failure leaves the API as `{ "message": ... }` with an
//! `application/json` content type.

use axum::{
    Json,
    extract::{
        Path, Query,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::db::{DbError, Id};

/// Error response DTO
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    #[schema(example = "product not found")]
    pub message: String,
}

/// Request-level failures, one per HTTP status the API emits.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    #[error("{entity} already exists")]
    Conflict { entity: &'static str },

    #[error("internal server error")]
    Internal,

    #[error("route not found")]
    NoRoute,

    #[error("method not allowed")]
    MethodNotAllowed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NoRoute => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Map a repository error for `entity` onto its HTTP counterpart.
    ///
    /// Storage faults are logged here and replaced by a generic message so
    /// backend text never reaches the client.
    pub fn from_db(entity: &'static str) -> impl FnOnce(DbError) -> ApiError {
        move |e| match e {
            _ if e.is_storage_fault() => {
                error!(entity, error = %e, "storage fault");
                ApiError::Internal
            }
            DbError::NotFound { .. } => ApiError::NotFound { entity },
            _ => ApiError::Conflict { entity },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                message: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// Extract a positive integer id from the path.
pub fn path_id(path: Result<Path<Id>, PathRejection>) -> Result<Id, ApiError> {
    match path {
        Ok(Path(id)) if id > 0 => Ok(id),
        Ok(Path(id)) => {
            debug!(id, "rejected non-positive id");
            Err(ApiError::InvalidInput("invalid id".to_string()))
        }
        Err(rejection) => {
            debug!(%rejection, "rejected path");
            Err(ApiError::InvalidInput("invalid id".to_string()))
        }
    }
}

/// Unwrap a JSON body, turning every rejection into a 400.
pub fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        debug!(%rejection, "rejected request body");
        ApiError::InvalidInput("invalid request body".to_string())
    })
}

/// Unwrap query parameters; the only query the API takes is an `id`.
pub fn query_params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    query.map(|Query(value)| value).map_err(|rejection| {
        debug!(%rejection, "rejected query string");
        ApiError::InvalidInput("invalid id".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_db_maps_domain_errors() {
        let not_found = ApiError::from_db("product")(DbError::NotFound {
            entity_type: "Product".to_string(),
            id: "3".to_string(),
        });
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "product not found");

        let conflict = ApiError::from_db("warehouse")(DbError::AlreadyExists {
            entity_type: "Warehouse".to_string(),
            key: "W1".to_string(),
        });
        assert_eq!(conflict.status(), StatusCode::CONFLICT);
        assert_eq!(conflict.to_string(), "warehouse already exists");
    }

    #[test]
    fn from_db_hides_storage_fault_details() {
        let err = ApiError::from_db("product")(DbError::Database {
            message: "near \"SELEC\": syntax error".to_string(),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "internal server error");

        let err = ApiError::from_db("product")(DbError::Timeout { millis: 5 });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn from_db_classifies_through_storage_fault_check() {
        for fault in [
            DbError::Connection {
                message: "refused".to_string(),
            },
            DbError::Migration {
                message: "checksum".to_string(),
            },
        ] {
            assert!(fault.is_storage_fault());
            assert!(matches!(ApiError::from_db("warehouse")(fault), ApiError::Internal));
        }
    }

    #[test]
    fn routing_errors_have_their_own_statuses() {
        assert_eq!(ApiError::NoRoute.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::NoRoute.to_string(), "route not found");
        assert_eq!(ApiError::MethodNotAllowed.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn path_id_rejects_zero_and_negative() {
        assert_eq!(path_id(Ok(Path(7))).unwrap(), 7);
        assert!(matches!(path_id(Ok(Path(0))), Err(ApiError::InvalidInput(_))));
        assert!(matches!(path_id(Ok(Path(-3))), Err(ApiError::InvalidInput(_))));
    }
}
