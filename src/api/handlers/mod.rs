//! HTTP handlers.

mod products;
mod system;
mod warehouses;

#[cfg(test)]
mod system_test;
#[cfg(test)]
mod warehouses_test;

use serde::Serialize;
use utoipa::ToSchema;

pub use products::*;
pub use system::*;
pub use warehouses::*;

/// Body of responses that carry no entity
#[derive(Serialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "product deleted")]
    pub message: String,
}
