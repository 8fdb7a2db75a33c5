//! Shipyard Persistence - Database entities and the version-tracked write path
//!
//! This crate provides:
//! - SeaORM entity definitions
//! - `VersionStore` and `ShippingRepository` traits with SQL implementations
//! - Idempotent schema initialization
//! - `ShippingService`, pairing every insert with a version bump

pub mod entity;
pub mod model;
pub mod schema;
pub mod service;
pub mod sql;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export sea-orm for convenience
pub use sea_orm;

// Re-export persistence traits
pub use traits::{ShippingRepository, VersionStore};

// Re-export SQL backend
pub use sql::{SqlShippingRepository, SqlVersionStore};

pub use model::{CreatedEntry, NewShippingEntry, ShippingEntry, ShippingSnapshot};
pub use schema::init_schema;
pub use service::ShippingService;
