//! Shipping repository trait
//!
//! Defines the interface for shipping entry storage operations.

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

use crate::model::{NewShippingEntry, ShippingEntry};

/// Shipping entry persistence operations
#[async_trait]
pub trait ShippingRepository: Send + Sync {
    /// All entries ordered by position, ties broken by id
    async fn list_all(&self, txn: &DatabaseTransaction) -> anyhow::Result<Vec<ShippingEntry>>;

    /// Validate and insert a new entry, returning it fully populated.
    ///
    /// Fails with `ShipyardError::Validation` naming the offending fields.
    async fn create(
        &self,
        txn: &DatabaseTransaction,
        new_entry: &NewShippingEntry,
    ) -> anyhow::Result<ShippingEntry>;
}
