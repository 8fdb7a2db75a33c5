//! Version store trait
//!
//! Defines the interface for the per-table version watermark.

use async_trait::async_trait;
use sea_orm::DatabaseTransaction;

/// Version watermark operations
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Latest committed version of the named table.
    ///
    /// Fails with `ShipyardError::NotFound` when the table has no version record.
    async fn current_version(&self, txn: &DatabaseTransaction, table_name: &str)
    -> anyhow::Result<i64>;

    /// Bump the version of the named table by one and return the new value.
    ///
    /// Fails with `ShipyardError::NotFound` when the table has no version record
    /// and with `ShipyardError::Concurrency` when the database cannot serialize
    /// the update against a concurrent writer.
    async fn increment_version(
        &self,
        txn: &DatabaseTransaction,
        table_name: &str,
    ) -> anyhow::Result<i64>;
}
