//! Shipping service: the write and read coordinators
//!
//! Pairs every entry insertion with a version bump inside one transaction,
//! and reads the version together with the entries from one snapshot.

use std::sync::Arc;

use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbBackend,
    IsolationLevel, TransactionTrait,
};
use shipyard_common::{SHIPPING_TABLE, ShipyardError};
use tracing::{instrument, warn};

use crate::model::{CreatedEntry, NewShippingEntry, ShippingSnapshot};
use crate::sql::{SqlShippingRepository, SqlVersionStore, classify_db_err};
use crate::traits::{ShippingRepository, VersionStore};

/// Attempts of one write before a serialization conflict is surfaced
pub const MAX_WRITE_ATTEMPTS: usize = 2;

/// Coordinates the version store and the shipping repository over one pool
pub struct ShippingService {
    db: DatabaseConnection,
    versions: Arc<dyn VersionStore>,
    entries: Arc<dyn ShippingRepository>,
}

impl std::fmt::Debug for ShippingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShippingService")
            .field("backend", &self.db.get_database_backend())
            .field("versions", &"<dyn VersionStore>")
            .field("entries", &"<dyn ShippingRepository>")
            .finish()
    }
}

impl ShippingService {
    /// Create a service using the SQL store and repository
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_components(
            db,
            Arc::new(SqlVersionStore),
            Arc::new(SqlShippingRepository),
        )
    }

    pub fn with_components(
        db: DatabaseConnection,
        versions: Arc<dyn VersionStore>,
        entries: Arc<dyn ShippingRepository>,
    ) -> Self {
        Self {
            db,
            versions,
            entries,
        }
    }

    /// Get a reference to the underlying database connection
    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// Current version and all entries, read from one snapshot.
    ///
    /// When `since` equals the current version the entry list is left empty,
    /// since the caller already holds that generation.
    #[instrument(skip(self))]
    pub async fn snapshot(&self, since: Option<i64>) -> anyhow::Result<ShippingSnapshot> {
        let txn = self
            .begin(Some(IsolationLevel::RepeatableRead), Some(AccessMode::ReadOnly))
            .await?;

        let result: anyhow::Result<ShippingSnapshot> = async {
            let version = self.versions.current_version(&txn, SHIPPING_TABLE).await?;
            let entries = if since == Some(version) {
                Vec::new()
            } else {
                self.entries.list_all(&txn).await?
            };
            Ok(ShippingSnapshot { version, entries })
        }
        .await;

        finish(txn, result).await
    }

    /// Insert an entry and bump the shipping version as one unit of work.
    ///
    /// A serialization conflict retries the whole transaction once.
    #[instrument(skip(self, new_entry), fields(entry_type = %new_entry.kind))]
    pub async fn create_entry(&self, new_entry: NewShippingEntry) -> anyhow::Result<CreatedEntry> {
        let mut attempt = 1;
        loop {
            match self.try_create_entry(&new_entry).await {
                Err(err) if attempt < MAX_WRITE_ATTEMPTS && is_retryable(&err) => {
                    warn!(attempt, error = %err, "Write conflicted, retrying transaction");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn try_create_entry(&self, new_entry: &NewShippingEntry) -> anyhow::Result<CreatedEntry> {
        let txn = self.begin(None, None).await?;

        let result: anyhow::Result<CreatedEntry> = async {
            let entry = self.entries.create(&txn, new_entry).await?;
            let version = self
                .versions
                .increment_version(&txn, SHIPPING_TABLE)
                .await?;
            Ok(CreatedEntry { version, entry })
        }
        .await;

        finish(txn, result).await
    }

    /// Health check for the database pool
    pub async fn health_check(&self) -> anyhow::Result<()> {
        self.db.ping().await.map_err(classify_db_err)
    }

    /// Close the connection pool
    pub async fn close(&self) -> anyhow::Result<()> {
        self.db.clone().close().await.map_err(classify_db_err)
    }

    async fn begin(
        &self,
        isolation: Option<IsolationLevel>,
        access_mode: Option<AccessMode>,
    ) -> anyhow::Result<DatabaseTransaction> {
        // SQLite transactions are serializable and snapshot-consistent already
        let (isolation, access_mode) = match self.db.get_database_backend() {
            DbBackend::Sqlite => (None, None),
            _ => (isolation, access_mode),
        };

        self.db
            .begin_with_config(isolation, access_mode)
            .await
            .map_err(classify_db_err)
    }
}

fn is_retryable(err: &anyhow::Error) -> bool {
    ShipyardError::find_in(err).is_some_and(ShipyardError::is_retryable)
}

/// Commit on success; roll back before surfacing any failure.
async fn finish<T>(txn: DatabaseTransaction, result: anyhow::Result<T>) -> anyhow::Result<T> {
    match result {
        Ok(value) => {
            txn.commit().await.map_err(classify_db_err)?;
            Ok(value)
        }
        Err(err) => {
            if let Err(rollback_err) = txn.rollback().await {
                warn!(error = %rollback_err, "Failed to roll back transaction");
            }
            Err(err)
        }
    }
}
