//! SQL-based persistence backend (MySQL/PostgreSQL/SQLite via SeaORM)
//!
//! Stateless implementations of `VersionStore` and `ShippingRepository`.
//! All state lives in the database; every call runs on the caller's transaction.

use async_trait::async_trait;
use sea_orm::{prelude::Expr, *};
use shipyard_common::ShipyardError;

use crate::entity::{shipping_entry, version_record};
use crate::model::{NewShippingEntry, ShippingEntry};
use crate::traits::{ShippingRepository, VersionStore};

/// Lower-cased fragments of driver messages reporting a serialization failure,
/// a deadlock or lock contention on MySQL, PostgreSQL and SQLite.
const SERIALIZATION_FAILURE_MARKERS: &[&str] = &[
    "could not serialize access",
    "deadlock",
    "lock wait timeout",
    "database is locked",
    "database table is locked",
];

/// Convert a SeaORM error into the application error taxonomy.
pub fn classify_db_err(err: DbErr) -> anyhow::Error {
    let message = err.to_string();
    if is_serialization_failure(&message) {
        ShipyardError::Concurrency(message).into()
    } else {
        ShipyardError::Database(message).into()
    }
}

fn is_serialization_failure(message: &str) -> bool {
    let message = message.to_lowercase();
    SERIALIZATION_FAILURE_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
}

fn version_not_found(table_name: &str) -> anyhow::Error {
    ShipyardError::NotFound(table_name.to_string()).into()
}

// ============================================================================
// VersionStore implementation
// ============================================================================

/// Version store backed by the `sversion` table
#[derive(Clone, Copy, Debug, Default)]
pub struct SqlVersionStore;

#[async_trait]
impl VersionStore for SqlVersionStore {
    async fn current_version(
        &self,
        txn: &DatabaseTransaction,
        table_name: &str,
    ) -> anyhow::Result<i64> {
        version_record::Entity::find_by_id(table_name.to_string())
            .one(txn)
            .await
            .map_err(classify_db_err)?
            .map(|record| record.version)
            .ok_or_else(|| version_not_found(table_name))
    }

    async fn increment_version(
        &self,
        txn: &DatabaseTransaction,
        table_name: &str,
    ) -> anyhow::Result<i64> {
        // Single UPDATE so the row lock is taken before the new value is read.
        let result = version_record::Entity::update_many()
            .col_expr(
                version_record::Column::Version,
                Expr::col(version_record::Column::Version).add(1),
            )
            .filter(version_record::Column::TableName.eq(table_name))
            .exec(txn)
            .await
            .map_err(classify_db_err)?;

        if result.rows_affected == 0 {
            return Err(version_not_found(table_name));
        }

        self.current_version(txn, table_name).await
    }
}

// ============================================================================
// ShippingRepository implementation
// ============================================================================

/// Shipping repository backed by the `shipping` table
#[derive(Clone, Copy, Debug, Default)]
pub struct SqlShippingRepository;

#[async_trait]
impl ShippingRepository for SqlShippingRepository {
    async fn list_all(&self, txn: &DatabaseTransaction) -> anyhow::Result<Vec<ShippingEntry>> {
        let models = shipping_entry::Entity::find()
            .order_by_asc(shipping_entry::Column::Position)
            .order_by_asc(shipping_entry::Column::Id)
            .all(txn)
            .await
            .map_err(classify_db_err)?;

        Ok(models.into_iter().map(ShippingEntry::from).collect())
    }

    async fn create(
        &self,
        txn: &DatabaseTransaction,
        new_entry: &NewShippingEntry,
    ) -> anyhow::Result<ShippingEntry> {
        new_entry.check()?;

        let entity = shipping_entry::ActiveModel {
            r#type: Set(new_entry.kind.clone()),
            title: Set(new_entry.title.clone()),
            position: Set(new_entry.position),
            image: Set(new_entry.image.clone()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        };

        let model = entity.insert(txn).await.map_err(classify_db_err)?;

        Ok(model.into())
    }
}
