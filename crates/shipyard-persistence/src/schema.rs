//! Idempotent schema initialization
//!
//! Creates the tables from the SeaORM entities when absent and seeds the
//! version record of every tracked table. Must complete before traffic is served.

use sea_orm::*;
use shipyard_common::SHIPPING_TABLE;
use tracing::{debug, info};

use crate::entity::{shipping_entry, version_record};

/// Version of a freshly seeded version record
pub const INITIAL_VERSION: i64 = 0;

/// Create missing tables and seed the shipping version record.
pub async fn init_schema(db: &DatabaseConnection) -> anyhow::Result<()> {
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut shipping = schema.create_table_from_entity(shipping_entry::Entity);
    db.execute(backend.build(shipping.if_not_exists())).await?;

    let mut versions = schema.create_table_from_entity(version_record::Entity);
    db.execute(backend.build(versions.if_not_exists())).await?;

    seed_version(db, SHIPPING_TABLE).await?;

    info!(backend = ?backend, "Database schema initialized");
    Ok(())
}

/// Insert the version record of `table_name` unless one already exists.
pub async fn seed_version(db: &DatabaseConnection, table_name: &str) -> anyhow::Result<()> {
    let existing = version_record::Entity::find_by_id(table_name.to_string())
        .one(db)
        .await?;
    if existing.is_some() {
        debug!(table_name, "Version record already present");
        return Ok(());
    }

    insert_seed(db, table_name).await
}

/// Insert the initial version record; a row written by a concurrent seeder wins.
async fn insert_seed(db: &DatabaseConnection, table_name: &str) -> anyhow::Result<()> {
    let record = version_record::ActiveModel {
        table_name: Set(table_name.to_string()),
        version: Set(INITIAL_VERSION),
    };

    match version_record::Entity::insert(record)
        .exec_without_returning(db)
        .await
    {
        Ok(_) => {
            info!(table_name, version = INITIAL_VERSION, "Seeded version record");
            Ok(())
        }
        Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
            debug!(table_name, "Version record seeded concurrently");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
