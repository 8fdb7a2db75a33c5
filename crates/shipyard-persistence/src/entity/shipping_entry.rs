//! Shipping entry entity
//!
//! Rows are inserted by the write path only and never updated or deleted.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "shipping")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Classification of the document, e.g. `bill-of-lading`
    pub r#type: String,
    pub title: String,
    /// Ordering hint among entries of the same type
    pub position: i32,
    #[sea_orm(column_type = "Text")]
    pub image: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
