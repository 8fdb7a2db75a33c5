//! Domain model types for the persistence layer
//!
//! These types are returned from the repository traits and serialized
//! directly into API responses, decoupled from the SeaORM entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shipyard_common::{FieldViolation, ShipyardError};
use validator::{Validate, ValidationErrors};

use crate::entity::shipping_entry;

pub const TITLE_MAX_LEN: usize = 255;

/// A persisted shipping entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingEntry {
    pub id: i32,
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub position: i32,
    pub image: String,
    pub created_at: DateTime<Utc>,
}

impl From<shipping_entry::Model> for ShippingEntry {
    fn from(model: shipping_entry::Model) -> Self {
        Self {
            id: model.id,
            kind: model.r#type,
            title: model.title,
            position: model.position,
            image: model.image,
            created_at: model.created_at,
        }
    }
}

/// Input for creating a shipping entry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct NewShippingEntry {
    #[serde(rename = "type")]
    #[validate(length(
        min = 1,
        max = 64,
        message = "must be between 1 and 64 characters"
    ))]
    pub kind: String,
    #[validate(length(
        min = 1,
        max = 255,
        message = "must be between 1 and 255 characters"
    ))]
    pub title: String,
    #[validate(range(min = 0, message = "must be a non-negative integer"))]
    pub position: i32,
    #[validate(
        url(message = "must be a well-formed URI"),
        length(max = 2048, message = "must be at most 2048 characters")
    )]
    pub image: String,
}

impl NewShippingEntry {
    pub fn new(
        kind: impl Into<String>,
        title: impl Into<String>,
        position: i32,
        image: impl Into<String>,
    ) -> Self {
        Self {
            kind: kind.into(),
            title: title.into(),
            position,
            image: image.into(),
        }
    }

    /// Run all field checks, naming every offending field on failure.
    pub fn check(&self) -> Result<(), ShipyardError> {
        self.validate()
            .map_err(|errors| ShipyardError::validation(violations(&errors)))
    }
}

/// Flatten `validator` errors into field violations using the wire field names.
pub fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = wire_field_name(&field.to_string());
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldViolation::new(field.clone(), message)
            })
        })
        .collect()
}

fn wire_field_name(field: &str) -> String {
    match field.trim_start_matches("r#") {
        "kind" => "type".to_string(),
        other => other.to_string(),
    }
}

/// Version watermark together with the entries visible at that version
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingSnapshot {
    pub version: i64,
    #[serde(rename = "shippingList")]
    pub entries: Vec<ShippingEntry>,
}

/// Result of a committed write
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedEntry {
    pub version: i64,
    pub entry: ShippingEntry,
}
