//! Request models for the HTTP API

use serde::Deserialize;
use serde_json::Value;
use shipyard_common::{FieldViolation, ShipyardError};
use shipyard_persistence::NewShippingEntry;

/// Wire fields of `POST /` that must be JSON strings
const STRING_FIELDS: [&str; 3] = ["type", "title", "image"];

/// Query parameters of `GET /`
#[derive(Clone, Copy, Debug, Default, Deserialize)]
pub struct SnapshotQuery {
    /// Version the caller already holds; a match returns an empty list
    pub since: Option<i64>,
}

/// Decode a `POST /` body, naming every missing or mistyped field.
pub fn decode_entry(body: Value) -> Result<NewShippingEntry, ShipyardError> {
    let Some(object) = body.as_object() else {
        return Err(ShipyardError::validation(vec![FieldViolation::new(
            "body",
            "must be a JSON object",
        )]));
    };

    let mut violations = Vec::new();
    for field in STRING_FIELDS {
        match object.get(field) {
            None | Some(Value::Null) => {
                violations.push(FieldViolation::new(field, "is required"))
            }
            Some(Value::String(_)) => {}
            Some(_) => violations.push(FieldViolation::new(field, "must be a string")),
        }
    }
    match object.get("position") {
        None | Some(Value::Null) => {
            violations.push(FieldViolation::new("position", "is required"))
        }
        Some(value) if value.as_i64().is_some_and(|p| i32::try_from(p).is_ok()) => {}
        Some(_) => violations.push(FieldViolation::new(
            "position",
            "must be a 32-bit integer",
        )),
    }
    if !violations.is_empty() {
        return Err(ShipyardError::validation(violations));
    }

    serde_json::from_value(body)
        .map_err(|e| ShipyardError::validation(vec![FieldViolation::new("body", e.to_string())]))
}
