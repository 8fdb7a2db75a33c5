//! Error types and error codes for Shipyard
//!
//! This module defines:
//! - `ShipyardError`: Application-specific error enum
//! - `FieldViolation`: One failed input check, named by field
//! - `ErrorCode`: Structured error codes for API responses

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A single failed validation check on an input field
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl Display for FieldViolation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Application-specific error types
#[derive(thiserror::Error, Debug)]
pub enum ShipyardError {
    #[error("authentication error: {0}")]
    Authentication(String),

    /// Violations are kept sorted by field name; the first one is the headline.
    #[error("invalid field '{}'", headline_field(.0))]
    Validation(Vec<FieldViolation>),

    #[error("version record for table '{0}' not found")]
    NotFound(String),

    #[error("concurrent update conflict: {0}")]
    Concurrency(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("internal error: {0}")]
    Internal(String),
}

fn headline_field(violations: &[FieldViolation]) -> &str {
    violations
        .first()
        .map(|v| v.field.as_str())
        .unwrap_or("unknown")
}

impl ShipyardError {
    /// Build a validation error, ordering violations deterministically.
    pub fn validation(mut violations: Vec<FieldViolation>) -> Self {
        violations.sort();
        violations.dedup();
        ShipyardError::Validation(violations)
    }

    /// Whether the whole unit of work may be attempted again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ShipyardError::Concurrency(_))
    }

    /// Find a `ShipyardError` anywhere in an `anyhow` error chain.
    pub fn find_in(err: &anyhow::Error) -> Option<&ShipyardError> {
        err.chain().find_map(|cause| cause.downcast_ref::<ShipyardError>())
    }
}

/// Error code structure for API responses
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ErrorCode<'a> {
    pub code: i32,
    pub message: &'a str,
}

pub const SUCCESS: ErrorCode<'static> = ErrorCode {
    code: 0,
    message: "success",
};

pub const ACCESS_DENIED: ErrorCode<'static> = ErrorCode {
    code: 10001,
    message: "access denied",
};

pub const DATA_ACCESS_ERROR: ErrorCode<'static> = ErrorCode {
    code: 10002,
    message: "data access error",
};

pub const PARAMETER_VALIDATE_ERROR: ErrorCode<'static> = ErrorCode {
    code: 20002,
    message: "parameter validate error",
};

pub const RESOURCE_CONFLICT: ErrorCode<'static> = ErrorCode {
    code: 20005,
    message: "resource conflict",
};

pub const SERVER_ERROR: ErrorCode<'static> = ErrorCode {
    code: 30000,
    message: "server error",
};
