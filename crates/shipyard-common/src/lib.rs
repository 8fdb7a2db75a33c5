//! Shipyard Common - Shared types used across all Shipyard components
//!
//! This crate provides:
//! - Error taxonomy and error codes
//! - Field-level validation violations
//! - Name of the version-tracked shipping table

pub mod error;

// Re-exports for convenience
pub use error::{ErrorCode, FieldViolation, ShipyardError};

/// Name of the shipping entries table, also the key of its version record
pub const SHIPPING_TABLE: &str = "shipping";
