//! Persistence traits for the version-tracked shipping collection
//!
//! Every operation takes the enclosing `DatabaseTransaction`, so inserts and
//! version bumps can only be issued inside a unit of work that commits or
//! rolls back as a whole.

pub mod shipping;
pub mod version;

pub use shipping::ShippingRepository;
pub use version::VersionStore;
