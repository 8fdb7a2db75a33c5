// Shipyard - a version-tracked shipping list service over HTTP
// Every write bumps a single version watermark in the same transaction as the insert

// Module declarations
pub mod api; // API handlers, request models and route wiring
pub mod error; // HTTP error mapping
pub mod middleware; // HTTP middleware
pub mod model; // Configuration, application state and response envelope
pub mod startup; // Logging and HTTP server setup

pub use error::AppError;
pub use model::{AppState, Configuration};
