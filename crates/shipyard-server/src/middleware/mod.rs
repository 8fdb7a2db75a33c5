// HTTP middleware implementations

pub mod auth; // Shared-secret token authentication
