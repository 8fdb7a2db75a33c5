//! Application startup: logging and the HTTP server.

mod http;
mod logging;

pub use http::{build_app, main_server};
pub use logging::{LogRotation, LoggingConfig, LoggingGuard, init_logging};
