//! Application state management
//!
//! This module defines the central application state shared across all handlers.

use std::sync::Arc;

use config::ConfigError;
use shipyard_persistence::ShippingService;

use super::config::Configuration;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub configuration: Configuration,
    /// Secret every request must present as `Authorization: Token <secret>`
    pub token_secret: String,
    pub shipping_service: Arc<ShippingService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("configuration", &"<Configuration>")
            .field("token_secret", &"<redacted>")
            .field("shipping_service", &self.shipping_service)
            .finish()
    }
}

impl AppState {
    pub fn new(
        configuration: Configuration,
        shipping_service: Arc<ShippingService>,
    ) -> Result<Self, ConfigError> {
        let token_secret = configuration.token_secret()?;
        Ok(Self {
            configuration,
            token_secret,
            shipping_service,
        })
    }
}
