//! Main entry point for the Shipyard server.
//!
//! Loads configuration, prepares the database and serves the HTTP API until
//! a shutdown signal arrives.

use std::sync::Arc;

use shipyard_persistence::{ShippingService, init_schema};
use shipyard_server::{
    model::{AppState, Configuration},
    startup,
};
use tracing::{error, info};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new()?;
    // Refuse to start without a secret before touching the database
    configuration.token_secret()?;

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    let database_connection = configuration.database_connection().await?;

    if let Err(e) = init_schema(&database_connection).await {
        error!(error = %e, "Failed to initialize database schema");
        return Err(e.into());
    }

    let shipping_service = Arc::new(ShippingService::new(database_connection));
    let app_state = Arc::new(AppState::new(configuration, shipping_service.clone())?);

    // actix-web stops accepting on SIGINT/SIGTERM and drains within shutdown_timeout
    let server = startup::main_server(app_state)?;
    let result = server.await;

    info!("HTTP server stopped, closing database pool");
    if let Err(e) = shipping_service.close().await {
        error!(error = %e, "Failed to close database pool");
    }

    result?;
    Ok(())
}
