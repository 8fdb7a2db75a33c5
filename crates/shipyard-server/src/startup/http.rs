//! HTTP server setup.

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    App, Error, HttpServer,
    body::MessageBody,
    dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{Condition, Logger},
    web,
};

use crate::{api::route, middleware::auth::TokenAuthentication, model::AppState};

/// Build the application: routes, token authentication, request logging and CORS.
///
/// CORS wraps everything so pre-flight requests and 401 responses both carry
/// the CORS headers.
pub fn build_app(
    app_state: Arc<AppState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    let cors_enabled = app_state.configuration.cors_enabled();

    App::new()
        .app_data(web::Data::from(app_state))
        .configure(route::configure)
        .wrap(TokenAuthentication)
        .wrap(Logger::default())
        .wrap(Condition::new(cors_enabled, Cors::permissive()))
}

/// Creates and binds the main HTTP server.
pub fn main_server(app_state: Arc<AppState>) -> Result<Server, std::io::Error> {
    let configuration = &app_state.configuration;
    let address = configuration.server_address();
    let port = configuration.server_port();
    let workers = configuration.server_workers();
    let shutdown_timeout = configuration.server_shutdown_timeout();

    let state = app_state.clone();
    let mut server = HttpServer::new(move || build_app(state.clone()))
        .shutdown_timeout(shutdown_timeout);
    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    tracing::info!(address = %address, port, ?workers, "Starting HTTP server");

    Ok(server.bind((address, port))?.run())
}
