//! Route configuration

use actix_web::web;

use crate::api::{health, shipping};
use crate::error::{json_error_handler, query_error_handler};

/// Register extractor configs and every endpoint.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .service(health::routes())
        .service(shipping::list_shipping)
        .service(shipping::create_shipping);
}
