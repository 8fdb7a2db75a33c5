//! Health API handlers
//!
//! - GET /health/liveness  - Check if the server is alive
//! - GET /health/readiness - Check if the database is reachable

use actix_web::{Responder, Scope, get, web};
use shipyard_common::error::SERVER_ERROR;

use crate::model::{AppState, response::Result};

/// GET /health/liveness
#[get("liveness")]
pub async fn liveness() -> impl Responder {
    Result::<String>::http_success("UP".to_string())
}

/// GET /health/readiness
///
/// Returns 200 when the database answers a ping, 503 otherwise.
#[get("readiness")]
pub async fn readiness(data: web::Data<AppState>) -> impl Responder {
    match data.shipping_service.health_check().await {
        Ok(()) => Result::<String>::http_success("UP".to_string()),
        Err(err) => {
            tracing::warn!(error = %err, "Readiness check failed");
            Result::<String>::http_response(
                503,
                SERVER_ERROR.code,
                "database unavailable".to_string(),
                "DOWN".to_string(),
            )
        }
    }
}

pub fn routes() -> Scope {
    web::scope("/health").service(liveness).service(readiness)
}
