//! Shipping list endpoints
//!
//! - GET /  - Current version with every shipping entry
//! - POST / - Create an entry and bump the version

use actix_web::{HttpResponse, get, post, web};
use serde_json::Value;
use tracing::info;

use crate::api::model::{SnapshotQuery, decode_entry};
use crate::error::AppError;
use crate::model::AppState;

/// GET /
///
/// Returns `{version, shippingList}` read from one snapshot. With
/// `?since=<version>` matching the current version the list is empty.
#[get("/")]
pub async fn list_shipping(
    data: web::Data<AppState>,
    params: web::Query<SnapshotQuery>,
) -> Result<HttpResponse, AppError> {
    let snapshot = data.shipping_service.snapshot(params.since).await?;

    Ok(HttpResponse::Ok().json(snapshot))
}

/// POST /
///
/// Inserts the entry and increments the version atomically. Returns 201 with
/// `{version, entry}`.
#[post("/")]
pub async fn create_shipping(
    data: web::Data<AppState>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let entry = decode_entry(body.into_inner())?;
    let created = data.shipping_service.create_entry(entry).await?;

    info!(
        id = created.entry.id,
        version = created.version,
        "Shipping entry created"
    );

    Ok(HttpResponse::Created().json(created))
}
