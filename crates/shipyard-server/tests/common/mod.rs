//! Shared helpers for the HTTP integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{
    dev::{Service, ServiceResponse},
    test,
};
use config::Config;
use serde_json::{Value, json};
use shipyard_persistence::sea_orm::{ConnectOptions, Database, DatabaseConnection};
use shipyard_persistence::{ShippingRepository, ShippingService, VersionStore, init_schema};
use shipyard_server::model::{AUTH_TOKEN_SECRET, AUTHORIZATION_HEADER, AppState, Configuration};

pub const TEST_SECRET: &str = "test-secret-key";

/// One pinned connection, since every new in-memory SQLite connection is a fresh database
pub async fn memory_db() -> DatabaseConnection {
    let mut opt = ConnectOptions::new("sqlite::memory:");
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.expect("connect to in-memory sqlite");
    init_schema(&db).await.expect("initialize schema");
    db
}

pub fn test_configuration() -> Configuration {
    let config = Config::builder()
        .set_override(AUTH_TOKEN_SECRET, TEST_SECRET)
        .and_then(|builder| builder.build())
        .expect("build test configuration");
    Configuration::from_config(config)
}

pub fn app_state(service: ShippingService) -> Arc<AppState> {
    Arc::new(AppState::new(test_configuration(), Arc::new(service)).expect("build app state"))
}

pub async fn default_state() -> Arc<AppState> {
    app_state(ShippingService::new(memory_db().await))
}

pub async fn state_with_versions(versions: Arc<dyn VersionStore>) -> Arc<AppState> {
    app_state(ShippingService::with_components(
        memory_db().await,
        versions,
        Arc::new(shipyard_persistence::SqlShippingRepository) as Arc<dyn ShippingRepository>,
    ))
}

pub fn auth_header() -> (&'static str, String) {
    (AUTHORIZATION_HEADER, format!("Token {}", TEST_SECRET))
}

pub fn bill_of_lading() -> Value {
    json!({
        "type": "bill-of-lading",
        "title": "Bill of Lading",
        "position": 1,
        "image": "https://example.com/bol.png"
    })
}

pub fn entry(kind: &str, position: i64) -> Value {
    json!({
        "type": kind,
        "title": format!("{} document", kind),
        "position": position,
        "image": format!("https://example.com/{}.png", kind)
    })
}

/// Authenticated `GET /`, returning the decoded body.
pub async fn fetch_snapshot<S, B>(app: &S) -> Value
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(auth_header())
        .to_request();
    let resp = test::call_service(app, req).await;
    assert!(resp.status().is_success(), "GET / failed: {}", resp.status());
    test::read_body_json(resp).await
}

/// Authenticated `POST /`, returning the status and decoded body.
pub async fn post_entry<S, B>(app: &S, body: &Value) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: actix_web::body::MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/")
        .insert_header(auth_header())
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    (status, test::read_body_json(resp).await)
}
