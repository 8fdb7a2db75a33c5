// HTTP tests for the shipping list endpoints
//
// Exercises the full application (routes, token authentication, CORS and the
// error mapping) against an in-memory SQLite database.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::{http::StatusCode, test};
use async_trait::async_trait;
use serde_json::Value;
use shipyard_common::ShipyardError;
use shipyard_persistence::entity::version_record;
use shipyard_persistence::sea_orm::{DatabaseTransaction, EntityTrait};
use shipyard_persistence::{SqlVersionStore, VersionStore};
use shipyard_server::startup::build_app;

use common::*;

/// Version store whose increments always report a serialization conflict
#[derive(Default)]
struct ConflictingVersionStore {
    increments: AtomicUsize,
}

#[async_trait]
impl VersionStore for ConflictingVersionStore {
    async fn current_version(
        &self,
        txn: &DatabaseTransaction,
        table_name: &str,
    ) -> anyhow::Result<i64> {
        SqlVersionStore.current_version(txn, table_name).await
    }

    async fn increment_version(
        &self,
        _txn: &DatabaseTransaction,
        _table_name: &str,
    ) -> anyhow::Result<i64> {
        self.increments.fetch_add(1, Ordering::SeqCst);
        Err(ShipyardError::Concurrency("could not serialize access".to_string()).into())
    }
}

#[actix_web::test]
async fn test_initial_snapshot_is_empty() {
    let app = test::init_service(build_app(default_state().await)).await;

    let snapshot = fetch_snapshot(&app).await;
    assert_eq!(snapshot["version"], 0);
    assert_eq!(snapshot["shippingList"], serde_json::json!([]));
}

#[actix_web::test]
async fn test_create_bill_of_lading_round_trip() {
    let app = test::init_service(build_app(default_state().await)).await;

    let (status, body) = post_entry(&app, &bill_of_lading()).await;
    assert_eq!(status, 201);
    assert_eq!(body["version"], 1);
    assert_eq!(body["entry"]["type"], "bill-of-lading");
    assert_eq!(body["entry"]["title"], "Bill of Lading");
    assert_eq!(body["entry"]["position"], 1);
    assert_eq!(body["entry"]["image"], "https://example.com/bol.png");
    assert!(body["entry"]["id"].is_number());
    assert!(body["entry"]["createdAt"].is_string());

    let snapshot = fetch_snapshot(&app).await;
    assert_eq!(snapshot["version"], 1);
    assert_eq!(snapshot["shippingList"].as_array().unwrap().len(), 1);
    assert_eq!(snapshot["shippingList"][0], body["entry"]);
}

#[actix_web::test]
async fn test_each_post_bumps_version_once() {
    let app = test::init_service(build_app(default_state().await)).await;

    let mut versions = Vec::new();
    for (i, kind) in ["invoice", "packing-list", "manifest", "certificate"]
        .iter()
        .enumerate()
    {
        let (status, body) = post_entry(&app, &entry(kind, i as i64)).await;
        assert_eq!(status, 201);
        versions.push(body["version"].as_i64().unwrap());
    }
    assert_eq!(versions, vec![1, 2, 3, 4]);

    let snapshot = fetch_snapshot(&app).await;
    assert_eq!(snapshot["version"], 4);
    assert_eq!(snapshot["shippingList"].as_array().unwrap().len(), 4);
}

#[actix_web::test]
async fn test_list_is_ordered_by_position() {
    let app = test::init_service(build_app(default_state().await)).await;

    post_entry(&app, &entry("third", 7)).await;
    post_entry(&app, &entry("first", 0)).await;
    post_entry(&app, &entry("second", 3)).await;

    let snapshot = fetch_snapshot(&app).await;
    let kinds: Vec<&str> = snapshot["shippingList"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["first", "second", "third"]);
}

#[actix_web::test]
async fn test_reads_without_writes_are_identical() {
    let app = test::init_service(build_app(default_state().await)).await;
    post_entry(&app, &bill_of_lading()).await;

    let first = fetch_snapshot(&app).await;
    let second = fetch_snapshot(&app).await;
    assert_eq!(first, second);
}

#[actix_web::test]
async fn test_since_current_version_returns_empty_list() {
    let app = test::init_service(build_app(default_state().await)).await;
    post_entry(&app, &bill_of_lading()).await;

    let req = test::TestRequest::get()
        .uri("/?since=1")
        .insert_header(auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["version"], 1);
    assert_eq!(body["shippingList"], serde_json::json!([]));

    let req = test::TestRequest::get()
        .uri("/?since=0")
        .insert_header(auth_header())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["shippingList"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_malformed_since_is_unprocessable() {
    let app = test::init_service(build_app(default_state().await)).await;

    let req = test::TestRequest::get()
        .uri("/?since=latest")
        .insert_header(auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["field"], "since");
}

#[actix_web::test]
async fn test_negative_position_is_rejected_without_write() {
    let app = test::init_service(build_app(default_state().await)).await;

    let mut body = bill_of_lading();
    body["position"] = serde_json::json!(-1);
    let (status, error) = post_entry(&app, &body).await;

    assert_eq!(status, 422);
    assert_eq!(error["code"], 20002);
    assert_eq!(error["message"], "invalid field 'position'");
    assert_eq!(error["data"][0]["field"], "position");

    let snapshot = fetch_snapshot(&app).await;
    assert_eq!(snapshot["version"], 0);
    assert_eq!(snapshot["shippingList"], serde_json::json!([]));
}

#[actix_web::test]
async fn test_every_invalid_field_is_named() {
    let app = test::init_service(build_app(default_state().await)).await;

    let body = serde_json::json!({
        "type": "",
        "title": "Manifest",
        "position": 2,
        "image": "not a uri"
    });
    let (status, error) = post_entry(&app, &body).await;

    assert_eq!(status, 422);
    let fields: Vec<&str> = error["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["image", "type"]);
}

#[actix_web::test]
async fn test_missing_field_is_unprocessable() {
    let app = test::init_service(build_app(default_state().await)).await;

    let body = serde_json::json!({
        "type": "invoice",
        "position": 2,
        "image": "https://example.com/i.png"
    });
    let (status, error) = post_entry(&app, &body).await;

    assert_eq!(status, 422);
    assert_eq!(error["data"][0]["field"], "title");
    assert_eq!(fetch_snapshot(&app).await["version"], 0);
}

#[actix_web::test]
async fn test_mistyped_body_is_unprocessable() {
    let app = test::init_service(build_app(default_state().await)).await;

    let mut body = bill_of_lading();
    body["position"] = serde_json::json!("first");
    let (status, error) = post_entry(&app, &body).await;

    assert_eq!(status, 422);
    assert_eq!(error["message"], "invalid field 'position'");
    assert_eq!(error["data"][0]["field"], "position");
    assert_eq!(fetch_snapshot(&app).await["version"], 0);
}

#[actix_web::test]
async fn test_non_json_body_is_unprocessable() {
    let app = test::init_service(build_app(default_state().await)).await;

    let req = test::TestRequest::post()
        .uri("/")
        .insert_header(auth_header())
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"type\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"][0]["field"], "body");
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let app = test::init_service(build_app(default_state().await)).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 10001);
}

#[actix_web::test]
async fn test_wrong_token_or_scheme_is_unauthorized() {
    let app = test::init_service(build_app(default_state().await)).await;

    for header in [
        "Token wrong-secret".to_string(),
        format!("Bearer {}", TEST_SECRET),
        format!("Token {}x", TEST_SECRET),
        format!("Token {}", &TEST_SECRET[..TEST_SECRET.len() - 4]),
        TEST_SECRET.to_string(),
    ] {
        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("Authorization", header.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "header: {header}");
    }
}

#[actix_web::test]
async fn test_token_scheme_is_case_insensitive() {
    let app = test::init_service(build_app(default_state().await)).await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("Authorization", format!("token {}", TEST_SECRET)))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_unauthorized_post_writes_nothing() {
    let app = test::init_service(build_app(default_state().await)).await;

    let req = test::TestRequest::post()
        .uri("/")
        .insert_header(("Authorization", "Token nope"))
        .set_json(bill_of_lading())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let snapshot = fetch_snapshot(&app).await;
    assert_eq!(snapshot["version"], 0);
    assert_eq!(snapshot["shippingList"], serde_json::json!([]));
}

#[actix_web::test]
async fn test_repeated_conflict_is_reported_and_rolled_back() {
    let versions = Arc::new(ConflictingVersionStore::default());
    let app = test::init_service(build_app(state_with_versions(versions.clone()).await)).await;

    let (status, error) = post_entry(&app, &bill_of_lading()).await;
    assert_eq!(status, 409);
    assert_eq!(error["code"], 20005);
    assert_eq!(versions.increments.load(Ordering::SeqCst), 2);

    let snapshot = fetch_snapshot(&app).await;
    assert_eq!(snapshot["version"], 0);
    assert_eq!(snapshot["shippingList"], serde_json::json!([]));
}

#[actix_web::test]
async fn test_missing_version_record_is_server_error() {
    let state = default_state().await;
    version_record::Entity::delete_many()
        .exec(state.shipping_service.db())
        .await
        .unwrap();
    let app = test::init_service(build_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(auth_header())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 30000);
    assert_eq!(body["message"], "server error");

    let (status, _) = post_entry(&app, &bill_of_lading()).await;
    assert_eq!(status, 500);
}

#[actix_web::test]
async fn test_health_endpoints_skip_authentication() {
    let app = test::init_service(build_app(default_state().await)).await;

    for uri in ["/health/liveness", "/health/readiness"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["data"], "UP");
    }
}

#[actix_web::test]
async fn test_readiness_reports_closed_pool() {
    let state = default_state().await;
    state.shipping_service.close().await.unwrap();
    let app = test::init_service(build_app(state)).await;

    let req = test::TestRequest::get()
        .uri("/health/readiness")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_cors_preflight_and_rejections_carry_headers() {
    let app = test::init_service(build_app(default_state().await)).await;

    let req = test::TestRequest::default()
        .method(actix_web::http::Method::OPTIONS)
        .uri("/")
        .insert_header(("Origin", "https://app.example.com"))
        .insert_header(("Access-Control-Request-Method", "POST"))
        .insert_header(("Access-Control-Request-Headers", "authorization, content-type"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());
    assert!(resp.headers().contains_key("access-control-allow-origin"));

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header(("Origin", "https://app.example.com"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert!(resp.headers().contains_key("access-control-allow-origin"));
}
