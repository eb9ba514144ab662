//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use estate_cache::{
    api::{create_router, AppState},
    CacheStore,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app() -> (Router, Arc<CacheStore<Value>>) {
    let cache = Arc::new(CacheStore::new(100, Duration::from_secs(300)));
    (create_router(AppState::new(Arc::clone(&cache))), cache)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    (status, body_to_json(response.into_body()).await)
}

// == SET / GET ==

#[tokio::test]
async fn test_set_then_get_roundtrip() {
    let (app, _) = create_test_app();
    let listing = json!({"id": "A-17", "price": 415000, "beds": 3});

    let (status, json) = send(&app, "PUT", "/set", Some(json!({"key": "prop_A-17", "value": listing}))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("prop_A-17"));

    let (status, json) = send(&app, "GET", "/get/prop_A-17", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["value"], listing);
}

#[tokio::test]
async fn test_get_missing_key_returns_404_with_error_body() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/get/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Key not found: nope");
}

#[tokio::test]
async fn test_set_rejects_empty_key() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, "PUT", "/set", Some(json!({"key": "", "value": 1}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_set_with_short_ttl_expires() {
    let (app, _) = create_test_app();

    send(&app, "PUT", "/set", Some(json!({"key": "p1", "value": 42, "ttlMillis": 100}))).await;
    let (_, ttl) = send(&app, "GET", "/ttl/p1", None).await;
    assert_eq!(ttl["status"], "expires");
    assert!(ttl["ttlMillis"].as_i64().unwrap() > 0);
    assert!(ttl["ttlMillis"].as_i64().unwrap() <= 100);

    tokio::time::sleep(Duration::from_millis(150)).await;

    let (_, ttl) = send(&app, "GET", "/ttl/p1", None).await;
    assert_eq!(ttl["status"], "missing");
    assert_eq!(ttl["ttlMillis"], -2);

    let (status, _) = send(&app, "GET", "/get/p1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// == DELETE / CLEAR ==

#[tokio::test]
async fn test_delete_endpoint() {
    let (app, cache) = create_test_app();
    cache.set("doomed", json!(true));

    let (status, _) = send(&app, "DELETE", "/del/doomed", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!cache.has("doomed"));

    let (status, _) = send(&app, "DELETE", "/del/doomed", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_clear_keeps_statistics() {
    let (app, cache) = create_test_app();
    cache.set("a", json!(1));
    cache.set("b", json!(2));
    send(&app, "GET", "/get/a", None).await;
    send(&app, "GET", "/get/zzz", None).await;

    let (status, json) = send(&app, "DELETE", "/clear", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["removed"], 2);

    let (_, stats) = send(&app, "GET", "/stats", None).await;
    assert_eq!(stats["size"], 0);
    assert_eq!(stats["totalHits"], 1);
    assert_eq!(stats["totalMisses"], 1);
    assert_eq!(stats["hitRate"], 0.5);
}

// == KEYS / STATS / HEALTH ==

#[tokio::test]
async fn test_keys_endpoint_filters_by_pattern() {
    let (app, cache) = create_test_app();
    cache.set("prop_1", json!(1));
    cache.set("prop_2", json!(2));
    cache.set("mls_9", json!(3));

    let (status, json) = send(&app, "GET", "/keys?pattern=prop_*", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["keys"], json!(["prop_1", "prop_2"]));

    let (_, json) = send(&app, "GET", "/keys", None).await;
    assert_eq!(json["pattern"], "*");
    assert_eq!(json["keys"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_stats_on_fresh_store() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/stats", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["size"], 0);
    assert_eq!(json["maxSize"], 100);
    assert_eq!(json["hitRate"], 0.0);
    assert!(json["oldestItem"].is_null());
    assert!(json["newestItem"].is_null());
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
}
