//! Common test utilities

#![allow(dead_code)]

use std::str::FromStr;
use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower::util::ServiceExt;

use simple_banking::api::{self, AppState};
use simple_banking::db;
use simple_banking::idempotency::{IdempotencyConfig, IdempotencyStore};

/// Setup test database - fresh in-memory SQLite with migrations and seeds
pub async fn setup_test_db() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Invalid SQLite URL")
        .foreign_keys(true);

    // One connection that never recycles, so the in-memory database lives as long as the pool
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open in-memory DB");

    db::prepare(&pool).await.expect("Failed to prepare DB");

    pool
}

/// Full application over a fresh database
pub async fn test_app() -> (Router, AppState) {
    test_app_with(IdempotencyConfig::default()).await
}

pub async fn test_app_with(config: IdempotencyConfig) -> (Router, AppState) {
    let pool = setup_test_db().await;
    let state = AppState::new(pool, IdempotencyStore::new(config));
    let app = api::create_app(state.clone(), Duration::from_secs(30));
    (app, state)
}

/// Build a JSON request
pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a JSON POST carrying an idempotency key
pub fn keyed_post(uri: &str, key: &str, body: Value) -> Request<Body> {
    let mut request = json_request("POST", uri, body);
    request
        .headers_mut()
        .insert("Idempotency-Key", key.parse().unwrap());
    request
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send a request and collect status plus raw body
pub async fn send_raw(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

/// Send a request and parse the JSON response body
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let (status, body) = send_raw(app, request).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

/// Create an account and return its id
pub async fn create_account(app: &Router, document_number: &str) -> i64 {
    let (status, json) = send(
        app,
        json_request(
            "POST",
            "/accounts",
            serde_json::json!({ "document_number": document_number }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "account creation failed: {json}");
    json["account_id"].as_i64().unwrap()
}
