#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use darkroom_api::auth::AppStateInner;
use darkroom_api::routes;
use darkroom_db::Database;

pub const TEST_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

/// The real router over a fresh in-memory store.
pub fn build_test_app() -> Router {
    let state = Arc::new(AppStateInner {
        db: Database::open_in_memory().expect("in-memory store should open"),
        jwt_secret: TEST_SECRET.to_string(),
        token_ttl: chrono::Duration::days(7),
    });
    routes::router(state)
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };
    (status, json)
}

pub async fn get(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put(app: &Router, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete(app: &Router, uri: &str, token: &str) -> (StatusCode, Value) {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Register an identity and return its session token.
pub async fn signup(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "email": email, "password": "secret123", "name": "Tester" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
    body["token"].as_str().expect("token").to_string()
}

pub async fn create_stock(app: &Router, token: &str) -> String {
    let (status, body) = post(
        app,
        "/api/film-stocks",
        token,
        json!({ "make": "Kodak", "name": "Portra 400", "iso": 400, "format": "35mm", "type": "color" }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "stock create failed: {body}");
    id_of(&body)
}

pub fn id_of(record: &Value) -> String {
    record["_id"].as_str().expect("record _id").to_string()
}
