//! Sign-up, login and token resolution over HTTP.

mod common;

use axum::http::{Method, StatusCode};
use common::{TEST_SECRET, build_test_app, send, signup};
use serde_json::json;

#[tokio::test]
async fn signup_login_me_flow() {
    let app = build_test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "email": "a@x.com", "password": "secret123", "name": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "User created successfully");
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["name"], "A");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
    let signup_token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "secret123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Login successful");
    let login_token = body["token"].as_str().unwrap().to_string();
    assert_ne!(login_token, signup_token);

    let (status, body) = send(&app, Method::GET, "/api/auth/me", Some(&login_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "a@x.com");
    assert_eq!(body["user"]["name"], "A");
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let app = build_test_app();
    signup(&app, "dup@x.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "email": "dup@x.com", "password": "another1", "name": "Again" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Email already registered");
}

#[tokio::test]
async fn bad_credentials_do_not_reveal_which_part_failed() {
    let app = build_test_app();
    signup(&app, "a@x.com").await;

    let (wrong_pw_status, wrong_pw) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "a@x.com", "password": "nope-nope" })),
    )
    .await;
    let (unknown_status, unknown) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": "ghost@x.com", "password": "secret123" })),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw, unknown);
    assert_eq!(wrong_pw["message"], "Invalid email or password");
}

#[tokio::test]
async fn incomplete_login_is_a_credentials_failure() {
    let app = build_test_app();
    signup(&app, "a@x.com").await;

    for body in [
        json!({ "email": null, "password": "secret123" }),
        json!({ "email": "a@x.com", "password": null }),
        json!({ "password": "secret123" }),
        json!({}),
    ] {
        let (status, reply) = send(&app, Method::POST, "/api/auth/login", None, Some(body)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(reply["message"], "Invalid email or password");
    }
}

#[tokio::test]
async fn signup_validates_fields() {
    let app = build_test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/signup",
        None,
        Some(json!({ "email": "a@x.com", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("password"), "{message}");
    assert!(message.contains("name"), "{message}");
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let app = build_test_app();

    let (status, body) = send(&app, Method::GET, "/api/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].is_string());

    let (status, _) = send(&app, Method::GET, "/api/cameras", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_for_missing_identity_is_rejected() {
    let app = build_test_app();

    // Validly signed, but nobody with this id was ever registered.
    let token = darkroom_api::auth::create_token(
        TEST_SECRET,
        chrono::Duration::days(1),
        uuid::Uuid::new_v4(),
    )
    .unwrap();

    let (status, _) = send(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn health_needs_no_auth() {
    let app = build_test_app();
    let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
}
