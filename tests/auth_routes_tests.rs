// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authentication route and CORS tests.
//!
//! These tests verify that:
//! 1. Sign-up/sign-in resolve the role and issue a usable session token
//! 2. Rejections, duplicate accounts and invalid input surface as 401/409/400
//! 3. Protected routes reject missing or invalid tokens
//! 4. CORS preflight requests return correct headers

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

mod common;
use common::{create_test_app, send};

#[tokio::test]
async fn test_signup_first_user_becomes_admin() {
    let (app, _) = create_test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "email": " owner@fleet.io ", "password": "secret1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["uid"], "uid-owner");
    assert_eq!(body["email"], "owner@fleet.io");
    assert_eq!(body["role"], "admin");
    assert_eq!(body["status"], "active");
    assert_eq!(body["decision"]["action"], "redirect_to_home");
    assert_eq!(body["decision"]["target"], "/(user)/driver");

    // Issued token works on protected routes
    let token = body["token"].as_str().unwrap().to_string();
    let (status, session) = send(&app, Method::GET, "/api/session", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["role"], "admin");
}

#[tokio::test]
async fn test_signin_after_signup_keeps_role() {
    let (app, _) = create_test_app();
    let creds = |email: &str| json!({ "email": email, "password": "secret1" });

    send(&app, Method::POST, "/auth/signup", None, Some(creds("a@x.com"))).await;
    send(&app, Method::POST, "/auth/signup", None, Some(creds("b@x.com"))).await;

    let (status, body) = send(&app, Method::POST, "/auth/signin", None, Some(creds("b@x.com"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "driver");
    assert_eq!(body["status"], "pending");

    let (_, body) = send(&app, Method::POST, "/auth/signin", None, Some(creds("a@x.com"))).await;
    assert_eq!(body["role"], "admin");
}

#[tokio::test]
async fn test_signin_sets_session_cookie() {
    let (app, _) = create_test_app();
    send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "email": "a@x.com", "password": "secret1" })),
    )
    .await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signin")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({ "email": "a@x.com", "password": "secret1" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("greenroute_token="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_cookie_authenticates_protected_route() {
    let (app, _) = create_test_app();
    let token = common::token_for("d1", Some("d1@x.com"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/session")
                .header(header::COOKIE, format!("greenroute_token={}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_is_auth_failed() {
    let (app, _) = create_test_app();
    send(
        &app,
        Method::POST,
        "/auth/signup",
        None,
        Some(json!({ "email": "a@x.com", "password": "secret1" })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/signin",
        None,
        Some(json!({ "email": "a@x.com", "password": "wrong-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "auth_failed");
    assert_eq!(body["details"], "invalid credential");
}

#[tokio::test]
async fn test_duplicate_signup_is_rejected() {
    let (app, _) = create_test_app();
    let creds = json!({ "email": "a@x.com", "password": "secret1" });

    send(&app, Method::POST, "/auth/signup", None, Some(creds.clone())).await;
    let (status, body) = send(&app, Method::POST, "/auth/signup", None, Some(creds)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");
    assert_eq!(body["details"], "email already in use");
}

#[tokio::test]
async fn test_invalid_credentials_input_is_bad_request() {
    let (app, state) = create_test_app();

    for creds in [
        json!({ "email": "not-an-email", "password": "secret1" }),
        json!({ "email": "a@x.com", "password": "  123  " }),
    ] {
        let (status, body) = send(&app, Method::POST, "/auth/signup", None, Some(creds)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    assert!(state.store.list_profiles().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header(header::COOKIE, "greenroute_token=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("greenroute_token="));
    assert!(cookie.contains("Max-Age=0"));
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let (app, _) = create_test_app();
    let (status, _) = send(&app, Method::GET, "/api/trip", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_route_with_invalid_token() {
    let (app, _) = create_test_app();
    let (status, _) = send(&app, Method::GET, "/api/admin/users", Some("invalid.token.here"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cors_preflight() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/api/trip")
                .header(header::ORIGIN, "http://localhost:8081")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    // OPTIONS should return 200 (CORS preflight success)
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
    assert!(response
        .headers()
        .contains_key(header::ACCESS_CONTROL_ALLOW_METHODS));
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _) = create_test_app();

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
}
