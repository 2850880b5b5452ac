mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};

#[tokio::test]
async fn login_returns_a_usable_bearer_token() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["token_type"], "Bearer");

    let token = body["access_token"].as_str().unwrap().to_string();
    let (status, me) = app
        .request(Method::GET, "/api/v1/auth/me", None, Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], ADMIN_EMAIL);
    assert_eq!(me["role"], "Administrador");
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": "incorrecta" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "nadie@imprenta.test", "password": "loquesea" })),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_and_logout_flip_the_presence_flag() {
    let app = TestApp::new().await;

    let (_, users) = app.admin_request(Method::GET, "/api/v1/users", None).await;
    assert_eq!(users["data"][0]["status"], "Offline");

    let (_, login) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
            None,
        )
        .await;
    let token = login["access_token"].as_str().unwrap().to_string();

    let (_, users) = app.admin_request(Method::GET, "/api/v1/users", None).await;
    assert_eq!(users["data"][0]["status"], "Online");

    let (status, _) = app
        .request(Method::POST, "/api/v1/auth/logout", None, Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, users) = app.admin_request(Method::GET, "/api/v1/users", None).await;
    assert_eq!(users["data"][0]["status"], "Offline");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let app = TestApp::new().await;

    let (status, _) = app.request(Method::GET, "/api/v1/orders", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .request(Method::GET, "/api/v1/orders", None, Some("no-es-un-token"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn permissions_follow_the_users_role() {
    let app = TestApp::new().await;

    let (status, _) = app
        .admin_request(
            Method::POST,
            "/api/v1/users",
            Some(json!({
                "name": "Diseñador Uno",
                "email": "d1@imprenta.test",
                "password": "contrasena-123",
                "role": "Diseñador",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, login) = app
        .request(
            Method::POST,
            "/api/v1/auth/login",
            Some(json!({ "email": "d1@imprenta.test", "password": "contrasena-123" })),
            None,
        )
        .await;
    let token = login["access_token"].as_str().unwrap().to_string();

    // Designers hold production:manage only
    let (status, _) = app
        .request(Method::GET, "/api/v1/production/queues/pre_press", None, Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request(Method::GET, "/api/v1/users", None, Some(&token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .request(Method::GET, "/api/v1/audit-log", None, Some(&token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn health_check_is_public() {
    let app = TestApp::new().await;

    let (status, body) = app.request(Method::GET, "/api/v1/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}
