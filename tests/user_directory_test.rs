mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

fn user_payload(name: &str, email: &str, role: &str) -> serde_json::Value {
    json!({
        "name": name,
        "email": email,
        "password": "contrasena-123",
        "role": role,
    })
}

#[tokio::test]
async fn creates_a_user_and_hides_the_password_hash() {
    let app = TestApp::new().await;

    let (status, body) = app
        .admin_request(
            Method::POST,
            "/api/v1/users",
            Some(user_payload("María Flores", "maria@imprenta.test", "Ventas")),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["email"], "maria@imprenta.test");
    assert_eq!(body["role"], "Ventas");
    assert_eq!(body["status"], "Offline");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn rejects_duplicate_email_ignoring_case() {
    let app = TestApp::new().await;

    let (status, _) = app
        .admin_request(
            Method::POST,
            "/api/v1/users",
            Some(user_payload("Primero", "dup@imprenta.test", "Ventas")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .admin_request(
            Method::POST,
            "/api/v1/users",
            Some(user_payload("Segundo", "DUP@imprenta.test", "Ventas")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn edit_rejects_anothers_email_but_keeps_own() {
    let app = TestApp::new().await;

    let (_, first) = app
        .admin_request(
            Method::POST,
            "/api/v1/users",
            Some(user_payload("Uno", "uno@imprenta.test", "Ventas")),
        )
        .await;
    let (_, second) = app
        .admin_request(
            Method::POST,
            "/api/v1/users",
            Some(user_payload("Dos", "dos@imprenta.test", "Inventario")),
        )
        .await;

    let second_id = second["id"].as_str().unwrap().to_string();

    // Moving onto another account's email conflicts
    let (status, _) = app
        .admin_request(
            Method::PUT,
            &format!("/api/v1/users/{}", second_id),
            Some(json!({
                "name": "Dos",
                "email": first["email"],
                "role": "Inventario",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Re-saving with the same email is fine
    let (status, _) = app
        .admin_request(
            Method::PUT,
            &format!("/api/v1/users/{}", second_id),
            Some(json!({
                "name": "Dos Renombrado",
                "email": "dos@imprenta.test",
                "role": "Inventario",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn lists_default_to_pages_of_ten() {
    let app = TestApp::new().await;

    for i in 0..12 {
        let (status, _) = app
            .admin_request(
                Method::POST,
                "/api/v1/users",
                Some(user_payload(
                    &format!("Usuario {:02}", i),
                    &format!("u{:02}@imprenta.test", i),
                    "Ventas",
                )),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // 12 created plus the seeded admin
    let (status, body) = app.admin_request(Method::GET, "/api/v1/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
    assert_eq!(body["pagination"]["total"], 13);
    assert_eq!(body["pagination"]["total_pages"], 2);

    let (_, page2) = app
        .admin_request(Method::GET, "/api/v1/users?page=2", None)
        .await;
    assert_eq!(page2["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn deleting_a_user_removes_them_from_the_roster() {
    let app = TestApp::new().await;

    let (_, created) = app
        .admin_request(
            Method::POST,
            "/api/v1/users",
            Some(user_payload("Temporal", "temporal@imprenta.test", "Ventas")),
        )
        .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .admin_request(Method::DELETE, &format!("/api/v1/users/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app
        .admin_request(Method::GET, &format!("/api/v1/users/{}", id), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
