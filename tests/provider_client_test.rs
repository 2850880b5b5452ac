mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

fn provider_payload(name: &str, ruc: &str) -> serde_json::Value {
    json!({
        "name": name,
        "tax_id": ruc,
        "contact_name": "Contacto",
        "supply_categories": "Papel, Tintas",
    })
}

#[tokio::test]
async fn provider_ruc_must_be_eleven_digits() {
    let app = TestApp::new().await;

    for bad in ["123", "2012345678A", "201234567890"] {
        let (status, _) = app
            .admin_request(
                Method::POST,
                "/api/v1/providers",
                Some(provider_payload("Papelera SAC", bad)),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "accepted ruc {:?}", bad);
    }

    let (status, _) = app
        .admin_request(
            Method::POST,
            "/api/v1/providers",
            Some(provider_payload("Papelera SAC", "20123456789")),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn duplicate_ruc_conflicts_on_create_and_edit() {
    let app = TestApp::new().await;

    let (_, first) = app
        .admin_request(
            Method::POST,
            "/api/v1/providers",
            Some(provider_payload("Papelera SAC", "20111111111")),
        )
        .await;
    let (_, second) = app
        .admin_request(
            Method::POST,
            "/api/v1/providers",
            Some(provider_payload("Tintas EIRL", "20222222222")),
        )
        .await;

    // Same RUC on create
    let (status, _) = app
        .admin_request(
            Method::POST,
            "/api/v1/providers",
            Some(provider_payload("Clon SAC", "20111111111")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Moving onto another provider's RUC on edit
    let second_id = second["id"].as_str().unwrap().to_string();
    let (status, _) = app
        .admin_request(
            Method::PUT,
            &format!("/api/v1/providers/{}", second_id),
            Some(provider_payload("Tintas EIRL", "20111111111")),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Re-saving a provider with its own RUC is fine
    let first_id = first["id"].as_str().unwrap().to_string();
    let (status, _) = app
        .admin_request(
            Method::PUT,
            &format!("/api/v1/providers/{}", first_id),
            Some(provider_payload("Papelera SAC Renombrada", "20111111111")),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn client_person_kind_is_inferred_from_the_tax_id() {
    let app = TestApp::new().await;

    let (status, natural) = app
        .admin_request(
            Method::POST,
            "/api/v1/clients",
            Some(json!({
                "tax_id": "45678901",
                "legal_name": "Juan Pérez",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(natural["person_kind"], "NATURAL");

    let (status, juridica) = app
        .admin_request(
            Method::POST,
            "/api/v1/clients",
            Some(json!({
                "tax_id": "20555555551",
                "legal_name": "Constructora Andina SAC",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(juridica["person_kind"], "JURIDICA");
}

#[tokio::test]
async fn client_with_orders_cannot_be_deleted() {
    let app = TestApp::new().await;

    let (_, client) = app
        .admin_request(
            Method::POST,
            "/api/v1/clients",
            Some(json!({
                "tax_id": "20666666661",
                "legal_name": "Editorial Sur SAC",
            })),
        )
        .await;
    let client_id = client["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .admin_request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_id": client_id,
                "items": [{"product": "Volantes", "quantity": 1000, "unit_price": "0.10"}],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .admin_request(Method::DELETE, &format!("/api/v1/clients/{}", client_id), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}
