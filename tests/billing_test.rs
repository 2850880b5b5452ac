mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

/// Creates a client, a quote worth S/ 236.00, converts it and walks it to
/// `Completado`. Returns the allocated OT code.
async fn seed_completed_order(app: &TestApp) -> String {
    let (_, client) = app
        .admin_request(
            Method::POST,
            "/api/v1/clients",
            Some(json!({
                "tax_id": "20888888881",
                "legal_name": "Minimarket El Sol SAC",
            })),
        )
        .await;
    let client_id = client["id"].as_str().unwrap().to_string();

    let (_, order) = app
        .admin_request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_id": client_id,
                "items": [{"product": "Banners", "quantity": 4, "unit_price": "59.00"}],
            })),
        )
        .await;
    let id = order["id"].as_str().unwrap().to_string();

    let (_, converted) = app
        .admin_request(Method::POST, &format!("/api/v1/orders/{}/convert", id), None)
        .await;
    let ot_code = converted["ot_code"].as_str().unwrap().to_string();

    for step in [
        "Diseño Pendiente",
        "En Diseño",
        "En Aprobación de Cliente",
        "Diseño Aprobado",
        "Asignada a Prensa",
        "En Preparación",
        "Imprimiendo",
        "En Post-Prensa",
        "En Acabados",
        "En Control de Calidad",
        "Completado",
    ] {
        let (status, _) = app
            .admin_request(
                Method::PUT,
                &format!("/api/v1/orders/{}/status", id),
                Some(json!({ "status": step })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "transition into {:?} failed", step);
    }

    ot_code
}

#[tokio::test]
async fn issuing_a_factura_splits_out_the_igv() {
    let app = TestApp::new().await;
    let ot_code = seed_completed_order(&app).await;

    let (status, invoice) = app
        .admin_request(
            Method::POST,
            "/api/v1/invoices",
            Some(json!({ "ot_code": ot_code, "doc_type": "FACTURA" })),
        )
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(invoice["number"], "F001-000001");
    assert_eq!(invoice["total"], "236.00");
    assert_eq!(invoice["subtotal"], "200.00");
    assert_eq!(invoice["igv"], "36.00");
    assert_eq!(invoice["client_tax_id"], "20888888881");
    assert_eq!(invoice["items"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn an_ot_can_only_be_billed_once() {
    let app = TestApp::new().await;
    let ot_code = seed_completed_order(&app).await;

    let (status, _) = app
        .admin_request(
            Method::POST,
            "/api/v1/invoices",
            Some(json!({ "ot_code": ot_code, "doc_type": "BOLETA" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .admin_request(
            Method::POST,
            "/api/v1/invoices",
            Some(json!({ "ot_code": ot_code, "doc_type": "FACTURA" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("B001-000001"), "message was {:?}", message);
}

#[tokio::test]
async fn billing_flips_the_orders_billing_status() {
    let app = TestApp::new().await;
    let ot_code = seed_completed_order(&app).await;

    app.admin_request(
        Method::POST,
        "/api/v1/invoices",
        Some(json!({ "ot_code": ot_code, "doc_type": "FACTURA" })),
    )
    .await;

    let (_, orders) = app
        .admin_request(Method::GET, "/api/v1/orders?tab=completed", None)
        .await;
    let billed = &orders["data"].as_array().unwrap()[0];
    assert_eq!(billed["billing_status"], "Facturado");
}

#[tokio::test]
async fn unfinished_work_orders_cannot_be_billed() {
    let app = TestApp::new().await;

    let (_, client) = app
        .admin_request(
            Method::POST,
            "/api/v1/clients",
            Some(json!({ "tax_id": "20999999991", "legal_name": "Bodega Central SAC" })),
        )
        .await;
    let client_id = client["id"].as_str().unwrap().to_string();

    let (_, order) = app
        .admin_request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_id": client_id,
                "items": [{"product": "Folletos", "quantity": 100, "unit_price": "1.00"}],
            })),
        )
        .await;
    let id = order["id"].as_str().unwrap().to_string();
    let (_, converted) = app
        .admin_request(Method::POST, &format!("/api/v1/orders/{}/convert", id), None)
        .await;
    let ot_code = converted["ot_code"].as_str().unwrap().to_string();

    let (status, _) = app
        .admin_request(
            Method::POST,
            "/api/v1/invoices",
            Some(json!({ "ot_code": ot_code, "doc_type": "FACTURA" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // A quote code that never became an OT is simply not found
    let (status, _) = app
        .admin_request(
            Method::POST,
            "/api/v1/invoices",
            Some(json!({ "ot_code": "OT-9999", "doc_type": "FACTURA" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn correlatives_advance_per_series() {
    let app = TestApp::new().await;

    // Two completed orders billed under different series keep independent
    // sequences.
    let first_ot = seed_completed_order(&app).await;
    let (_, first) = app
        .admin_request(
            Method::POST,
            "/api/v1/invoices",
            Some(json!({ "ot_code": first_ot, "doc_type": "FACTURA" })),
        )
        .await;
    assert_eq!(first["number"], "F001-000001");

    // Second order for the same client
    let (_, clients) = app.admin_request(Method::GET, "/api/v1/clients", None).await;
    let client_id = clients["data"][0]["id"].as_str().unwrap().to_string();
    let (_, order) = app
        .admin_request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_id": client_id,
                "items": [{"product": "Stickers", "quantity": 10, "unit_price": "2.00"}],
            })),
        )
        .await;
    let id = order["id"].as_str().unwrap().to_string();
    let (_, converted) = app
        .admin_request(Method::POST, &format!("/api/v1/orders/{}/convert", id), None)
        .await;
    let ot_code = converted["ot_code"].as_str().unwrap().to_string();
    for step in [
        "Diseño Pendiente",
        "En Diseño",
        "En Aprobación de Cliente",
        "Diseño Aprobado",
        "Asignada a Prensa",
        "En Preparación",
        "Imprimiendo",
        "En Post-Prensa",
        "En Acabados",
        "En Control de Calidad",
        "Completado",
    ] {
        app.admin_request(
            Method::PUT,
            &format!("/api/v1/orders/{}/status", id),
            Some(json!({ "status": step })),
        )
        .await;
    }

    let (_, boleta) = app
        .admin_request(
            Method::POST,
            "/api/v1/invoices",
            Some(json!({ "ot_code": ot_code, "doc_type": "BOLETA" })),
        )
        .await;
    assert_eq!(boleta["number"], "B001-000001");
}
