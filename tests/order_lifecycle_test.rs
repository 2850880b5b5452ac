mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

async fn seed_client(app: &TestApp) -> String {
    let (status, client) = app
        .admin_request(
            Method::POST,
            "/api/v1/clients",
            Some(json!({
                "tax_id": "20777777771",
                "legal_name": "Gráfica Lima SAC",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    client["id"].as_str().unwrap().to_string()
}

async fn seed_quote(app: &TestApp, client_id: &str) -> serde_json::Value {
    let (status, order) = app
        .admin_request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_id": client_id,
                "items": [
                    {"product": "Tarjetas", "quantity": 500, "unit_price": "0.20"},
                    {"product": "Afiches", "quantity": 10, "unit_price": "5.00"},
                ],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    order
}

async fn put_status(app: &TestApp, id: &str, status_label: &str) -> StatusCode {
    let (status, _) = app
        .admin_request(
            Method::PUT,
            &format!("/api/v1/orders/{}/status", id),
            Some(json!({ "status": status_label })),
        )
        .await;
    status
}

#[tokio::test]
async fn quote_total_is_computed_server_side() {
    let app = TestApp::new().await;
    let client_id = seed_client(&app).await;
    let order = seed_quote(&app, &client_id).await;

    assert_eq!(order["status"], "Nueva");
    assert_eq!(order["total"], "150.00");
    assert!(order["code"].as_str().unwrap().starts_with("COT-"));
    assert!(order["ot_code"].is_null());
}

#[tokio::test]
async fn quote_requires_an_existing_client_and_items() {
    let app = TestApp::new().await;

    let (status, _) = app
        .admin_request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "client_id": uuid::Uuid::new_v4(),
                "items": [{"product": "Tarjetas", "quantity": 1, "unit_price": "1.00"}],
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let client_id = seed_client(&app).await;
    let (status, _) = app
        .admin_request(
            Method::POST,
            "/api/v1/orders",
            Some(json!({ "client_id": client_id, "items": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn converting_a_quote_allocates_an_ot_code() {
    let app = TestApp::new().await;
    let client_id = seed_client(&app).await;
    let order = seed_quote(&app, &client_id).await;
    let id = order["id"].as_str().unwrap().to_string();

    let (status, converted) = app
        .admin_request(Method::POST, &format!("/api/v1/orders/{}/convert", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(converted["status"], "Orden Creada");
    assert!(converted["ot_code"].as_str().unwrap().starts_with("OT-"));

    // A work order is no longer a quote and cannot be converted again
    let (status, _) = app
        .admin_request(Method::POST, &format!("/api/v1/orders/{}/convert", id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn rejected_quote_keeps_no_ot_code() {
    let app = TestApp::new().await;
    let client_id = seed_client(&app).await;
    let order = seed_quote(&app, &client_id).await;
    let id = order["id"].as_str().unwrap().to_string();

    let (status, rejected) = app
        .admin_request(Method::POST, &format!("/api/v1/orders/{}/reject", id), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "Rechazada");
    assert!(rejected["ot_code"].is_null());

    // A rejected quote is terminal
    let (status, _) = app
        .admin_request(Method::POST, &format!("/api/v1/orders/{}/convert", id), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn production_walks_the_full_status_chain() {
    let app = TestApp::new().await;
    let client_id = seed_client(&app).await;
    let order = seed_quote(&app, &client_id).await;
    let id = order["id"].as_str().unwrap().to_string();

    app.admin_request(Method::POST, &format!("/api/v1/orders/{}/convert", id), None)
        .await;

    let chain = [
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
    ];
    for next in chain {
        assert_eq!(
            put_status(&app, &id, next).await,
            StatusCode::OK,
            "transition into {:?} failed",
            next
        );
    }

    let (_, finished) = app
        .admin_request(Method::GET, &format!("/api/v1/orders/{}", id), None)
        .await;
    assert_eq!(finished["status"], "Completado");
}

#[tokio::test]
async fn illegal_jumps_are_rejected() {
    let app = TestApp::new().await;
    let client_id = seed_client(&app).await;
    let order = seed_quote(&app, &client_id).await;
    let id = order["id"].as_str().unwrap().to_string();

    // A quote cannot jump straight into the press queue
    assert_eq!(put_status(&app, &id, "Imprimiendo").await, StatusCode::BAD_REQUEST);

    app.admin_request(Method::POST, &format!("/api/v1/orders/{}/convert", id), None)
        .await;

    // Nor can a fresh work order skip the design phase
    assert_eq!(put_status(&app, &id, "Completado").await, StatusCode::BAD_REQUEST);
    assert_eq!(put_status(&app, &id, "En Acabados").await, StatusCode::BAD_REQUEST);

    // The failed attempts must not have moved the order
    let (_, current) = app
        .admin_request(Method::GET, &format!("/api/v1/orders/{}", id), None)
        .await;
    assert_eq!(current["status"], "Orden Creada");
}

#[tokio::test]
async fn status_endpoint_cannot_stand_in_for_conversion_or_rejection() {
    let app = TestApp::new().await;
    let client_id = seed_client(&app).await;
    let order = seed_quote(&app, &client_id).await;
    let id = order["id"].as_str().unwrap().to_string();

    // Pushing a quote straight into production would skip the OT code
    assert_eq!(put_status(&app, &id, "Orden Creada").await, StatusCode::BAD_REQUEST);
    assert_eq!(put_status(&app, &id, "Rechazada").await, StatusCode::BAD_REQUEST);

    let (_, current) = app
        .admin_request(Method::GET, &format!("/api/v1/orders/{}", id), None)
        .await;
    assert_eq!(current["status"], "Nueva");
    assert!(current["ot_code"].is_null());
}

#[tokio::test]
async fn client_revision_loop_returns_to_design() {
    let app = TestApp::new().await;
    let client_id = seed_client(&app).await;
    let order = seed_quote(&app, &client_id).await;
    let id = order["id"].as_str().unwrap().to_string();

    app.admin_request(Method::POST, &format!("/api/v1/orders/{}/convert", id), None)
        .await;
    for step in ["Diseño Pendiente", "En Diseño", "En Aprobación de Cliente"] {
        assert_eq!(put_status(&app, &id, step).await, StatusCode::OK);
    }

    assert_eq!(put_status(&app, &id, "Cambios Solicitados").await, StatusCode::OK);
    assert_eq!(put_status(&app, &id, "En Diseño").await, StatusCode::OK);
    assert_eq!(put_status(&app, &id, "En Aprobación de Cliente").await, StatusCode::OK);
    assert_eq!(put_status(&app, &id, "Diseño Aprobado").await, StatusCode::OK);
}

#[tokio::test]
async fn assignment_follows_the_assignees_role() {
    let app = TestApp::new().await;
    let client_id = seed_client(&app).await;
    let order = seed_quote(&app, &client_id).await;
    let id = order["id"].as_str().unwrap().to_string();

    let (_, designer) = app
        .admin_request(
            Method::POST,
            "/api/v1/users",
            Some(json!({
                "name": "Diseñadora",
                "email": "diseno@imprenta.test",
                "password": "contrasena-123",
                "role": "Diseñador",
            })),
        )
        .await;
    let designer_id = designer["id"].as_str().unwrap().to_string();

    let (_, seller) = app
        .admin_request(
            Method::POST,
            "/api/v1/users",
            Some(json!({
                "name": "Vendedor",
                "email": "ventas@imprenta.test",
                "password": "contrasena-123",
                "role": "Ventas",
            })),
        )
        .await;
    let seller_id = seller["id"].as_str().unwrap().to_string();

    app.admin_request(Method::POST, &format!("/api/v1/orders/{}/convert", id), None)
        .await;

    // Sales staff take no production assignments
    let (status, _) = app
        .admin_request(
            Method::POST,
            &format!("/api/v1/production/orders/{}/assign", id),
            Some(json!({ "user_id": seller_id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, assigned) = app
        .admin_request(
            Method::POST,
            &format!("/api/v1/production/orders/{}/assign", id),
            Some(json!({ "user_id": designer_id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(assigned["status"], "Diseño Pendiente");
    assert_eq!(assigned["prepress_assignee"], designer_id.as_str());

    // Withdrawing the assignment drops the order back to the backlog
    let (status, unassigned) = app
        .admin_request(
            Method::POST,
            &format!("/api/v1/production/orders/{}/unassign", id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(unassigned["status"], "Orden Creada");
    assert!(unassigned["prepress_assignee"].is_null());
}

#[tokio::test]
async fn board_tabs_split_quotes_from_production() {
    let app = TestApp::new().await;
    let client_id = seed_client(&app).await;

    let quote = seed_quote(&app, &client_id).await;
    let converted = seed_quote(&app, &client_id).await;
    let converted_id = converted["id"].as_str().unwrap().to_string();
    app.admin_request(
        Method::POST,
        &format!("/api/v1/orders/{}/convert", converted_id),
        None,
    )
    .await;

    let (_, quotes) = app
        .admin_request(Method::GET, "/api/v1/orders?tab=quotes", None)
        .await;
    let codes: Vec<_> = quotes["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["code"].as_str().unwrap().to_string())
        .collect();
    assert!(codes.contains(&quote["code"].as_str().unwrap().to_string()));
    assert!(!codes.contains(&converted["code"].as_str().unwrap().to_string()));

    let (_, production) = app
        .admin_request(Method::GET, "/api/v1/orders?tab=production", None)
        .await;
    assert_eq!(production["data"].as_array().unwrap().len(), 1);

    let (status, summary) = app
        .admin_request(Method::GET, "/api/v1/orders/summary", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["quotes"], 1);
    assert_eq!(summary["production"], 1);
    assert_eq!(summary["completed"], 0);
    assert_eq!(summary["rejected"], 0);
}
