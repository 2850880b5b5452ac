use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{created_response, success_response, PaginatedResponse, PaginationParams};
use crate::auth::AuthUser;
use crate::entities::{purchase_order, purchase_order_line};
use crate::errors::ServiceError;
use crate::models::PurchaseOrderStatus;
use crate::services::purchasing::{CreatePurchaseOrderInput, ReceiveInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ListPurchaseOrdersQuery {
    page: Option<u64>,
    per_page: Option<u64>,
    status: Option<PurchaseOrderStatus>,
}

#[derive(Debug, Serialize)]
struct PurchaseOrderWithLines {
    #[serde(flatten)]
    purchase_order: purchase_order::Model,
    lines: Vec<purchase_order_line::Model>,
}

async fn create_purchase_order(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Json(payload): Json<CreatePurchaseOrderInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let (purchase_order, lines) = state.purchasing.create(payload, &auth_user.name).await?;
    Ok(created_response(PurchaseOrderWithLines {
        purchase_order,
        lines,
    }))
}

async fn list_purchase_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListPurchaseOrdersQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = PaginationParams::from_parts(query.page, query.per_page).clamped();
    let (orders, total) = state.purchasing.list(query.status, page, per_page).await?;
    Ok(success_response(PaginatedResponse::new(
        orders, page, per_page, total,
    )))
}

async fn get_purchase_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let (purchase_order, lines) = state.purchasing.get(id).await?;
    Ok(success_response(PurchaseOrderWithLines {
        purchase_order,
        lines,
    }))
}

async fn receive_purchase_order(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReceiveInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.purchasing.receive(id, payload, &auth_user.name).await?;
    Ok(success_response(order))
}

pub fn purchase_order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_purchase_order))
        .route("/", get(list_purchase_orders))
        .route("/:id", get(get_purchase_order))
        .route("/:id/receive", post(receive_purchase_order))
}
