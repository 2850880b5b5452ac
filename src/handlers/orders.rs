use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::{
    created_response, success_response, PaginatedResponse, PaginationParams,
};
use crate::auth::AuthUser;
use crate::entities::{order, order_item};
use crate::errors::ServiceError;
use crate::models::{OrderStatus, Stage};
use crate::services::orders::{CreateOrderInput, OrderFilter, OrderTab};
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ListOrdersQuery {
    page: Option<u64>,
    per_page: Option<u64>,
    search: Option<String>,
    tab: Option<OrderTab>,
}

#[derive(Debug, Serialize)]
struct OrderWithItems {
    #[serde(flatten)]
    order: order::Model,
    items: Vec<order_item::Model>,
}

#[derive(Debug, Deserialize)]
struct UpdateStatusRequest {
    status: OrderStatus,
}

#[derive(Debug, Deserialize)]
struct AssignRequest {
    user_id: Uuid,
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Json(payload): Json<CreateOrderInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let (order, items) = state.orders.create(payload, &auth_user.name).await?;
    Ok(created_response(OrderWithItems { order, items }))
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = PaginationParams::from_parts(query.page, query.per_page).clamped();
    let filter = OrderFilter {
        search: query.search,
        tab: query.tab,
    };
    let (orders, total) = state.orders.list(filter, page, per_page).await?;
    Ok(success_response(PaginatedResponse::new(
        orders, page, per_page, total,
    )))
}

async fn order_summary(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.orders.summary().await?;
    Ok(success_response(summary))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.orders.get(id).await?;
    let items = state.orders.get_items(id).await?;
    Ok(success_response(OrderWithItems { order, items }))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state
        .orders
        .transition(id, payload.status, &auth_user.name)
        .await?;
    Ok(success_response(order))
}

async fn convert_order(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.orders.convert_to_ot(id, &auth_user.name).await?;
    Ok(success_response(order))
}

async fn reject_order(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.orders.reject_quote(id, &auth_user.name).await?;
    Ok(success_response(order))
}

async fn assign_order(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<AssignRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state
        .orders
        .assign(id, payload.user_id, &auth_user.name)
        .await?;
    Ok(success_response(order))
}

async fn unassign_order(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let order = state.orders.unassign(id, &auth_user.name).await?;
    Ok(success_response(order))
}

async fn stage_queue(
    State(state): State<Arc<AppState>>,
    Path(stage): Path<Stage>,
    Query(query): Query<ListOrdersQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    if !matches!(stage, Stage::PrePress | Stage::Press | Stage::PostPress) {
        return Err(ServiceError::ValidationError(
            "Queues exist only for the production stages".into(),
        ));
    }
    let (page, per_page) = PaginationParams::from_parts(query.page, query.per_page).clamped();
    let (orders, total) = state.orders.stage_queue(stage, page, per_page).await?;
    Ok(success_response(PaginatedResponse::new(
        orders, page, per_page, total,
    )))
}

pub fn order_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_order))
        .route("/", get(list_orders))
        .route("/summary", get(order_summary))
        .route("/:id", get(get_order))
        .route("/:id/status", put(update_status))
        .route("/:id/convert", post(convert_order))
        .route("/:id/reject", post(reject_order))
}

/// Assignment and stage queues sit behind the production permission.
pub fn production_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders/:id/assign", post(assign_order))
        .route("/orders/:id/unassign", post(unassign_order))
        .route("/queues/:stage", get(stage_queue))
}
