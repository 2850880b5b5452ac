use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::common::{
    created_response, no_content_response, success_response, PaginatedResponse, PaginationParams,
};
use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::inventory::{StockFilter, StockItemInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ListStockQuery {
    page: Option<u64>,
    per_page: Option<u64>,
    search: Option<String>,
    category: Option<String>,
    low: Option<bool>,
}

async fn create_stock_item(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Json(payload): Json<StockItemInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.inventory.create(payload, &auth_user.name).await?;
    Ok(created_response(item))
}

async fn list_stock_items(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListStockQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = PaginationParams::from_parts(query.page, query.per_page).clamped();
    let filter = StockFilter {
        search: query.search,
        category: query.category,
        low: query.low,
    };
    let (items, total) = state.inventory.list(filter, page, per_page).await?;
    Ok(success_response(PaginatedResponse::new(
        items, page, per_page, total,
    )))
}

async fn stock_summary(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ServiceError> {
    let summary = state.inventory.summary().await?;
    Ok(success_response(summary))
}

async fn get_stock_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.inventory.get(id).await?;
    Ok(success_response(item))
}

async fn update_stock_item(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockItemInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.inventory.update(id, payload, &auth_user.name).await?;
    Ok(success_response(item))
}

async fn delete_stock_item(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.inventory.delete(id, &auth_user.name).await?;
    Ok(no_content_response())
}

pub fn stock_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_stock_item))
        .route("/", get(list_stock_items))
        .route("/summary", get(stock_summary))
        .route("/:id", get(get_stock_item))
        .route("/:id", put(update_stock_item))
        .route("/:id", delete(delete_stock_item))
}
