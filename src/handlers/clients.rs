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
use crate::services::clients::ClientInput;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ListClientsQuery {
    page: Option<u64>,
    per_page: Option<u64>,
    search: Option<String>,
}

async fn create_client(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Json(payload): Json<ClientInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = state.clients.create(payload, &auth_user.name).await?;
    Ok(created_response(client))
}

async fn list_clients(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListClientsQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = PaginationParams::from_parts(query.page, query.per_page).clamped();
    let (clients, total) = state.clients.list(query.search, page, per_page).await?;
    Ok(success_response(PaginatedResponse::new(
        clients, page, per_page, total,
    )))
}

async fn get_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = state.clients.get(id).await?;
    Ok(success_response(client))
}

async fn update_client(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ClientInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let client = state.clients.update(id, payload, &auth_user.name).await?;
    Ok(success_response(client))
}

async fn delete_client(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.clients.delete(id, &auth_user.name).await?;
    Ok(no_content_response())
}

pub fn client_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_client))
        .route("/", get(list_clients))
        .route("/:id", get(get_client))
        .route("/:id", put(update_client))
        .route("/:id", delete(delete_client))
}
