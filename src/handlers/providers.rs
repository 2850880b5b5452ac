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
use crate::services::providers::ProviderInput;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ListProvidersQuery {
    page: Option<u64>,
    per_page: Option<u64>,
    search: Option<String>,
}

async fn create_provider(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Json(payload): Json<ProviderInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let provider = state.providers.create(payload, &auth_user.name).await?;
    Ok(created_response(provider))
}

async fn list_providers(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListProvidersQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = PaginationParams::from_parts(query.page, query.per_page).clamped();
    let (providers, total) = state.providers.list(query.search, page, per_page).await?;
    Ok(success_response(PaginatedResponse::new(
        providers, page, per_page, total,
    )))
}

async fn get_provider(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let provider = state.providers.get(id).await?;
    Ok(success_response(provider))
}

async fn update_provider(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProviderInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let provider = state.providers.update(id, payload, &auth_user.name).await?;
    Ok(success_response(provider))
}

async fn delete_provider(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.providers.delete(id, &auth_user.name).await?;
    Ok(no_content_response())
}

pub fn provider_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_provider))
        .route("/", get(list_providers))
        .route("/:id", get(get_provider))
        .route("/:id", put(update_provider))
        .route("/:id", delete(delete_provider))
}
