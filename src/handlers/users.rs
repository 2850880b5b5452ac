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
use crate::models::{Presence, UserRole};
use crate::services::users::{CreateUserInput, UpdateUserInput, UserFilter};
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ListUsersQuery {
    page: Option<u64>,
    per_page: Option<u64>,
    search: Option<String>,
    role: Option<UserRole>,
    status: Option<Presence>,
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Json(payload): Json<CreateUserInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.users.create(payload, &auth_user.name).await?;
    Ok(created_response(user))
}

async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = PaginationParams::from_parts(query.page, query.per_page).clamped();
    let filter = UserFilter {
        search: query.search,
        role: query.role,
        status: query.status,
    };
    let (users, total) = state.users.list(filter, page, per_page).await?;
    Ok(success_response(PaginatedResponse::new(
        users, page, per_page, total,
    )))
}

async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.users.get(id).await?;
    Ok(success_response(user))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let user = state.users.update(id, payload, &auth_user.name).await?;
    Ok(success_response(user))
}

async fn delete_user(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    state.users.delete(id, &auth_user.name).await?;
    Ok(no_content_response())
}

pub fn user_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_user))
        .route("/", get(list_users))
        .route("/:id", get(get_user))
        .route("/:id", put(update_user))
        .route("/:id", delete(delete_user))
}
