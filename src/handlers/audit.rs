use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use serde::Deserialize;

use super::common::{success_response, PaginatedResponse, PaginationParams};
use crate::errors::ServiceError;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ListAuditQuery {
    page: Option<u64>,
    per_page: Option<u64>,
    search: Option<String>,
}

async fn list_audit_log(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAuditQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = PaginationParams::from_parts(query.page, query.per_page).clamped();
    let (entries, total) = state.audit.list(query.search, page, per_page).await?;
    Ok(success_response(PaginatedResponse::new(
        entries, page, per_page, total,
    )))
}

pub fn audit_routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_audit_log))
}
