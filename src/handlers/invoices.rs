use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use super::common::{created_response, success_response, PaginatedResponse, PaginationParams};
use crate::auth::AuthUser;
use crate::errors::ServiceError;
use crate::services::invoicing::IssueDocumentInput;
use crate::AppState;

#[derive(Debug, Deserialize)]
struct ListInvoicesQuery {
    page: Option<u64>,
    per_page: Option<u64>,
    search: Option<String>,
}

async fn issue_document(
    State(state): State<Arc<AppState>>,
    auth_user: AuthUser,
    Json(payload): Json<IssueDocumentInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let invoice = state.invoicing.issue(payload, &auth_user.name).await?;
    Ok(created_response(invoice))
}

async fn list_invoices(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListInvoicesQuery>,
) -> Result<impl IntoResponse, ServiceError> {
    let (page, per_page) = PaginationParams::from_parts(query.page, query.per_page).clamped();
    let (invoices, total) = state.invoicing.list(query.search, page, per_page).await?;
    Ok(success_response(PaginatedResponse::new(
        invoices, page, per_page, total,
    )))
}

async fn get_invoice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ServiceError> {
    let invoice = state.invoicing.get(id).await?;
    Ok(success_response(invoice))
}

pub fn invoice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(issue_document))
        .route("/", get(list_invoices))
        .route("/:id", get(get_invoice))
}
