//! Backend for a small print shop: quoting, production tracking across the
//! pre-press, press and post-press stages, inventory and purchasing, and
//! fiscal document issuance.

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod models;
pub mod services;

use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use crate::auth::{auth_routes, consts as perm, AuthConfig, AuthRouterExt, AuthService};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::services::{
    audit::AuditService, clients::ClientService, inventory::InventoryService,
    invoicing::InvoicingService, orders::OrderService, providers::ProviderService,
    purchasing::PurchasingService, users::UserService,
};

/// Shared application state handed to every handler.
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: AppConfig,
    pub auth: Arc<AuthService>,
    pub users: UserService,
    pub providers: ProviderService,
    pub clients: ClientService,
    pub orders: OrderService,
    pub invoicing: InvoicingService,
    pub inventory: InventoryService,
    pub purchasing: PurchasingService,
    pub audit: AuditService,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: AppConfig, event_sender: Arc<EventSender>) -> Self {
        let auth = Arc::new(AuthService::new(
            AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
                token_expiration: config.jwt_expiration,
            },
            db.clone(),
        ));
        let audit = AuditService::new(db.clone());

        Self {
            users: UserService::new(db.clone(), event_sender.clone(), audit.clone()),
            providers: ProviderService::new(db.clone(), event_sender.clone(), audit.clone()),
            clients: ClientService::new(db.clone(), event_sender.clone(), audit.clone()),
            orders: OrderService::new(db.clone(), event_sender.clone(), audit.clone()),
            invoicing: InvoicingService::new(db.clone(), event_sender.clone(), audit.clone()),
            inventory: InventoryService::new(db.clone(), event_sender.clone(), audit.clone()),
            purchasing: PurchasingService::new(db.clone(), event_sender, audit.clone()),
            audit,
            auth,
            db,
            config,
        }
    }
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// All v1 routes. Every domain router sits behind its own permission;
/// administrators pass every check.
pub fn api_v1_routes(state: Arc<AppState>) -> Router {
    let auth_service = state.auth.clone();

    let api = Router::new()
        .nest(
            "/users",
            handlers::users::user_routes().with_permission(perm::USERS_MANAGE),
        )
        .nest(
            "/providers",
            handlers::providers::provider_routes().with_permission(perm::PROVIDERS_MANAGE),
        )
        .nest(
            "/clients",
            handlers::clients::client_routes().with_permission(perm::CLIENTS_MANAGE),
        )
        .nest(
            "/orders",
            handlers::orders::order_routes().with_permission(perm::ORDERS_MANAGE),
        )
        .nest(
            "/production",
            handlers::orders::production_routes().with_permission(perm::PRODUCTION_MANAGE),
        )
        .nest(
            "/invoices",
            handlers::invoices::invoice_routes().with_permission(perm::INVOICES_MANAGE),
        )
        .nest(
            "/stock-items",
            handlers::inventory::stock_routes().with_permission(perm::INVENTORY_MANAGE),
        )
        .nest(
            "/purchase-orders",
            handlers::purchase_orders::purchase_order_routes()
                .with_permission(perm::INVENTORY_MANAGE),
        )
        .nest(
            "/audit-log",
            handlers::audit::audit_routes().with_permission(perm::AUDIT_READ),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_routes().with_state(auth_service.clone()))
        .merge(api)
        // auth_middleware resolves the token through this extension
        .layer(Extension(auth_service))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        return CorsLayer::new();
    }
    let origins: Vec<axum::http::HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}

/// Full application router with the ambient middleware stack.
pub fn app_router(state: Arc<AppState>) -> Router {
    let request_timeout = std::time::Duration::from_secs(30);
    let cors = cors_layer(&state.config.cors_allowed_origins);

    Router::new()
        .nest("/api/v1", api_v1_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
}
