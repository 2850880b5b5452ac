use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use serde_json::Value;
use tempfile::TempDir;
use tokio::sync::mpsc;
use tower::ServiceExt;
use uuid::Uuid;

use printops_api::{
    config::AppConfig,
    db,
    entities::user,
    events::{self, EventSender},
    AppState,
};

#[allow(dead_code)]
pub const ADMIN_EMAIL: &str = "admin@imprenta.test";
#[allow(dead_code)]
pub const ADMIN_PASSWORD: &str = "admin-secreto-123";

/// Test harness running the full router against a throwaway SQLite file.
pub struct TestApp {
    router: Router,
    #[allow(dead_code)]
    pub state: Arc<AppState>,
    token: String,
    _event_task: tokio::task::JoinHandle<()>,
    _tmp: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let db_path = tmp.path().join("printops_test.db");
        let cfg = AppConfig::new(
            format!("sqlite://{}?mode=rwc", db_path.display()),
            "test_secret_key_for_testing_only_32chars".to_string(),
            "127.0.0.1".to_string(),
            0,
        );

        let pool = db::establish_connection(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let (event_tx, event_rx) = mpsc::channel(256);
        let event_sender = Arc::new(EventSender::new(event_tx));
        let event_task = tokio::spawn(events::process_events(event_rx));

        let state = Arc::new(AppState::new(Arc::new(pool), cfg, event_sender));

        let admin = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set("Admin de Prueba".to_string()),
            email: Set(ADMIN_EMAIL.to_string()),
            password_hash: Set(
                printops_api::auth::AuthService::hash_password(ADMIN_PASSWORD)
                    .expect("hash admin password"),
            ),
            role: Set("Administrador".to_string()),
            status: Set("Offline".to_string()),
            created_at: Set(Utc::now()),
            updated_at: Set(None),
        }
        .insert(&*state.db)
        .await
        .expect("seed admin user");

        let token = state.auth.generate_token(&admin).expect("admin token");
        let router = printops_api::app_router(state.clone());

        Self {
            router,
            state,
            token,
            _event_task: event_task,
            _tmp: tmp,
        }
    }

    #[allow(dead_code)]
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Send a request with an optional bearer token, returning status and
    /// parsed JSON body (Null when the body is empty).
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("serialize request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("build request");
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read response body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    /// Authenticated JSON request as the seeded admin.
    pub async fn admin_request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let token = self.token.clone();
        self.request(method, uri, body, Some(&token)).await
    }
}
