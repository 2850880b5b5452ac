use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;
use validator::Validate;

/// Application configuration, loaded from layered files plus environment
/// overrides (`APP__` prefix, `__` separator).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AppConfig {
    /// Database connection string (Postgres in deployments, SQLite in tests)
    #[validate(length(min = 1, message = "database_url must not be empty"))]
    pub database_url: String,

    /// Host interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP port to bind
    #[serde(default = "default_port")]
    pub port: u16,

    /// Secret used to sign and verify access tokens
    #[validate(length(min = 32, message = "jwt_secret must be at least 32 characters"))]
    pub jwt_secret: String,

    /// Access token lifetime in seconds
    #[serde(default = "default_jwt_expiration")]
    pub jwt_expiration: i64,

    /// Run migrations on startup
    #[serde(default = "default_auto_migrate")]
    pub auto_migrate: bool,

    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,

    #[serde(default = "default_db_min_connections")]
    pub db_min_connections: u32,

    /// Log filter, e.g. "info" or "printops_api=debug,tower_http=info"
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text
    #[serde(default)]
    pub log_json: bool,

    /// Allowed CORS origins; empty means same-origin only
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,

    /// Deployment environment name ("development", "production", "test")
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_jwt_expiration() -> i64 {
    3600
}
fn default_auto_migrate() -> bool {
    true
}
fn default_db_max_connections() -> u32 {
    10
}
fn default_db_min_connections() -> u32 {
    1
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_environment() -> String {
    "development".to_string()
}

impl AppConfig {
    pub fn new(database_url: String, jwt_secret: String, host: String, port: u16) -> Self {
        Self {
            database_url,
            host,
            port,
            jwt_secret,
            jwt_expiration: default_jwt_expiration(),
            auto_migrate: default_auto_migrate(),
            db_max_connections: default_db_max_connections(),
            db_min_connections: default_db_min_connections(),
            log_level: default_log_level(),
            log_json: false,
            cors_allowed_origins: Vec::new(),
            environment: "test".to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppConfigError {
    #[error("configuration load error: {0}")]
    Load(#[from] ConfigError),

    #[error("configuration validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Loads configuration from `config/default.toml`, then
/// `config/{RUN_MODE}.toml` when present, then `APP__`-prefixed environment
/// variables; later layers win.
pub fn load_config() -> Result<AppConfig, AppConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

    let settings = Config::builder()
        .add_source(File::with_name("config/default"))
        .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
        .add_source(Environment::with_prefix("APP").separator("__"))
        .build()?;

    let cfg: AppConfig = settings.try_deserialize()?;
    cfg.validate()?;
    Ok(cfg)
}

/// Installs the global tracing subscriber. `level` is used when `RUST_LOG`
/// is unset.
pub fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_jwt_secret_fails_validation() {
        let cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "short".into(),
            "127.0.0.1".into(),
            0,
        );
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn valid_config_passes_validation() {
        let cfg = AppConfig::new(
            "sqlite::memory:".into(),
            "0123456789abcdef0123456789abcdef".into(),
            "127.0.0.1".into(),
            8080,
        );
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8080");
        assert!(!cfg.is_production());
    }
}
