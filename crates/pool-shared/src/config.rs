//! Configuration management

use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{DEFAULT_CACHE_TTL_SECONDS, DEFAULT_SESSION_MAX_AGE_SECONDS, SESSION_COOKIE_NAME};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub database: DatabaseSettings,
    pub session: SessionSettings,
    pub dashboard: DashboardSettings,
    pub telemetry: TelemetrySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub secure_cookie: bool,
    /// Sessions older than this are dropped on next use.
    pub max_age_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardSettings {
    pub cache_ttl_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelemetrySettings {
    /// Fallback filter when `RUST_LOG` is unset.
    pub filter: String,
    pub json: bool,
    /// Daily-rolling log files are written here when set.
    pub log_dir: Option<String>,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::defaults()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::default().separator("__").try_parsing(true))
            .build()?;
        Ok(config.try_deserialize()?)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8000)?
            .set_default("app.name", "pool-server")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.acquire_timeout_seconds", 3)?
            .set_default("session.cookie_name", SESSION_COOKIE_NAME)?
            .set_default("session.secure_cookie", false)?
            .set_default("session.max_age_seconds", DEFAULT_SESSION_MAX_AGE_SECONDS)?
            .set_default("dashboard.cache_ttl_seconds", DEFAULT_CACHE_TTL_SECONDS)?
            .set_default("telemetry.filter", "info,pool_core=debug")?
            .set_default("telemetry.json", true)
    }
}
