//! Application configuration, read from the environment at startup

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use oipet_data::database::DatabaseConfig;
use oipet_domain::auth::{AuthConfig, DEFAULT_ISSUER};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} environment variable not found")]
    Missing(&'static str),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

/// Where pets and health records are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Sqlite,
    Memory,
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StorageKind::Sqlite),
            "memory" => Ok(StorageKind::Memory),
            other => Err(other.to_string()),
        }
    }
}

/// Everything the binary needs to start serving
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Deployment environment name reported by the health check
    pub environment: String,
    pub storage: StorageKind,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    /// Allowed CORS origin; `None` allows any
    pub cors_allow_origin: Option<String>,
}

impl AppConfig {
    /// Read the configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or("PORT", &lookup, 3000u16)?;
        let environment = lookup("APP_ENV").unwrap_or_else(|| "development".to_string());

        let storage = match lookup("STORAGE") {
            None => StorageKind::Sqlite,
            Some(value) => value
                .parse()
                .map_err(|value| ConfigError::InvalidValue { name: "STORAGE", value })?,
        };

        let defaults = DatabaseConfig::default();
        let data_dir = lookup("DATA_DIR").unwrap_or_else(|| "data".to_string());
        let sqlite_path = lookup("DB_SQLITE_PATH")
            .unwrap_or_else(|| PathBuf::from(&data_dir).join("oipet.db").to_string_lossy().into_owned());

        let database = DatabaseConfig {
            sqlite_path: Some(sqlite_path),
            max_connections: parse_or("DB_MAX_CONNECTIONS", &lookup, defaults.max_connections)?,
            timeout_seconds: parse_or("DB_TIMEOUT_SECONDS", &lookup, defaults.timeout_seconds)?,
        };

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;
        let issuer = lookup("JWT_ISSUER").unwrap_or_else(|| DEFAULT_ISSUER.to_string());

        let cors_allow_origin = lookup("CORS_ALLOW_ORIGIN").filter(|s| !s.is_empty());

        Ok(Self {
            port,
            environment,
            storage,
            database,
            auth: AuthConfig::new(jwt_secret, issuer),
            cors_allow_origin,
        })
    }
}

fn parse_or<T, F>(name: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value }),
    }
}
