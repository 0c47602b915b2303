//! Database connection module for the OiPet Saúde API
//!
//! The SQLite pool is created explicitly by the caller and handed to the
//! repositories; nothing here is global.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use rusqlite::OpenFlags;
use tracing::{error, info, warn};

use super::migrations::run_sqlite_migrations;
use super::DatabaseError;

/// SQLite connection pool shared by the repositories
#[derive(Debug, Clone)]
pub enum DatabasePool {
    /// SQLite connection pool
    SQLite(Arc<r2d2::Pool<r2d2_sqlite::SqliteConnectionManager>>),
}

/// Database configuration
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to SQLite database file. `None` opens an in-memory database.
    pub sqlite_path: Option<String>,
    /// Maximum number of pooled connections
    pub max_connections: u32,
    /// Connection timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            sqlite_path: Some("./data/oipet.db".to_string()),
            max_connections: 10,
            timeout_seconds: 30,
        }
    }
}

impl DatabaseConfig {
    /// Configuration for a private in-memory database
    pub fn in_memory() -> Self {
        Self {
            sqlite_path: None,
            ..Self::default()
        }
    }
}

/// Open the connection pool described by `config` and run migrations on it
pub fn initialize_database_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    let pool = match config.sqlite_path {
        Some(ref path) => initialize_sqlite_pool(path, config)?,
        None => initialize_in_memory_sqlite_pool(config)?,
    };

    run_migrations(&pool)?;
    Ok(pool)
}

/// Initialize SQLite connection pool backed by a file
fn initialize_sqlite_pool(sqlite_path: &str, config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing SQLite database at: {}", sqlite_path);

    if let Some(parent) = Path::new(sqlite_path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            info!("Creating parent directory: {:?}", parent);
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create directory: {}, falling back to in-memory database", e);
                return initialize_in_memory_sqlite_pool(config);
            }
        }
    }

    let manager = r2d2_sqlite::SqliteConnectionManager::file(sqlite_path)
        .with_flags(OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    match r2d2::Pool::builder()
        .max_size(config.max_connections)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)
    {
        Ok(pool) => {
            info!("SQLite connection pool created successfully");
            Ok(DatabasePool::SQLite(Arc::new(pool)))
        }
        Err(e) => {
            error!("Failed to create SQLite connection pool: {}", e);
            warn!("Falling back to in-memory SQLite database");
            initialize_in_memory_sqlite_pool(config)
        }
    }
}

/// Initialize an in-memory SQLite database
///
/// Every in-memory connection is its own database, so the pool is pinned to a
/// single connection.
fn initialize_in_memory_sqlite_pool(config: &DatabaseConfig) -> Result<DatabasePool, DatabaseError> {
    info!("Initializing in-memory SQLite database");

    let manager = r2d2_sqlite::SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));

    let pool = r2d2::Pool::builder()
        .max_size(1)
        .connection_timeout(Duration::from_secs(config.timeout_seconds))
        .build(manager)?;

    Ok(DatabasePool::SQLite(Arc::new(pool)))
}

/// Run database migrations
fn run_migrations(pool: &DatabasePool) -> Result<(), DatabaseError> {
    info!("Running database migrations");

    match pool {
        DatabasePool::SQLite(pool) => {
            let conn = pool.get()?;
            run_sqlite_migrations(&conn).map_err(DatabaseError::MigrationError)?;
        }
    }

    info!("Database migrations completed successfully");
    Ok(())
}

/// Describe the current database connection, or the error reaching it
pub fn get_connection_info(pool: &DatabasePool) -> Result<String, DatabaseError> {
    match pool {
        DatabasePool::SQLite(pool) => {
            let conn = pool.get()?;
            let path: String = conn.query_row("PRAGMA database_list", [], |row| row.get(2))?;

            let location = if path.is_empty() || path == ":memory:" {
                "SQLite in-memory database".to_string()
            } else {
                format!("SQLite database at {}", path)
            };

            let state = pool.state();
            Ok(format!(
                "{} (connections: active={}, idle={})",
                location, state.connections, state.idle_connections
            ))
        }
    }
}

/// Whether every connection the pool may open is checked out
pub fn is_pool_exhausted(pool: &DatabasePool) -> bool {
    match pool {
        DatabasePool::SQLite(pool) => {
            let state = pool.state();
            state.idle_connections == 0 && state.connections >= pool.max_size()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_config_default() {
        let config = DatabaseConfig::default();
        assert!(config.sqlite_path.is_some());
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.timeout_seconds, 30);
    }

    #[test]
    fn test_in_memory_pool_runs_migrations() {
        let pool = initialize_database_pool(&DatabaseConfig::in_memory()).unwrap();
        let DatabasePool::SQLite(inner) = &pool;
        let conn = inner.get().unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('pets', 'health_records')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_connection_info_reports_memory_database() {
        let pool = initialize_database_pool(&DatabaseConfig::in_memory()).unwrap();
        let info = get_connection_info(&pool).unwrap();
        assert!(info.starts_with("SQLite in-memory database"), "unexpected info: {}", info);
    }

    #[test]
    fn test_pool_exhausted_while_connection_held() {
        let pool = initialize_database_pool(&DatabaseConfig::in_memory()).unwrap();
        assert!(!is_pool_exhausted(&pool));

        let DatabasePool::SQLite(inner) = &pool;
        let held = inner.get().unwrap();
        assert!(is_pool_exhausted(&pool));

        drop(held);
        assert!(!is_pool_exhausted(&pool));
    }
}
