//! Domain layer health check functionality
//! This module provides health check services for the application

use std::collections::HashMap;

use async_trait::async_trait;
use oipet_data::database::{get_connection_info, is_pool_exhausted, DatabasePool};
use serde::Serialize;
use tracing::error;

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemStatus {
    /// All components are healthy
    Healthy,
    /// Some components are degraded but the system is functional
    Degraded,
    /// System is not functioning properly
    Unhealthy,
}

/// Component health status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone, Serialize)]
pub struct HealthComponent {
    pub status: ComponentStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone, Serialize)]
pub struct SystemHealth {
    pub status: SystemStatus,
    /// Map of component names to their health status
    pub components: HashMap<String, HealthComponent>,
}

/// Trait for health services
#[async_trait]
pub trait HealthServiceTrait: Send + Sync + std::fmt::Debug {
    /// Get the overall system health
    async fn get_system_health(&self) -> SystemHealth;

    /// Describe the storage backend, or why it cannot be reached
    async fn check_database_status(&self) -> Result<String, String>;
}

/// Health service over the storage backend the application was started with.
/// `None` means the in-memory store, which is always reachable.
#[derive(Debug, Clone, Default)]
pub struct HealthService {
    pool: Option<DatabasePool>,
}

impl HealthService {
    pub fn new(pool: Option<DatabasePool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthServiceTrait for HealthService {
    async fn get_system_health(&self) -> SystemHealth {
        // An exhausted pool would block the connectivity probe until it times out
        let db_component = if self.pool.as_ref().is_some_and(is_pool_exhausted) {
            HealthComponent {
                status: ComponentStatus::Degraded,
                details: Some("Connection pool exhausted".to_string()),
            }
        } else {
            match self.check_database_status().await {
                Ok(info) => HealthComponent {
                    status: ComponentStatus::Healthy,
                    details: Some(info),
                },
                Err(e) => HealthComponent {
                    status: ComponentStatus::Unhealthy,
                    details: Some(e),
                },
            }
        };

        let status = match db_component.status {
            ComponentStatus::Healthy => SystemStatus::Healthy,
            ComponentStatus::Degraded => SystemStatus::Degraded,
            ComponentStatus::Unhealthy => SystemStatus::Unhealthy,
        };

        SystemHealth {
            status,
            components: [("database".to_string(), db_component)].into_iter().collect(),
        }
    }

    async fn check_database_status(&self) -> Result<String, String> {
        match &self.pool {
            None => Ok("In-memory storage".to_string()),
            Some(pool) => get_connection_info(pool).map_err(|e| {
                error!("Database health check failed: {}", e);
                format!("Database connection error: {}", e)
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oipet_data::database::{initialize_database_pool, DatabaseConfig};

    #[tokio::test]
    async fn test_in_memory_storage_is_healthy() {
        let health = HealthService::new(None).get_system_health().await;
        assert_eq!(health.status, SystemStatus::Healthy);
        assert_eq!(health.components["database"].status, ComponentStatus::Healthy);
    }

    #[tokio::test]
    async fn test_sqlite_pool_is_reported() {
        let pool = initialize_database_pool(&DatabaseConfig::in_memory()).unwrap();
        let health = HealthService::new(Some(pool)).get_system_health().await;

        let database = &health.components["database"];
        assert_eq!(database.status, ComponentStatus::Healthy);
        assert!(database.details.as_deref().unwrap_or("").starts_with("SQLite"));
    }

    #[tokio::test]
    async fn test_exhausted_pool_is_degraded() {
        let pool = initialize_database_pool(&DatabaseConfig::in_memory()).unwrap();
        let DatabasePool::SQLite(inner) = &pool;
        let _held = inner.get().unwrap();

        let health = HealthService::new(Some(pool.clone())).get_system_health().await;

        assert_eq!(health.status, SystemStatus::Degraded);
        assert_eq!(health.components["database"].status, ComponentStatus::Degraded);
    }
}
