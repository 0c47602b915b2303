use std::sync::Arc;

use oipet_data::database::DatabasePool;
use oipet_domain::auth::AuthConfig;
use oipet_domain::health::{HealthService, HealthServiceTrait};
use oipet_domain::services::{create_default_services, HealthRecordServiceTrait, PetServiceTrait};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pets: Arc<dyn PetServiceTrait>,
    pub health_records: Arc<dyn HealthRecordServiceTrait>,
    pub health: Arc<dyn HealthServiceTrait>,
    pub auth: Arc<AuthConfig>,
    /// Deployment environment name
    pub environment: String,
}

impl AppState {
    /// Wire the services over the given storage. `None` selects in-memory storage.
    pub fn new(pool: Option<DatabasePool>, auth: AuthConfig, environment: impl Into<String>) -> Self {
        let (pets, health_records) = create_default_services(pool.clone());

        Self {
            pets: Arc::new(pets),
            health_records: Arc::new(health_records),
            health: Arc::new(HealthService::new(pool)),
            auth: Arc::new(auth),
            environment: environment.into(),
        }
    }

    /// Replace the health record service
    pub fn with_health_record_service(mut self, service: Arc<dyn HealthRecordServiceTrait>) -> Self {
        self.health_records = service;
        self
    }
}
