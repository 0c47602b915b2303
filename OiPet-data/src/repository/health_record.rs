use async_trait::async_trait;
use tracing::{debug, error};

use crate::database::DatabasePool;
use crate::models::health_record::{HealthRecord, RecordQuery};
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;
use super::Backend;

/// Repository trait for health records
#[async_trait]
pub trait HealthRecordRepositoryTrait: Send + Sync {
    /// Persist a new health record
    async fn create(&self, record: HealthRecord) -> Result<HealthRecord, RepositoryError>;

    /// Get a health record by ID
    async fn get_by_id(&self, id: &str) -> Result<Option<HealthRecord>, RepositoryError>;

    /// Get the records of a pet ordered by date descending
    async fn list_by_pet(&self, pet_id: &str, query: RecordQuery) -> Result<Vec<HealthRecord>, RepositoryError>;

    /// Overwrite an existing record. Fails with `NotFound` if it is gone.
    async fn update(&self, record: HealthRecord) -> Result<HealthRecord, RepositoryError>;

    /// Delete a record, returning whether it existed
    async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
}

/// Repository for health records, backed by SQLite or by in-memory storage
#[derive(Debug, Clone)]
pub struct HealthRecordRepository {
    backend: Backend,
}

impl Default for HealthRecordRepository {
    fn default() -> Self {
        Self::in_memory(InMemoryStorage::new())
    }
}

impl HealthRecordRepository {
    /// Create a repository that reads and writes the given database
    pub fn with_database(pool: DatabasePool) -> Self {
        Self {
            backend: Backend::Database(pool),
        }
    }

    /// Create a repository over in-memory storage
    pub fn in_memory(storage: InMemoryStorage) -> Self {
        Self {
            backend: Backend::Memory(storage),
        }
    }
}

#[async_trait]
impl HealthRecordRepositoryTrait for HealthRecordRepository {
    async fn create(&self, record: HealthRecord) -> Result<HealthRecord, RepositoryError> {
        let result = match &self.backend {
            Backend::Database(pool) => DatabaseStorage::insert_record(pool, &record).await,
            Backend::Memory(storage) => storage.insert_record(&record).await,
        };

        if let Err(ref e) = result {
            error!("Failed to store health record {}: {}", record.id, e);
        }

        result.map(|_| record)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<HealthRecord>, RepositoryError> {
        debug!("Getting health record by ID: {}", id);

        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::get_record_by_id(pool, id).await,
            Backend::Memory(storage) => storage.get_record_by_id(id).await,
        }
    }

    async fn list_by_pet(&self, pet_id: &str, query: RecordQuery) -> Result<Vec<HealthRecord>, RepositoryError> {
        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::list_records_by_pet(pool, pet_id, &query).await,
            Backend::Memory(storage) => storage.list_records_by_pet(pet_id, &query).await,
        }
    }

    async fn update(&self, record: HealthRecord) -> Result<HealthRecord, RepositoryError> {
        let updated = match &self.backend {
            Backend::Database(pool) => DatabaseStorage::update_record(pool, &record).await? > 0,
            Backend::Memory(storage) => storage.update_record(&record).await?,
        };

        if !updated {
            return Err(RepositoryError::NotFound(format!("health record {}", record.id)));
        }

        Ok(record)
    }

    async fn delete(&self, id: &str) -> Result<bool, RepositoryError> {
        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::delete_record(pool, id).await,
            Backend::Memory(storage) => storage.delete_record(id).await,
        }
    }
}
