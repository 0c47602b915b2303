use async_trait::async_trait;
use tracing::{debug, error};

use crate::database::DatabasePool;
use crate::models::pet::Pet;
use super::errors::RepositoryError;
use super::in_memory::InMemoryStorage;
use super::storage::DatabaseStorage;
use super::Backend;

/// Repository trait for pets
#[async_trait]
pub trait PetRepositoryTrait: Send + Sync {
    /// Persist a new pet
    async fn create(&self, pet: Pet) -> Result<Pet, RepositoryError>;

    /// Get a pet by ID
    async fn get_by_id(&self, id: &str) -> Result<Option<Pet>, RepositoryError>;

    /// Get a page of the pets owned by `user_id`, newest first, with the total count
    async fn list_by_owner(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Pet>, usize), RepositoryError>;
}

/// Repository for pets, backed by SQLite or by in-memory storage
#[derive(Debug, Clone)]
pub struct PetRepository {
    backend: Backend,
}

impl Default for PetRepository {
    fn default() -> Self {
        Self::in_memory(InMemoryStorage::new())
    }
}

impl PetRepository {
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
impl PetRepositoryTrait for PetRepository {
    async fn create(&self, pet: Pet) -> Result<Pet, RepositoryError> {
        let result = match &self.backend {
            Backend::Database(pool) => DatabaseStorage::insert_pet(pool, &pet).await,
            Backend::Memory(storage) => storage.insert_pet(&pet).await,
        };

        if let Err(ref e) = result {
            error!("Failed to store pet {}: {}", pet.id, e);
        }

        result.map(|_| pet)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Pet>, RepositoryError> {
        debug!("Getting pet by ID: {}", id);

        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::get_pet_by_id(pool, id).await,
            Backend::Memory(storage) => storage.get_pet_by_id(id).await,
        }
    }

    async fn list_by_owner(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Pet>, usize), RepositoryError> {
        match &self.backend {
            Backend::Database(pool) => DatabaseStorage::list_pets_by_owner(pool, user_id, limit, offset).await,
            Backend::Memory(storage) => storage.list_pets_by_owner(user_id, limit, offset).await,
        }
    }
}
