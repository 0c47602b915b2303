// Repository module structure
pub mod errors;
mod health_record;
mod in_memory;
mod pet;
mod storage;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use health_record::{HealthRecordRepository, HealthRecordRepositoryTrait};
pub use in_memory::InMemoryStorage;
pub use pet::{PetRepository, PetRepositoryTrait};

use crate::database::DatabasePool;

/// Build both repositories on top of the same backend.
///
/// With a pool they read and write SQLite; without one they share a single
/// in-memory store.
pub fn create_repositories(pool: Option<DatabasePool>) -> (PetRepository, HealthRecordRepository) {
    match pool {
        Some(pool) => (
            PetRepository::with_database(pool.clone()),
            HealthRecordRepository::with_database(pool),
        ),
        None => {
            let storage = InMemoryStorage::new();
            (
                PetRepository::in_memory(storage.clone()),
                HealthRecordRepository::in_memory(storage),
            )
        }
    }
}

/// Storage backend a repository was built on, fixed at construction
#[derive(Debug, Clone)]
pub(crate) enum Backend {
    Database(DatabasePool),
    Memory(InMemoryStorage),
}
