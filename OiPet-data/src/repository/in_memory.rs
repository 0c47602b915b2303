use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::models::health_record::{HealthRecord, RecordQuery};
use crate::models::pet::Pet;
use super::errors::RepositoryError;

/// In-memory storage for pets and health records
///
/// Cloning shares the underlying maps, so a pet repository and a health record
/// repository built from clones of the same storage see each other's writes.
#[derive(Debug, Clone)]
pub struct InMemoryStorage {
    pets: Arc<Mutex<HashMap<String, Pet>>>,
    records: Arc<Mutex<HashMap<String, HealthRecord>>>,
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStorage {
    /// Create a new, empty in-memory storage
    pub fn new() -> Self {
        Self {
            pets: Arc::new(Mutex::new(HashMap::new())),
            records: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Store a pet in memory
    pub async fn insert_pet(&self, pet: &Pet) -> Result<(), RepositoryError> {
        let mut store = self.pets.lock()?;
        store.insert(pet.id.clone(), pet.clone());
        Ok(())
    }

    /// Get a pet by ID from memory
    pub async fn get_pet_by_id(&self, id: &str) -> Result<Option<Pet>, RepositoryError> {
        let store = self.pets.lock()?;
        Ok(store.get(id).cloned())
    }

    /// Get a page of the pets owned by a user, newest first, plus the total count
    pub async fn list_pets_by_owner(
        &self,
        user_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<(Vec<Pet>, usize), RepositoryError> {
        let store = self.pets.lock()?;

        let mut pets: Vec<Pet> = store
            .values()
            .filter(|pet| pet.user_id == user_id)
            .cloned()
            .collect();
        pets.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = pets.len();
        let page = pets.into_iter().skip(offset).take(limit).collect();

        Ok((page, total))
    }

    /// Store a health record in memory
    pub async fn insert_record(&self, record: &HealthRecord) -> Result<(), RepositoryError> {
        let mut store = self.records.lock()?;
        store.insert(record.id.clone(), record.clone());
        Ok(())
    }

    /// Get a health record by ID from memory
    pub async fn get_record_by_id(&self, id: &str) -> Result<Option<HealthRecord>, RepositoryError> {
        let store = self.records.lock()?;
        Ok(store.get(id).cloned())
    }

    /// Get the records of a pet, newest first
    pub async fn list_records_by_pet(
        &self,
        pet_id: &str,
        query: &RecordQuery,
    ) -> Result<Vec<HealthRecord>, RepositoryError> {
        let store = self.records.lock()?;

        let mut records: Vec<HealthRecord> = store
            .values()
            .filter(|record| record.pet_id == pet_id && query.matches(record))
            .cloned()
            .collect();

        records.sort_by(|a, b| {
            b.date
                .cmp(&a.date)
                .then_with(|| b.created_at.cmp(&a.created_at))
        });

        if let Some(limit) = query.limit {
            records.truncate(limit);
        }

        Ok(records)
    }

    /// Replace a stored health record. Returns false when it does not exist.
    pub async fn update_record(&self, record: &HealthRecord) -> Result<bool, RepositoryError> {
        let mut store = self.records.lock()?;

        match store.get_mut(&record.id) {
            Some(existing) => {
                *existing = record.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove a health record. Returns whether it existed.
    pub async fn delete_record(&self, id: &str) -> Result<bool, RepositoryError> {
        let mut store = self.records.lock()?;
        Ok(store.remove(id).is_some())
    }
}
