use async_trait::async_trait;
use chrono::Utc;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

use oipet_data::repository::{PetRepositoryTrait, RepositoryError};

use crate::entities::conversions;
use crate::entities::pet::{CreatePetRequest, Pet, PetPage};
use super::{validation_message, ErrorKind};

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Largest page a caller can ask for
pub const MAX_PAGE_SIZE: usize = 100;

/// Largest offset the stores can represent
pub const MAX_OFFSET: usize = i64::MAX as usize;

/// Pet service errors
#[derive(Debug, Error)]
pub enum PetServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    AccessDenied(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Store(String),
}

impl PetServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PetServiceError::NotFound(_) => ErrorKind::NotFound,
            PetServiceError::AccessDenied(_) => ErrorKind::AccessDenied,
            PetServiceError::Validation(_) => ErrorKind::Validation,
            PetServiceError::Store(_) => ErrorKind::Store,
        }
    }
}

impl From<RepositoryError> for PetServiceError {
    fn from(err: RepositoryError) -> Self {
        error!("Pet storage failure: {}", err);
        PetServiceError::Store(err.to_string())
    }
}

/// Trait for pet operations, always scoped to the calling user
#[async_trait]
pub trait PetServiceTrait: Send + Sync {
    /// Register a new pet owned by `user_id`
    async fn create_pet(&self, user_id: &str, request: CreatePetRequest) -> Result<Pet, PetServiceError>;

    /// A page of the caller's pets, newest first
    async fn list_pets(
        &self,
        user_id: &str,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<PetPage, PetServiceError>;

    async fn get_pet(&self, pet_id: &str, user_id: &str) -> Result<Pet, PetServiceError>;
}

/// Pet service with an injected pet repository
pub struct PetService<P: PetRepositoryTrait> {
    repository: P,
}

impl<P: PetRepositoryTrait> PetService<P> {
    /// Create a new pet service
    pub fn new(repository: P) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<P: PetRepositoryTrait> PetServiceTrait for PetService<P> {
    async fn create_pet(&self, user_id: &str, request: CreatePetRequest) -> Result<Pet, PetServiceError> {
        request
            .validate()
            .map_err(|e| PetServiceError::Validation(validation_message(&e)))?;

        let now = Utc::now();
        let pet = Pet {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: request.name,
            species: request.species,
            breed: request.breed,
            birth_date: request.birth_date,
            weight: request.weight,
            height: request.height,
            gender: request.gender,
            is_neutered: request.is_neutered,
            created_at: now,
            updated_at: now,
        };

        let stored = self.repository.create(conversions::convert_to_data_pet(&pet)).await?;
        info!("Created pet {} for user {}", stored.id, user_id);

        conversions::convert_to_domain_pet(stored).map_err(PetServiceError::Store)
    }

    async fn list_pets(
        &self,
        user_id: &str,
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> Result<PetPage, PetServiceError> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0).min(MAX_OFFSET);

        let (pets, total) = self.repository.list_by_owner(user_id, limit, offset).await?;

        let pets = pets
            .into_iter()
            .map(conversions::convert_to_domain_pet)
            .collect::<Result<Vec<_>, _>>()
            .map_err(PetServiceError::Store)?;

        Ok(PetPage {
            pets,
            total,
            limit,
            offset,
        })
    }

    async fn get_pet(&self, pet_id: &str, user_id: &str) -> Result<Pet, PetServiceError> {
        let pet = self
            .repository
            .get_by_id(pet_id)
            .await?
            .ok_or_else(|| PetServiceError::NotFound("Pet not found".to_string()))?;

        if pet.user_id != user_id {
            warn!("User {} denied access to pet {}", user_id, pet_id);
            return Err(PetServiceError::AccessDenied("Access denied".to_string()));
        }

        conversions::convert_to_domain_pet(pet).map_err(PetServiceError::Store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::pet::{Gender, Species};
    use crate::services::mocks::MockPetRepo;
    use chrono::NaiveDate;
    use oipet_data::repository::{InMemoryStorage, PetRepository};

    fn request(name: &str) -> CreatePetRequest {
        CreatePetRequest {
            name: name.to_string(),
            species: Species::Cat,
            breed: "Siamese".to_string(),
            birth_date: NaiveDate::from_ymd_opt(2021, 6, 1).unwrap(),
            weight: 4.2,
            height: 25.0,
            gender: Gender::Female,
            is_neutered: false,
        }
    }

    fn service() -> PetService<PetRepository> {
        PetService::new(PetRepository::in_memory(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn test_create_pet_sets_owner() {
        let service = service();
        let pet = service.create_pet("u1", request("Mia")).await.unwrap();

        assert_eq!(pet.user_id, "u1");
        assert_eq!(pet.species, Species::Cat);
        assert_eq!(service.get_pet(&pet.id, "u1").await.unwrap(), pet);
    }

    #[tokio::test]
    async fn test_create_pet_rejects_invalid_request() {
        let err = service().create_pet("u1", request("")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("Name"));
    }

    #[tokio::test]
    async fn test_get_pet_of_other_user_is_denied() {
        let service = service();
        let pet = service.create_pet("u1", request("Mia")).await.unwrap();

        let err = service.get_pet(&pet.id, "u2").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AccessDenied);

        let err = service.get_pet("missing", "u1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_list_pets_scoped_and_paged() {
        let service = service();
        for name in ["A", "B", "C"] {
            service.create_pet("u1", request(name)).await.unwrap();
        }
        service.create_pet("u2", request("Other")).await.unwrap();

        let page = service.list_pets("u1", Some(2), None).await.unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.pets.len(), 2);
        assert!(page.pets.iter().all(|p| p.user_id == "u1"));

        let page = service.list_pets("u1", None, Some(2)).await.unwrap();
        assert_eq!(page.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(page.pets.len(), 1);
    }

    #[tokio::test]
    async fn test_list_pets_caps_limit() {
        let mut repo = MockPetRepo::new();
        repo.expect_list_by_owner()
            .withf(|_, limit, _| *limit == MAX_PAGE_SIZE)
            .returning(|_, _, _| Ok((Vec::new(), 0)));

        let page = PetService::new(repo).list_pets("u1", Some(1000), None).await.unwrap();
        assert_eq!(page.limit, MAX_PAGE_SIZE);
    }

    #[tokio::test]
    async fn test_list_pets_clamps_huge_offset() {
        let mut repo = MockPetRepo::new();
        repo.expect_list_by_owner()
            .withf(|_, _, offset| *offset == MAX_OFFSET)
            .returning(|_, _, _| Ok((Vec::new(), 1)));

        let page = PetService::new(repo).list_pets("u1", None, Some(usize::MAX)).await.unwrap();
        assert_eq!(page.offset, MAX_OFFSET);
        assert!(page.pets.is_empty());
    }

    #[tokio::test]
    async fn test_huge_offset_is_an_empty_page() {
        let service = service();
        service.create_pet("u1", request("A")).await.unwrap();

        let page = service.list_pets("u1", None, Some(MAX_OFFSET + 1)).await.unwrap();
        assert_eq!(page.total, 1);
        assert!(page.pets.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_maps_to_store_error() {
        let mut repo = MockPetRepo::new();
        repo.expect_get_by_id()
            .returning(|_| Err(RepositoryError::Lock("poisoned".to_string())));

        let err = PetService::new(repo).get_pet("p1", "u1").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Store);
    }
}
