// mockall doubles for the repository traits
use async_trait::async_trait;
use mockall::mock;

use oipet_data::models::health_record::{HealthRecord, RecordQuery};
use oipet_data::models::pet::Pet;
use oipet_data::repository::{HealthRecordRepositoryTrait, PetRepositoryTrait, RepositoryError};

mock! {
    pub PetRepo {}

    #[async_trait]
    impl PetRepositoryTrait for PetRepo {
        async fn create(&self, pet: Pet) -> Result<Pet, RepositoryError>;
        async fn get_by_id(&self, id: &str) -> Result<Option<Pet>, RepositoryError>;
        async fn list_by_owner(
            &self,
            user_id: &str,
            limit: usize,
            offset: usize,
        ) -> Result<(Vec<Pet>, usize), RepositoryError>;
    }
}

mock! {
    pub HealthRecordRepo {}

    #[async_trait]
    impl HealthRecordRepositoryTrait for HealthRecordRepo {
        async fn create(&self, record: HealthRecord) -> Result<HealthRecord, RepositoryError>;
        async fn get_by_id(&self, id: &str) -> Result<Option<HealthRecord>, RepositoryError>;
        async fn list_by_pet(&self, pet_id: &str, query: RecordQuery) -> Result<Vec<HealthRecord>, RepositoryError>;
        async fn update(&self, record: HealthRecord) -> Result<HealthRecord, RepositoryError>;
        async fn delete(&self, id: &str) -> Result<bool, RepositoryError>;
    }
}
