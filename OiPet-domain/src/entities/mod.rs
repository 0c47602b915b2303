// Domain entities and value objects
pub mod conversions;
pub mod health_record;
pub mod pet;

// Re-export common types for easier imports
pub use health_record::{
    Activity, CreateHealthRecordRequest, HealthRecord, HealthStats, Intensity, RecordRange,
    UpdateHealthRecordRequest,
    WeightEntry, WeightTrend,
};
pub use pet::{CreatePetRequest, Gender, Pet, PetPage, Species};
