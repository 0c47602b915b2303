// Storage models
pub mod health_record;
pub mod pet;
