use serde::{Deserialize, Serialize};

/// Storage model for a pet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    /// Unique identifier for the pet
    pub id: String,

    /// Identifier of the owning user
    pub user_id: String,

    /// Pet name
    pub name: String,

    /// Species (dog, cat, other)
    pub species: String,

    /// Breed
    pub breed: String,

    /// Birth date as YYYY-MM-DD
    pub birth_date: String,

    /// Weight in kilograms
    pub weight: f64,

    /// Height in centimetres
    pub height: f64,

    /// Gender (male, female)
    pub gender: String,

    /// Whether the pet is neutered
    pub is_neutered: bool,

    /// When the pet was created (RFC 3339)
    pub created_at: String,

    /// When the pet was last updated (RFC 3339)
    pub updated_at: String,
}
