use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Kind of animal
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Species {
    Dog,
    Cat,
    Other,
}

impl Species {
    pub fn as_str(&self) -> &'static str {
        match self {
            Species::Dog => "dog",
            Species::Cat => "cat",
            Species::Other => "other",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Species {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dog" => Ok(Species::Dog),
            "cat" => Ok(Species::Cat),
            "other" => Ok(Species::Other),
            _ => Err(format!("Invalid species: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            _ => Err(format!("Invalid gender: {}", s)),
        }
    }
}

/// A pet, owned by exactly one user for its whole life
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    /// Unique identifier for the pet
    pub id: String,

    /// Identifier of the owning user, fixed at creation
    pub user_id: String,

    pub name: String,

    pub species: Species,

    pub breed: String,

    pub birth_date: NaiveDate,

    /// Weight in kilograms
    pub weight: f64,

    /// Height in centimetres
    pub height: f64,

    pub gender: Gender,

    pub is_neutered: bool,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Request payload for registering a new pet
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePetRequest {
    #[validate(length(min = 1, max = 50, message = "Name must be between 1 and 50 characters"))]
    pub name: String,

    pub species: Species,

    #[validate(length(min = 1, max = 100, message = "Breed must be between 1 and 100 characters"))]
    pub breed: String,

    #[validate(custom = "validate_not_in_future")]
    pub birth_date: NaiveDate,

    #[validate(range(min = 0.1, max = 200.0, message = "Weight must be between 0.1 and 200 kg"))]
    pub weight: f64,

    #[validate(range(min = 1.0, max = 300.0, message = "Height must be between 1 and 300 cm"))]
    pub height: f64,

    pub gender: Gender,

    #[serde(default)]
    pub is_neutered: bool,
}

/// One page of a user's pets
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PetPage {
    pub pets: Vec<Pet>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

fn validate_not_in_future(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date > Utc::now().date_naive() {
        let mut error = ValidationError::new("birth_date_in_future");
        error.message = Some("Birth date cannot be in the future".into());
        return Err(error);
    }
    Ok(())
}
