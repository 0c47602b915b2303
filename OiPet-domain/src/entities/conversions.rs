use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use oipet_data::models::health_record::HealthRecord as DataHealthRecord;
use oipet_data::models::pet::Pet as DataPet;

use crate::entities::health_record::{Activity, HealthRecord};
use crate::entities::pet::Pet;

// Conversion functions between domain entities and data models.
// These functions follow the pattern convert_to_[target_layer]_[model_name].

/// Format a timestamp the way the store keeps it: fixed-width RFC 3339 in UTC,
/// so that comparing the strings compares the instants.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse a stored timestamp back into a UTC instant
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| format!("Invalid stored timestamp '{}': {}", value, e))
}

/// Convert from domain entity to data model for a pet
pub fn convert_to_data_pet(pet: &Pet) -> DataPet {
    DataPet {
        id: pet.id.clone(),
        user_id: pet.user_id.clone(),
        name: pet.name.clone(),
        species: pet.species.to_string(),
        breed: pet.breed.clone(),
        birth_date: pet.birth_date.format("%Y-%m-%d").to_string(),
        weight: pet.weight,
        height: pet.height,
        gender: pet.gender.to_string(),
        is_neutered: pet.is_neutered,
        created_at: format_timestamp(&pet.created_at),
        updated_at: format_timestamp(&pet.updated_at),
    }
}

/// Convert from data model to domain entity for a pet
pub fn convert_to_domain_pet(pet: DataPet) -> Result<Pet, String> {
    let birth_date = NaiveDate::parse_from_str(&pet.birth_date, "%Y-%m-%d")
        .map_err(|e| format!("Invalid stored birth date '{}': {}", pet.birth_date, e))?;

    Ok(Pet {
        species: pet.species.parse()?,
        gender: pet.gender.parse()?,
        birth_date,
        created_at: parse_timestamp(&pet.created_at)?,
        updated_at: parse_timestamp(&pet.updated_at)?,
        id: pet.id,
        user_id: pet.user_id,
        name: pet.name,
        breed: pet.breed,
        weight: pet.weight,
        height: pet.height,
        is_neutered: pet.is_neutered,
    })
}

/// Convert from domain entity to data model for a health record.
/// The activity is flattened into its three columns.
pub fn convert_to_data_record(record: &HealthRecord) -> DataHealthRecord {
    let activity = record.activity.as_ref();

    DataHealthRecord {
        id: record.id.clone(),
        pet_id: record.pet_id.clone(),
        date: format_timestamp(&record.date),
        weight: record.weight,
        height: record.height,
        activity_type: activity.map(|a| a.activity_type.clone()),
        activity_duration: activity.map(|a| a.duration),
        activity_intensity: activity.map(|a| a.intensity.to_string()),
        calories: record.calories,
        notes: record.notes.clone(),
        created_at: format_timestamp(&record.created_at),
        updated_at: format_timestamp(&record.updated_at),
    }
}

/// Convert from data model to domain entity for a health record
pub fn convert_to_domain_record(record: DataHealthRecord) -> Result<HealthRecord, String> {
    let activity = match (record.activity_type, record.activity_duration, record.activity_intensity) {
        (Some(activity_type), Some(duration), Some(intensity)) => Some(Activity {
            activity_type,
            duration,
            intensity: intensity.parse()?,
        }),
        (None, None, None) => None,
        _ => return Err(format!("Incomplete activity stored for health record {}", record.id)),
    };

    Ok(HealthRecord {
        date: parse_timestamp(&record.date)?,
        created_at: parse_timestamp(&record.created_at)?,
        updated_at: parse_timestamp(&record.updated_at)?,
        id: record.id,
        pet_id: record.pet_id,
        weight: record.weight,
        height: record.height,
        activity,
        calories: record.calories,
        notes: record.notes,
    })
}
