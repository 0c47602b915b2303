use async_trait::async_trait;
use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use validator::Validate;

use oipet_data::models::health_record::RecordQuery;
use oipet_data::repository::{HealthRecordRepositoryTrait, PetRepositoryTrait, RepositoryError};

use crate::auth::logging::{log_auth_event, AuthEvent, AuthEventType};
use crate::entities::conversions;
use crate::entities::health_record::{
    CreateHealthRecordRequest, HealthRecord, HealthStats, RecordRange, UpdateHealthRecordRequest, WeightEntry,
    WeightTrend,
};
use super::{validation_message, ErrorKind};

/// Most records returned when listing the records of one pet
pub const MAX_RECORDS_PER_PET: usize = 50;

/// Default window for health statistics, in days
pub const DEFAULT_STATS_DAYS: u32 = 30;

/// Default window for the weight history, in days
pub const DEFAULT_WEIGHT_HISTORY_DAYS: u32 = 90;

/// Longest window accepted for statistics and weight history
pub const MAX_PERIOD_DAYS: u32 = 365;

/// Weight change, in kilograms, beyond which a trend is reported
const WEIGHT_TREND_THRESHOLD: f64 = 0.5;

/// Health record service errors
#[derive(Debug, Error)]
pub enum HealthServiceError {
    /// The pet or record does not exist
    #[error("{0}")]
    NotFound(String),

    /// The caller does not own the pet
    #[error("{0}")]
    AccessDenied(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Store(String),
}

impl HealthServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            HealthServiceError::NotFound(_) => ErrorKind::NotFound,
            HealthServiceError::AccessDenied(_) => ErrorKind::AccessDenied,
            HealthServiceError::Validation(_) => ErrorKind::Validation,
            HealthServiceError::Store(_) => ErrorKind::Store,
        }
    }
}

impl From<RepositoryError> for HealthServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(_) => HealthServiceError::NotFound("Health record not found".to_string()),
            other => {
                error!("Health record storage failure: {}", other);
                HealthServiceError::Store(other.to_string())
            }
        }
    }
}

/// Trait for health record operations. Every call re-checks that the caller
/// owns the pet the records belong to.
#[async_trait]
pub trait HealthRecordServiceTrait: Send + Sync {
    /// Create a record for a pet owned by `user_id`
    async fn create_record(
        &self,
        pet_id: &str,
        user_id: &str,
        request: CreateHealthRecordRequest,
    ) -> Result<HealthRecord, HealthServiceError>;

    /// The most recent records of a pet inside `range`, newest first
    async fn list_records(
        &self,
        pet_id: &str,
        user_id: &str,
        range: RecordRange,
    ) -> Result<Vec<HealthRecord>, HealthServiceError>;

    async fn get_record(&self, record_id: &str, user_id: &str) -> Result<HealthRecord, HealthServiceError>;

    /// Apply a partial update to a record
    async fn update_record(
        &self,
        record_id: &str,
        user_id: &str,
        patch: UpdateHealthRecordRequest,
    ) -> Result<HealthRecord, HealthServiceError>;

    async fn delete_record(&self, record_id: &str, user_id: &str) -> Result<(), HealthServiceError>;

    /// Aggregates over the last `days` days (30 when not given)
    async fn get_stats(&self, pet_id: &str, user_id: &str, days: Option<u32>) -> Result<HealthStats, HealthServiceError>;

    /// Recorded weights over the last `days` days (90 when not given), oldest first
    async fn get_weight_history(
        &self,
        pet_id: &str,
        user_id: &str,
        days: Option<u32>,
    ) -> Result<Vec<WeightEntry>, HealthServiceError>;
}

/// Health record service with injected pet and record repositories
pub struct HealthRecordService<P: PetRepositoryTrait, R: HealthRecordRepositoryTrait> {
    pets: P,
    records: R,
}

impl<P: PetRepositoryTrait, R: HealthRecordRepositoryTrait> HealthRecordService<P, R> {
    /// Create a new health record service
    pub fn new(pets: P, records: R) -> Self {
        Self { pets, records }
    }

    /// Check that `pet_id` exists and belongs to `user_id`
    async fn authorize_pet(&self, pet_id: &str, user_id: &str) -> Result<(), HealthServiceError> {
        let pet = self
            .pets
            .get_by_id(pet_id)
            .await?
            .ok_or_else(|| HealthServiceError::NotFound("Pet not found".to_string()))?;

        if pet.user_id != user_id {
            return Err(deny(user_id, &format!("pet/{}", pet_id)));
        }

        Ok(())
    }

    /// Load a record and check that its pet belongs to `user_id`.
    /// A record whose pet is gone is treated as not owned by anyone.
    async fn authorize_record(&self, record_id: &str, user_id: &str) -> Result<HealthRecord, HealthServiceError> {
        let record = self
            .records
            .get_by_id(record_id)
            .await?
            .ok_or_else(|| HealthServiceError::NotFound("Health record not found".to_string()))?;

        let resource = format!("health/{}", record_id);
        match self.pets.get_by_id(&record.pet_id).await? {
            Some(pet) if pet.user_id == user_id => to_domain(record),
            Some(_) => Err(deny(user_id, &resource)),
            None => {
                warn!("Health record {} references missing pet {}", record_id, record.pet_id);
                Err(deny(user_id, &resource))
            }
        }
    }

    /// Records of a pet dated within the last `days` days, newest first
    async fn records_since(&self, pet_id: &str, days: u32) -> Result<Vec<HealthRecord>, HealthServiceError> {
        let start = Utc::now() - Duration::days(i64::from(days));
        let query = RecordQuery {
            start_date: Some(conversions::format_timestamp(&start)),
            ..RecordQuery::default()
        };

        self.records
            .list_by_pet(pet_id, query)
            .await?
            .into_iter()
            .map(to_domain)
            .collect()
    }
}

#[async_trait]
impl<P: PetRepositoryTrait, R: HealthRecordRepositoryTrait> HealthRecordServiceTrait for HealthRecordService<P, R> {
    async fn create_record(
        &self,
        pet_id: &str,
        user_id: &str,
        request: CreateHealthRecordRequest,
    ) -> Result<HealthRecord, HealthServiceError> {
        self.authorize_pet(pet_id, user_id).await?;

        request
            .validate()
            .map_err(|e| HealthServiceError::Validation(validation_message(&e)))?;

        let now = Utc::now();
        let record = HealthRecord {
            id: Uuid::new_v4().to_string(),
            pet_id: pet_id.to_string(),
            date: request.date.unwrap_or(now),
            weight: request.weight,
            height: request.height,
            activity: request.activity,
            calories: request.calories,
            notes: request.notes,
            created_at: now,
            updated_at: now,
        };

        let stored = self.records.create(conversions::convert_to_data_record(&record)).await?;
        info!("Created health record {} for pet {}", stored.id, pet_id);

        to_domain(stored)
    }

    async fn list_records(
        &self,
        pet_id: &str,
        user_id: &str,
        range: RecordRange,
    ) -> Result<Vec<HealthRecord>, HealthServiceError> {
        self.authorize_pet(pet_id, user_id).await?;

        if !range.is_ordered() {
            return Err(HealthServiceError::Validation(
                "startDate must not be after endDate".to_string(),
            ));
        }

        let query = RecordQuery {
            start_date: range.start_date.as_ref().map(conversions::format_timestamp),
            end_date: range.end_date.as_ref().map(conversions::format_timestamp),
            limit: Some(MAX_RECORDS_PER_PET),
        };

        let records = self.records.list_by_pet(pet_id, query).await?;
        debug!("Found {} health records for pet {}", records.len(), pet_id);

        records.into_iter().map(to_domain).collect()
    }

    async fn get_record(&self, record_id: &str, user_id: &str) -> Result<HealthRecord, HealthServiceError> {
        self.authorize_record(record_id, user_id).await
    }

    async fn update_record(
        &self,
        record_id: &str,
        user_id: &str,
        patch: UpdateHealthRecordRequest,
    ) -> Result<HealthRecord, HealthServiceError> {
        let mut record = self.authorize_record(record_id, user_id).await?;

        patch
            .validate()
            .map_err(|e| HealthServiceError::Validation(validation_message(&e)))?;

        patch.apply_to(&mut record);
        record.updated_at = Utc::now();

        let stored = self.records.update(conversions::convert_to_data_record(&record)).await?;
        info!("Updated health record {}", record_id);

        to_domain(stored)
    }

    async fn delete_record(&self, record_id: &str, user_id: &str) -> Result<(), HealthServiceError> {
        self.authorize_record(record_id, user_id).await?;

        if !self.records.delete(record_id).await? {
            return Err(HealthServiceError::NotFound("Health record not found".to_string()));
        }

        info!("Deleted health record {}", record_id);
        Ok(())
    }

    async fn get_stats(&self, pet_id: &str, user_id: &str, days: Option<u32>) -> Result<HealthStats, HealthServiceError> {
        let days = resolve_days(days, DEFAULT_STATS_DAYS)?;
        self.authorize_pet(pet_id, user_id).await?;

        let records = self.records_since(pet_id, days).await?;
        Ok(calculate_stats(&records, days))
    }

    async fn get_weight_history(
        &self,
        pet_id: &str,
        user_id: &str,
        days: Option<u32>,
    ) -> Result<Vec<WeightEntry>, HealthServiceError> {
        let days = resolve_days(days, DEFAULT_WEIGHT_HISTORY_DAYS)?;
        self.authorize_pet(pet_id, user_id).await?;

        let records = self.records_since(pet_id, days).await?;
        Ok(weight_curve(&records))
    }
}

fn to_domain(record: oipet_data::models::health_record::HealthRecord) -> Result<HealthRecord, HealthServiceError> {
    conversions::convert_to_domain_record(record).map_err(|e| {
        error!("Failed to read stored health record: {}", e);
        HealthServiceError::Store(e)
    })
}

fn deny(user_id: &str, resource: &str) -> HealthServiceError {
    warn!("User {} denied access to {}", user_id, resource);

    let event = AuthEvent::new(AuthEventType::AccessDenied, Some(user_id), false)
        .with_details("Pet is owned by another user")
        .with_resource(resource);
    log_auth_event(event);

    HealthServiceError::AccessDenied("Access denied".to_string())
}

fn resolve_days(days: Option<u32>, default: u32) -> Result<u32, HealthServiceError> {
    match days {
        None => Ok(default),
        Some(d) if (1..=MAX_PERIOD_DAYS).contains(&d) => Ok(d),
        Some(d) => Err(HealthServiceError::Validation(format!(
            "days must be between 1 and {}, got {}",
            MAX_PERIOD_DAYS, d
        ))),
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `(date, weight)` points of the records that carry a weight, oldest first
fn weight_curve(records: &[HealthRecord]) -> Vec<WeightEntry> {
    let mut curve: Vec<WeightEntry> = records
        .iter()
        .filter_map(|r| r.weight.map(|weight| WeightEntry { date: r.date, weight }))
        .collect();
    curve.sort_by(|a, b| a.date.cmp(&b.date));
    curve
}

fn calculate_stats(records: &[HealthRecord], days: u32) -> HealthStats {
    let weights = weight_curve(records);

    let average_weight = if weights.is_empty() {
        0.0
    } else {
        round_to_tenth(weights.iter().map(|w| w.weight).sum::<f64>() / weights.len() as f64)
    };

    let weight_trend = match (weights.first(), weights.last()) {
        (Some(first), Some(last)) if weights.len() > 1 => {
            let difference = last.weight - first.weight;
            if difference > WEIGHT_TREND_THRESHOLD {
                WeightTrend::Increasing
            } else if difference < -WEIGHT_TREND_THRESHOLD {
                WeightTrend::Decreasing
            } else {
                WeightTrend::Stable
            }
        }
        _ => WeightTrend::Stable,
    };

    let activities: Vec<_> = records.iter().filter_map(|r| r.activity.as_ref()).collect();

    HealthStats {
        period_days: days,
        total_records: records.len(),
        average_weight,
        weight_trend,
        total_activities: activities.len(),
        total_activity_duration: activities.iter().map(|a| a.duration).sum(),
        total_calories: round_to_tenth(records.iter().filter_map(|r| r.calories).sum()),
    }
}
