use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use validator::Validate;

/// Effort level of an activity
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Low,
    Medium,
    High,
}

impl Intensity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intensity::Low => "low",
            Intensity::Medium => "medium",
            Intensity::High => "high",
        }
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intensity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Intensity::Low),
            "medium" => Ok(Intensity::Medium),
            "high" => Ok(Intensity::High),
            _ => Err(format!("Invalid activity intensity: {}", s)),
        }
    }
}

/// Activity performed by the pet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct Activity {
    /// Kind of activity (walk, play, ...)
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 100, message = "Activity type must be between 1 and 100 characters"))]
    pub activity_type: String,

    /// Duration in minutes
    #[validate(range(min = 1, max = 1440, message = "Activity duration must be between 1 and 1440 minutes"))]
    pub duration: u32,

    pub intensity: Intensity,
}

/// A dated health observation about one pet
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    /// Unique identifier for the record
    pub id: String,

    /// Pet this record belongs to. Ownership follows the pet.
    pub pet_id: String,

    /// When the observation was made
    pub date: DateTime<Utc>,

    /// Weight in kilograms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Height in centimetres
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a health record
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateHealthRecordRequest {
    /// When the observation was made. Defaults to the current time if not provided.
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<DateTime<Utc>>,

    #[validate(range(min = 0.1, max = 200.0, message = "Weight must be between 0.1 and 200 kg"))]
    pub weight: Option<f64>,

    #[validate(range(min = 1.0, max = 300.0, message = "Height must be between 1 and 300 cm"))]
    pub height: Option<f64>,

    #[validate]
    pub activity: Option<Activity>,

    #[validate(range(min = 0.0, max = 10000.0, message = "Calories must be between 0 and 10000"))]
    pub calories: Option<f64>,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

/// Partial update of a health record
///
/// Only the fields listed here may change. Any other key, including `id`,
/// `petId` and the timestamps, fails deserialization. A JSON `null` is treated
/// the same as an absent key and leaves the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateHealthRecordRequest {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub date: Option<DateTime<Utc>>,

    #[validate(range(min = 0.1, max = 200.0, message = "Weight must be between 0.1 and 200 kg"))]
    pub weight: Option<f64>,

    #[validate(range(min = 1.0, max = 300.0, message = "Height must be between 1 and 300 cm"))]
    pub height: Option<f64>,

    #[validate]
    pub activity: Option<Activity>,

    #[validate(range(min = 0.0, max = 10000.0, message = "Calories must be between 0 and 10000"))]
    pub calories: Option<f64>,

    #[validate(length(max = 1000, message = "Notes cannot exceed 1000 characters"))]
    pub notes: Option<String>,
}

impl UpdateHealthRecordRequest {
    /// Overwrite every field of `record` that this patch carries
    pub fn apply_to(self, record: &mut HealthRecord) {
        if let Some(date) = self.date {
            record.date = date;
        }
        if let Some(weight) = self.weight {
            record.weight = Some(weight);
        }
        if let Some(height) = self.height {
            record.height = Some(height);
        }
        if let Some(activity) = self.activity {
            record.activity = Some(activity);
        }
        if let Some(calories) = self.calories {
            record.calories = Some(calories);
        }
        if let Some(notes) = self.notes {
            record.notes = Some(notes);
        }
    }
}

/// Direction of the weight curve over a period
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum WeightTrend {
    Increasing,
    Decreasing,
    Stable,
}

/// Aggregates over the records of a pet in a time window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HealthStats {
    pub period_days: u32,
    pub total_records: usize,
    /// Mean of the recorded weights, rounded to one decimal. 0 when none.
    pub average_weight: f64,
    pub weight_trend: WeightTrend,
    pub total_activities: usize,
    /// Sum of activity durations in minutes
    pub total_activity_duration: u32,
    pub total_calories: f64,
}

/// One point of a weight curve
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightEntry {
    pub date: DateTime<Utc>,
    pub weight: f64,
}

/// Optional date window for listing records. Both bounds are inclusive.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordRange {
    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub start_date: Option<DateTime<Utc>>,

    #[serde(default, deserialize_with = "deserialize_optional_date")]
    pub end_date: Option<DateTime<Utc>>,
}

impl RecordRange {
    /// False when both bounds are set and the start falls after the end
    pub fn is_ordered(&self) -> bool {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => start <= end,
            _ => true,
        }
    }
}

/// Parse `YYYY-MM-DD` (midnight UTC) or an RFC 3339 timestamp
pub fn parse_flexible_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;

    match raw {
        None => Ok(None),
        Some(value) => parse_flexible_date(&value)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date '{}', expected YYYY-MM-DD or RFC 3339", value))),
    }
}
