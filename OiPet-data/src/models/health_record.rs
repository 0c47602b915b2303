use serde::{Deserialize, Serialize};

/// Storage model for a health record
///
/// The activity sub-record is flattened into nullable columns. Dates are
/// fixed-width RFC 3339 UTC strings, so ordering them as text orders them in
/// time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Unique identifier for the record
    pub id: String,

    /// Identifier of the pet this record belongs to
    pub pet_id: String,

    /// When the observation was made
    pub date: String,

    /// Optional weight in kilograms
    pub weight: Option<f64>,

    /// Optional height in centimetres
    pub height: Option<f64>,

    /// Optional activity type (walk, play, ...)
    pub activity_type: Option<String>,

    /// Optional activity duration in minutes
    pub activity_duration: Option<u32>,

    /// Optional activity intensity (low, medium, high)
    pub activity_intensity: Option<String>,

    /// Optional calories
    pub calories: Option<f64>,

    /// Optional free-form notes
    pub notes: Option<String>,

    /// When the record was created
    pub created_at: String,

    /// When the record was last updated
    pub updated_at: String,
}

/// Filters for listing the records of a pet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Inclusive lower bound on `date`
    pub start_date: Option<String>,

    /// Inclusive upper bound on `date`
    pub end_date: Option<String>,

    /// Maximum number of records returned
    pub limit: Option<usize>,
}

impl RecordQuery {
    /// Whether `record` falls inside the date window
    pub fn matches(&self, record: &HealthRecord) -> bool {
        if let Some(start) = &self.start_date {
            if record.date < *start {
                return false;
            }
        }

        if let Some(end) = &self.end_date {
            if record.date > *end {
                return false;
            }
        }

        true
    }
}
