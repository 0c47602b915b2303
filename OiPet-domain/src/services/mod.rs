// Domain services
// This module contains business logic implementations.
pub mod health_record;
pub mod pet;

#[cfg(test)]
pub(crate) mod mocks;

use oipet_data::database::DatabasePool;
use oipet_data::repository::{create_repositories, HealthRecordRepository, PetRepository};
use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};

// Re-export service traits and error types
pub use health_record::{HealthRecordService, HealthRecordServiceTrait, HealthServiceError};
pub use pet::{PetService, PetServiceError, PetServiceTrait};

/// Build the pet and health record services over one storage backend.
/// Without a pool both services share a fresh in-memory store.
pub fn create_default_services(
    pool: Option<DatabasePool>,
) -> (PetService<PetRepository>, HealthRecordService<PetRepository, HealthRecordRepository>) {
    let (pets, records) = create_repositories(pool);
    (PetService::new(pets.clone()), HealthRecordService::new(pets, records))
}

/// Category of a service failure, used by the HTTP layer to pick a status code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NotFound,
    AccessDenied,
    Validation,
    Store,
}

/// Flatten validator errors into one message, one `field: messages` entry per
/// field, sorted by field path. Nested structs are reported as `parent.child`.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut entries = Vec::new();
    collect_validation_errors("", errors, &mut entries);
    entries.sort();
    entries.join("; ")
}

fn collect_validation_errors(prefix: &str, errors: &ValidationErrors, entries: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                let messages: Vec<String> = field_errors
                    .iter()
                    .map(|err| match &err.message {
                        Some(msg) => msg.to_string(),
                        None => format!("Invalid {}", path),
                    })
                    .collect();
                entries.push(format!("{}: {}", path, messages.join(", ")));
            }
            ValidationErrorsKind::Struct(inner) => collect_validation_errors(&path, inner, entries),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_validation_errors(&format!("{}[{}]", path, index), inner, entries);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Activity, CreateHealthRecordRequest, Intensity};
    use validator::Validate;

    #[test]
    fn test_validation_message_sorted_and_nested() {
        let request = CreateHealthRecordRequest {
            weight: Some(500.0),
            calories: Some(-1.0),
            activity: Some(Activity {
                activity_type: String::new(),
                duration: 30,
                intensity: Intensity::Low,
            }),
            ..Default::default()
        };

        let message = validation_message(&request.validate().unwrap_err());
        let entries: Vec<&str> = message.split("; ").collect();
        assert_eq!(entries.len(), 3);
        assert!(entries[0].starts_with("activity."), "unexpected entry: {}", entries[0]);
        assert!(entries[0].ends_with("Activity type must be between 1 and 100 characters"));
        assert_eq!(entries[1], "calories: Calories must be between 0 and 10000");
        assert_eq!(entries[2], "weight: Weight must be between 0.1 and 200 kg");
    }
}
