// Testing utilities for crates that build on the domain layer
// This module is only available when the "mock" feature is enabled

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};

use crate::auth::token::SecurityError;
use crate::auth::{AuthConfig, Claims};
use crate::entities::health_record::{
    CreateHealthRecordRequest, HealthRecord, HealthStats, RecordRange, UpdateHealthRecordRequest, WeightEntry,
};
use crate::services::health_record::{HealthRecordServiceTrait, HealthServiceError};
use crate::services::ErrorKind;

/// Sign a token for `user_id` that `config` accepts, valid for `ttl_minutes`.
/// A negative ttl yields an already expired token.
pub fn issue_token(config: &AuthConfig, user_id: &str, ttl_minutes: i64) -> Result<String, SecurityError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        iss: config.issuer.clone(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(ttl_minutes)).timestamp(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(|e| SecurityError::TokenValidation(e.to_string()))
}

/// Health record service whose every operation fails with the same kind of error
#[derive(Debug, Clone, Copy)]
pub struct FailingHealthRecordService {
    kind: ErrorKind,
}

impl FailingHealthRecordService {
    pub fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    fn error(&self) -> HealthServiceError {
        let message = "mock is configured to fail".to_string();
        match self.kind {
            ErrorKind::NotFound => HealthServiceError::NotFound(message),
            ErrorKind::AccessDenied => HealthServiceError::AccessDenied(message),
            ErrorKind::Validation => HealthServiceError::Validation(message),
            ErrorKind::Store => HealthServiceError::Store(message),
        }
    }
}

#[async_trait]
impl HealthRecordServiceTrait for FailingHealthRecordService {
    async fn create_record(
        &self,
        _pet_id: &str,
        _user_id: &str,
        _request: CreateHealthRecordRequest,
    ) -> Result<HealthRecord, HealthServiceError> {
        Err(self.error())
    }

    async fn list_records(
        &self,
        _pet_id: &str,
        _user_id: &str,
        _range: RecordRange,
    ) -> Result<Vec<HealthRecord>, HealthServiceError> {
        Err(self.error())
    }

    async fn get_record(&self, _record_id: &str, _user_id: &str) -> Result<HealthRecord, HealthServiceError> {
        Err(self.error())
    }

    async fn update_record(
        &self,
        _record_id: &str,
        _user_id: &str,
        _patch: UpdateHealthRecordRequest,
    ) -> Result<HealthRecord, HealthServiceError> {
        Err(self.error())
    }

    async fn delete_record(&self, _record_id: &str, _user_id: &str) -> Result<(), HealthServiceError> {
        Err(self.error())
    }

    async fn get_stats(&self, _pet_id: &str, _user_id: &str, _days: Option<u32>) -> Result<HealthStats, HealthServiceError> {
        Err(self.error())
    }

    async fn get_weight_history(
        &self,
        _pet_id: &str,
        _user_id: &str,
        _days: Option<u32>,
    ) -> Result<Vec<WeightEntry>, HealthServiceError> {
        Err(self.error())
    }
}
