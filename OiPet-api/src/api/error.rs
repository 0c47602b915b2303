use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use oipet_domain::services::{ErrorKind, HealthServiceError, PetServiceError};

use crate::entities::ApiResponse;

/// Error returned by API handlers, rendered as an enveloped JSON body
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn from_kind(kind: ErrorKind, message: String) -> Self {
        match kind {
            ErrorKind::NotFound => ApiError::NotFound(message),
            ErrorKind::AccessDenied => ApiError::Forbidden(message),
            ErrorKind::Validation => ApiError::BadRequest(message),
            ErrorKind::Store => ApiError::Internal(message),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<HealthServiceError> for ApiError {
    fn from(err: HealthServiceError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

impl From<PetServiceError> for ApiError {
    fn from(err: PetServiceError) -> Self {
        Self::from_kind(err.kind(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Storage details stay in the logs
        let (label, message) = match self {
            ApiError::NotFound(msg) => ("Not Found", msg),
            ApiError::Forbidden(msg) => ("Forbidden", msg),
            ApiError::BadRequest(msg) => ("Bad Request", msg),
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                ("Internal Server Error", "An unexpected error occurred".to_string())
            }
        };

        (status, Json(ApiResponse::failure(label, message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds_map_to_status_codes() {
        let cases = [
            (HealthServiceError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (HealthServiceError::AccessDenied("x".into()), StatusCode::FORBIDDEN),
            (HealthServiceError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (HealthServiceError::Store("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn test_internal_error_hides_details() {
        let response = ApiError::Internal("disk I/O error at /var/lib".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
