//! Structured logging of authentication and authorization outcomes

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Types of authentication events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthEventType {
    /// Bearer token checked by the middleware
    TokenValidation,
    /// Authenticated caller tried to reach a pet or record they do not own
    AccessDenied,
}

impl std::fmt::Display for AuthEventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthEventType::TokenValidation => write!(f, "TOKEN_VALIDATION"),
            AuthEventType::AccessDenied => write!(f, "ACCESS_DENIED"),
        }
    }
}

/// Authentication event record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthEvent {
    pub event_type: AuthEventType,
    /// User ID (if known)
    pub user_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    /// Additional details about the event
    pub details: Option<String>,
    /// The resource being accessed
    pub resource: Option<String>,
    /// Duration of the check in milliseconds
    pub duration_ms: Option<u64>,
    pub auth_method: Option<String>,
}

impl AuthEvent {
    /// Create a new authentication event
    pub fn new(event_type: AuthEventType, user_id: Option<&str>, success: bool) -> Self {
        Self {
            event_type,
            user_id: user_id.map(String::from),
            timestamp: Utc::now(),
            success,
            details: None,
            resource: None,
            duration_ms: None,
            auth_method: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_resource(mut self, resource: impl Into<String>) -> Self {
        self.resource = Some(resource.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_auth_method(mut self, auth_method: impl Into<String>) -> Self {
        self.auth_method = Some(auth_method.into());
        self
    }
}

/// Log an authentication event. Failures are logged at `warn`.
pub fn log_auth_event(event: AuthEvent) {
    let user = event.user_id.as_deref().unwrap_or("anonymous");
    let resource = event.resource.as_deref().unwrap_or("-");
    let details = event.details.as_deref().unwrap_or("");

    if event.success {
        info!(
            event_type = %event.event_type,
            user,
            resource,
            duration_ms = event.duration_ms,
            method = event.auth_method.as_deref(),
            "AUTH-LOG [SUCCESS] {}",
            details
        );
    } else {
        warn!(
            event_type = %event.event_type,
            user,
            resource,
            duration_ms = event.duration_ms,
            method = event.auth_method.as_deref(),
            "AUTH-LOG [FAILURE] {}",
            details
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_auth_event() {
        let event = AuthEvent::new(AuthEventType::AccessDenied, Some("user123"), false)
            .with_details("Pet is owned by another user")
            .with_resource("pet/p1")
            .with_duration(3)
            .with_auth_method("jwt");

        assert_eq!(event.event_type, AuthEventType::AccessDenied);
        assert_eq!(event.user_id, Some("user123".to_string()));
        assert!(!event.success);
        assert_eq!(event.resource, Some("pet/p1".to_string()));
        assert_eq!(event.duration_ms, Some(3));
        assert_eq!(event.auth_method, Some("jwt".to_string()));
    }

    #[test]
    fn test_event_type_display() {
        assert_eq!(AuthEventType::TokenValidation.to_string(), "TOKEN_VALIDATION");
        assert_eq!(AuthEventType::AccessDenied.to_string(), "ACCESS_DENIED");
    }
}
