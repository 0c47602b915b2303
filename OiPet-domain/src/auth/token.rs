use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;
use tracing::debug;

use crate::auth::{AuthConfig, Claims};

/// Security errors for token verification
#[derive(Debug, Error)]
pub enum SecurityError {
    /// JWT validation error
    #[error("Token validation error: {0}")]
    TokenValidation(String),

    #[error("Token has expired")]
    TokenExpired,

    /// Invalid token structure
    #[error("Invalid token format")]
    InvalidToken,

    #[error("Invalid token issuer")]
    InvalidIssuer,

    #[error("Token has no subject")]
    MissingSubject,
}

/// Verify an HS256 token against `config` and return its claims.
///
/// Tokens are minted by another service; this only checks signature, expiry
/// and issuer.
pub fn validate_token(token: &str, config: &AuthConfig) -> Result<Claims, SecurityError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_issuer(&[config.issuer.as_str()]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => SecurityError::TokenExpired,
        jsonwebtoken::errors::ErrorKind::InvalidToken => SecurityError::InvalidToken,
        jsonwebtoken::errors::ErrorKind::InvalidIssuer => SecurityError::InvalidIssuer,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => {
            SecurityError::TokenValidation("Invalid signature".to_string())
        }
        _ => SecurityError::TokenValidation(e.to_string()),
    })?;

    if token_data.claims.sub.trim().is_empty() {
        return Err(SecurityError::MissingSubject);
    }

    debug!("Token validated for user {}", token_data.claims.sub);
    Ok(token_data.claims)
}
