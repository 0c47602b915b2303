//! Authentication module for the OiPet Saúde API
//!
//! Verifies bearer tokens on protected routes and hands the caller's user id
//! to the handlers through request extensions.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Method, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, warn};

use crate::auth::logging::{log_auth_event, AuthEvent, AuthEventType};
use crate::auth::token::SecurityError;

pub mod logging;
pub mod token;

/// Default issuer expected in incoming tokens
pub const DEFAULT_ISSUER: &str = "oipet-api";

/// Token verification settings
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 shared secret
    pub jwt_secret: String,
    /// Required `iss` claim
    pub issuer: String,
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            issuer: issuer.into(),
        }
    }
}

/// Authentication claims for JSON Web Tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Issued at (as timestamp)
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Caller identity placed in the request extensions by [`auth_middleware`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

/// Authentication middleware for protected routes
pub async fn auth_middleware(
    State(config): State<Arc<AuthConfig>>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let request_path = req.uri().path().to_string();
    let start_time = std::time::Instant::now();

    let token = match bearer_token(&req) {
        Ok(token) => token,
        Err(reason) => {
            debug!("Rejecting request to {}: {}", request_path, reason);

            let event = AuthEvent::new(AuthEventType::TokenValidation, None, false)
                .with_details(reason)
                .with_resource(request_path)
                .with_duration(start_time.elapsed().as_millis() as u64)
                .with_auth_method("jwt");
            log_auth_event(event);

            return unauthorized(reason);
        }
    };

    match token::validate_token(token, &config) {
        Ok(claims) => {
            let event = AuthEvent::new(AuthEventType::TokenValidation, Some(&claims.sub), true)
                .with_resource(request_path)
                .with_duration(start_time.elapsed().as_millis() as u64)
                .with_auth_method("jwt");
            log_auth_event(event);

            req.extensions_mut().insert(AuthenticatedUser {
                user_id: claims.sub.clone(),
            });
            req.extensions_mut().insert(claims);

            next.run(req).await
        }
        Err(e) => {
            warn!("Token rejected: {}", e);

            let event = AuthEvent::new(AuthEventType::TokenValidation, None, false)
                .with_details(e.to_string())
                .with_resource(request_path)
                .with_duration(start_time.elapsed().as_millis() as u64)
                .with_auth_method("jwt");
            log_auth_event(event);

            let message = match e {
                SecurityError::TokenExpired => "Token has expired",
                _ => "Invalid token",
            };
            unauthorized(message)
        }
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header
fn bearer_token(req: &Request<Body>) -> Result<&str, &'static str> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match value.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        _ => Err("Authorization header does not contain Bearer token"),
    }
}

fn unauthorized(message: &str) -> Response {
    let body = json!({
        "success": false,
        "error": "Unauthorized",
        "message": message,
    });

    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

/// Add CORS and the standard security response headers to the application.
///
/// `allow_origin` of `None` or `*` allows any origin.
pub fn configure_security(app: Router, allow_origin: Option<&str>) -> Router {
    let origin = match allow_origin {
        None | Some("*") => AllowOrigin::from(Any),
        Some(origin) => match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(_) => {
                warn!("Invalid CORS origin '{}', allowing any origin", origin);
                AllowOrigin::from(Any)
            }
        },
    };

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    let security_headers = tower::ServiceBuilder::new()
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ));

    app.layer(cors).layer(security_headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{middleware, routing::get, Extension};
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use tower::ServiceExt;

    const SECRET: &str = "middleware-test-secret";

    fn app() -> Router {
        let config = Arc::new(AuthConfig::new(SECRET, DEFAULT_ISSUER));

        Router::new()
            .route(
                "/whoami",
                get(|Extension(user): Extension<AuthenticatedUser>| async move { user.user_id }),
            )
            .route_layer(middleware::from_fn_with_state(config, auth_middleware))
    }

    fn token_for(user_id: &str) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            iss: DEFAULT_ISSUER.to_string(),
            iat: now,
            exp: now + 600,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap()
    }

    async fn call(auth: Option<String>) -> (StatusCode, String) {
        let mut builder = Request::builder().uri("/whoami");
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }

        let response = app().oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_valid_token_passes_user_id() {
        let (status, body) = call(Some(format!("Bearer {}", token_for("u1")))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "u1");
    }

    #[tokio::test]
    async fn test_missing_header_is_unauthorized() {
        let (status, body) = call(None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("\"success\":false"));
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_unauthorized() {
        let (status, _) = call(Some(format!("Basic {}", token_for("u1")))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_bad_token_is_unauthorized() {
        let (status, body) = call(Some("Bearer nonsense".to_string())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body.contains("Invalid token"));
    }

    #[tokio::test]
    async fn test_security_headers_are_added() {
        let app = configure_security(app(), Some("https://app.oipet.com"));
        let request = Request::builder()
            .uri("/whoami")
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for("u1")))
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.headers()[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "DENY");
    }

    #[test]
    fn test_auth_config_new() {
        let config = AuthConfig::new("s", "iss");
        assert_eq!(config.jwt_secret, "s");
        assert_eq!(config.issuer, "iss");
    }
}
