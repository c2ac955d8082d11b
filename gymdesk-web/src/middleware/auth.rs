//! JWT authentication for the admin API

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Duration, Utc};
use gymdesk_api_types::AdminRole;
use gymdesk_config::AuthConfig;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::errors::WebError;

/// JWT Claims structure
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct JwtClaims {
    /// Subject (admin id)
    pub sub: String,
    pub email: String,
    pub role: String,
    /// Issued at
    pub iat: i64,
    /// Expiration time
    pub exp: i64,
    pub iss: String,
    pub aud: String,
}

/// The authenticated admin behind the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub admin_id: i32,
    pub email: String,
    pub role: AdminRole,
}

impl AuthContext {
    pub fn is_super_admin(&self) -> bool {
        self.role == AdminRole::SuperAdmin
    }

    /// Guard for admin-management routes
    pub fn require_super_admin(&self) -> Result<(), WebError> {
        if self.is_super_admin() {
            Ok(())
        } else {
            Err(WebError::forbidden("Super admin privileges required"))
        }
    }
}

/// A freshly issued token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT token manager
pub struct JwtManager {
    issuer: String,
    audience: String,
    expiry: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtManager {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            issuer: config.issuer.clone(),
            audience: config.audience.clone(),
            expiry: Duration::hours(config.token_expiry_hours),
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_ref()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_ref()),
        }
    }

    /// Sign an HS256 token for an admin
    pub fn generate_token(&self, admin_id: i32, email: &str, role: AdminRole) -> Result<IssuedToken, WebError> {
        let now = Utc::now();
        let expires_at = now + self.expiry;

        let claims = JwtClaims {
            sub: admin_id.to_string(),
            email: email.to_string(),
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| WebError::internal(format!("Failed to generate JWT token: {}", e)))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify and decode a JWT token
    pub fn verify_token(&self, token: &str) -> Result<JwtClaims, WebError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);

        let token_data = decode::<JwtClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            warn!("JWT verification failed: {}", e);
            WebError::unauthorized("Invalid or expired token")
        })?;

        Ok(token_data.claims)
    }

    /// Resolve the bearer token in `headers` to an [`AuthContext`]
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, WebError> {
        let token = extract_bearer(headers).ok_or_else(|| WebError::unauthorized("Authentication required"))?;
        let claims = self.verify_token(token)?;

        let admin_id = claims
            .sub
            .parse::<i32>()
            .map_err(|_| WebError::unauthorized("Invalid or expired token"))?;
        let role = claims
            .role
            .parse::<AdminRole>()
            .map_err(|_| WebError::forbidden("Admin privileges required"))?;

        debug!("Authenticated admin {}", admin_id);
        Ok(AuthContext {
            admin_id,
            email: claims.email,
            role,
        })
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Rejects requests without a valid admin token and stores the
/// [`AuthContext`] in the request extensions
pub async fn require_admin(
    State(jwt): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, WebError> {
    let auth_context = jwt.authenticate(request.headers())?;
    request.extensions_mut().insert(auth_context);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn manager() -> JwtManager {
        JwtManager::new(&AuthConfig {
            jwt_secret: "test-secret-key".to_string(),
            token_expiry_hours: 1,
            ..Default::default()
        })
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    #[test]
    fn test_jwt_token_generation_and_verification() {
        let jwt = manager();
        let issued = jwt.generate_token(7, "coach@studio.test", AdminRole::SuperAdmin).unwrap();

        let claims = jwt.verify_token(&issued.token).unwrap();
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.role, "super_admin");
        assert_eq!(claims.iss, "gymdesk-api");
        assert_eq!(claims.aud, "gymdesk-admin");
        assert!(issued.expires_at > Utc::now());
    }

    #[test]
    fn test_authenticate_builds_context() {
        let jwt = manager();
        let issued = jwt.generate_token(3, "front@studio.test", AdminRole::Admin).unwrap();

        let context = jwt.authenticate(&bearer(&issued.token)).unwrap();
        assert_eq!(context.admin_id, 3);
        assert_eq!(context.email, "front@studio.test");
        assert!(!context.is_super_admin());
        assert!(context.require_super_admin().is_err());
    }

    #[test]
    fn test_missing_and_foreign_tokens_are_rejected() {
        let jwt = manager();
        assert!(matches!(
            jwt.authenticate(&HeaderMap::new()),
            Err(WebError::Unauthorized { .. })
        ));

        let other = JwtManager::new(&AuthConfig {
            jwt_secret: "another-secret".to_string(),
            ..Default::default()
        });
        let issued = other.generate_token(1, "x@studio.test", AdminRole::Admin).unwrap();
        assert!(matches!(
            jwt.authenticate(&bearer(&issued.token)),
            Err(WebError::Unauthorized { .. })
        ));
    }

    #[test]
    fn test_expired_token_is_rejected() {
        let jwt = JwtManager {
            expiry: Duration::hours(-2),
            ..manager()
        };
        let issued = jwt.generate_token(1, "x@studio.test", AdminRole::Admin).unwrap();
        assert!(jwt.verify_token(&issued.token).is_err());
    }
}
