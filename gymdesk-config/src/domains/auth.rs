//! Admin authentication configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Placeholder secret used when `JWT_SECRET` is not set
pub const DEVELOPMENT_JWT_SECRET: &str = "gymdesk-development-secret";

/// Minimum secret length accepted in production
pub const MIN_PRODUCTION_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HS256 signing secret
    pub jwt_secret: String,
    /// Hours an admin token stays valid
    pub token_expiry_hours: i64,
    pub issuer: String,
    pub audience: String,
    /// bcrypt work factor for new password hashes
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: DEVELOPMENT_JWT_SECRET.to_string(),
            token_expiry_hours: 24,
            issuer: "gymdesk-api".to_string(),
            audience: "gymdesk-admin".to_string(),
            bcrypt_cost: 10,
        }
    }
}

impl AuthConfig {
    /// Production refuses the placeholder and short secrets
    pub fn validate_for_production(&self) -> ConfigResult<()> {
        if self.jwt_secret == DEVELOPMENT_JWT_SECRET {
            return Err(self.validation_error("JWT_SECRET must be set in production"));
        }
        if self.jwt_secret.len() < MIN_PRODUCTION_SECRET_LEN {
            return Err(self.validation_error(format!(
                "JWT_SECRET must be at least {} characters in production",
                MIN_PRODUCTION_SECRET_LEN
            )));
        }
        Ok(())
    }
}

impl Validatable for AuthConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.jwt_secret, "jwt_secret", self.domain_name())?;
        validate_required_string(&self.issuer, "issuer", self.domain_name())?;
        validate_required_string(&self.audience, "audience", self.domain_name())?;
        validate_positive(self.token_expiry_hours, "token_expiry_hours", self.domain_name())?;

        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(self.validation_error(format!(
                "bcrypt_cost must be between 4 and 31, got {}",
                self.bcrypt_cost
            )));
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "auth"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_secret_not_allowed_in_production() {
        let config = AuthConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.validate_for_production().is_err());
    }

    #[test]
    fn test_long_secret_allowed_in_production() {
        let config = AuthConfig {
            jwt_secret: "x".repeat(48),
            ..Default::default()
        };
        assert!(config.validate_for_production().is_ok());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let config = AuthConfig {
            bcrypt_cost: 2,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
