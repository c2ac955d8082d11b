//! HTTP server configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind the listener to
    pub bind_address: String,

    /// Listening port
    pub port: u16,

    /// Prefix every API route is mounted under
    pub api_prefix: String,

    /// Take the client address from `X-Forwarded-For` (behind a reverse proxy)
    #[serde(default = "crate::domains::utils::default_false")]
    pub trust_proxy: bool,

    /// Per-request timeout
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub request_timeout: Duration,

    /// Largest accepted request body in bytes
    pub max_body_bytes: usize,

    pub cors: CorsSettings,

    pub rate_limit: RateLimitSettings,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 3001,
            api_prefix: "/api".to_string(),
            trust_proxy: false,
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 1024 * 1024,
            cors: CorsSettings::default(),
            rate_limit: RateLimitSettings::default(),
        }
    }
}

impl ServerConfig {
    pub fn socket_address(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl Validatable for ServerConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_required_string(&self.bind_address, "bind_address", self.domain_name())?;

        if !self.api_prefix.starts_with('/') {
            return Err(self.validation_error("api_prefix must start with '/'"));
        }

        validate_positive(self.max_body_bytes, "max_body_bytes", self.domain_name())?;
        if self.request_timeout.is_zero() {
            return Err(self.validation_error("request_timeout must be greater than 0"));
        }

        self.cors.validate()?;
        self.rate_limit.validate()?;

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server"
    }
}

/// Allowed browser origins for the public site and the admin dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
    pub allow_credentials: bool,
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub max_age: Duration,
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:5173".to_string(),
            ],
            allow_credentials: false,
            max_age: Duration::from_secs(3600),
        }
    }
}

impl CorsSettings {
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

impl Validatable for CorsSettings {
    fn validate(&self) -> ConfigResult<()> {
        if self.allows_any_origin() && self.allow_credentials {
            return Err(self.validation_error(
                "Cannot use wildcard origin '*' with allow_credentials: true",
            ));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server.cors"
    }
}

/// Fixed-window limiter applied to every API route
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitSettings {
    pub enabled: bool,
    /// Requests allowed per client per window
    pub max_requests: u32,
    #[serde(with = "crate::domains::utils::serde_duration")]
    pub window: Duration,
    /// Upper bound on tracked client addresses
    pub max_clients: usize,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
            max_clients: 10_000,
        }
    }
}

impl Validatable for RateLimitSettings {
    fn validate(&self) -> ConfigResult<()> {
        if !self.enabled {
            return Ok(());
        }
        validate_positive(self.max_requests, "max_requests", self.domain_name())?;
        validate_positive(self.max_clients, "max_clients", self.domain_name())?;
        if self.window.is_zero() {
            return Err(self.validation_error("window must be greater than 0"));
        }
        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "server.rate_limit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_public_limits() {
        let config = ServerConfig::default();
        assert_eq!(config.rate_limit.max_requests, 100);
        assert_eq!(config.rate_limit.window, Duration::from_secs(900));
        assert_eq!(config.api_prefix, "/api");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_wildcard_with_credentials_is_rejected() {
        let mut config = ServerConfig::default();
        config.cors.allowed_origins = vec!["*".to_string()];
        config.cors.allow_credentials = true;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_disabled_rate_limit_skips_checks() {
        let mut config = ServerConfig::default();
        config.rate_limit.enabled = false;
        config.rate_limit.max_requests = 0;
        assert!(config.validate().is_ok());
    }
}
