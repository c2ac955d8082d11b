//! Domain-specific configuration modules

pub mod auth;
pub mod database;
pub mod logging;
pub mod server;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::Validatable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Deployment environment, read from `NODE_ENV`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Test,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        })
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            "test" => Ok(Environment::Test),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

/// Main Gymdesk configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GymdeskConfig {
    pub environment: Environment,

    pub server: server::ServerConfig,

    pub database: database::DatabaseConfig,

    pub auth: auth::AuthConfig,

    pub logging: logging::LoggingConfig,
}

impl GymdeskConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.logging.validate()?;

        if self.environment.is_production() {
            self.auth.validate_for_production()?;
            if self.server.cors.allows_any_origin() {
                log::warn!("CORS allows any origin in production");
            }
        }

        Ok(())
    }

    /// Copy with secrets masked, for printing
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        copy.auth.jwt_secret = "********".to_string();
        copy.database.url = self.database.redacted_url();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(GymdeskConfig::default().validate_all().is_ok());
    }

    #[test]
    fn test_production_requires_real_secret() {
        let config = GymdeskConfig {
            environment: Environment::Production,
            ..Default::default()
        };
        assert!(config.validate_all().is_err());
    }

    #[test]
    fn test_yaml_sections_are_optional() {
        let config: GymdeskConfig = serde_yaml::from_str(
            r#"
server:
  port: 8080
database:
  url: postgres://app@db/gymdesk
"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.rate_limit.max_requests, 100);
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.environment, Environment::Development);
    }

    #[test]
    fn test_redacted_masks_secrets() {
        let mut config = GymdeskConfig::default();
        config.database.url = "postgres://app:hunter2@db/gymdesk".to_string();
        let redacted = config.redacted();
        assert_eq!(redacted.auth.jwt_secret, "********");
        assert!(!redacted.database.url.contains("hunter2"));
    }
}
