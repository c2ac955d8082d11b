//! Domain-driven configuration management for Gymdesk
//!
//! Configuration is split by functional domain, loaded from an optional YAML
//! file and then overridden from the environment. Plain deployment variables
//! (`DATABASE_URL`, `PORT`, `JWT_SECRET`, `NODE_ENV`) are honoured alongside
//! `GYMDESK_`-prefixed ones.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;

// Re-export domain configurations
pub use domains::{
    auth::AuthConfig,
    database::DatabaseConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    server::{CorsSettings, RateLimitSettings, ServerConfig},
    Environment, GymdeskConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
