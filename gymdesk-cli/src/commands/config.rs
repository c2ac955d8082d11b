use anyhow::{Context, Result};
use gymdesk_config::{ConfigLoader, GymdeskConfig};
use std::path::Path;

use crate::report;

pub fn handle_show(config: &GymdeskConfig) -> Result<()> {
    let yaml = serde_yaml::to_string(&config.redacted()).context("Failed to serialize configuration")?;
    println!("{}", yaml);
    Ok(())
}

/// Loads the file with environment overrides applied, exactly as `serve` would
pub fn handle_validate(file: Option<&Path>) -> Result<()> {
    let config = ConfigLoader::new()
        .load(file)
        .context("Configuration validation failed")?;

    if config.environment.is_production() {
        config.auth.validate_for_production()?;
    }

    match file {
        Some(path) => report::success(format!("{} is valid", path.display())),
        None => report::success("Environment configuration is valid"),
    }
    Ok(())
}
