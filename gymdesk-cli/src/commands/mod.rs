pub mod admin;
pub mod config;
pub mod db;
pub mod diagnose;
pub mod serve;

use anyhow::{Context, Result};
use gymdesk_config::GymdeskConfig;
use gymdesk_storage::DatabaseConnection;

pub(crate) async fn connect(config: &GymdeskConfig) -> Result<DatabaseConnection> {
    DatabaseConnection::new(config.database.clone())
        .await
        .with_context(|| format!("Failed to connect to {}", config.database.redacted_url()))
}
