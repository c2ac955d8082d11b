use crate::error::{StorageError, StorageResult};
use crate::seaorm::migrations::Migrator;
use gymdesk_config::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection as SeaConnection};
use sea_orm_migration::{MigrationName, MigratorTrait};
use std::time::Duration;
use tracing::{debug, info};

/// Database connection wrapper with configuration
#[derive(Clone)]
pub struct DatabaseConnection {
    connection: SeaConnection,
    config: DatabaseConfig,
}

/// One row of `db status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationState {
    pub name: String,
    pub applied: bool,
}

impl DatabaseConnection {
    /// Create a new database connection with configuration
    pub async fn new(config: DatabaseConfig) -> StorageResult<Self> {
        Self::connect(config, None).await
    }

    /// Connect with every session's `search_path` pinned to `schema`
    pub async fn with_schema(config: DatabaseConfig, schema: &str) -> StorageResult<Self> {
        Self::connect(config, Some(schema)).await
    }

    async fn connect(config: DatabaseConfig, schema: Option<&str>) -> StorageResult<Self> {
        info!("Connecting to database: {}", config.redacted_url());

        let mut opts = ConnectOptions::new(config.url.clone());
        opts.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(config.connection_timeout)
            .acquire_timeout(config.connection_timeout)
            .idle_timeout(config.idle_timeout)
            .max_lifetime(Duration::from_secs(3600))
            .sqlx_logging(config.sqlx_logging)
            .sqlx_logging_level(log::LevelFilter::Debug);

        if let Some(schema) = schema {
            opts.set_schema_search_path(schema);
        }

        let connection = Database::connect(opts).await?;

        debug!(
            "Database connection established with {} max connections",
            config.max_connections
        );

        Ok(Self { connection, config })
    }

    /// Get the underlying Sea-ORM connection
    pub fn get_connection(&self) -> &SeaConnection {
        &self.connection
    }

    pub fn get_config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Apply every pending schema migration
    pub async fn migrate(&self) -> StorageResult<()> {
        info!("Running database migrations");

        Migrator::up(&self.connection, None)
            .await
            .map_err(|e| StorageError::MigrationError(e.to_string()))?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Applied and pending migrations, in declaration order
    pub async fn migration_status(&self) -> StorageResult<Vec<MigrationState>> {
        let pending: Vec<String> = Migrator::get_pending_migrations(&self.connection)
            .await
            .map_err(|e| StorageError::MigrationError(e.to_string()))?
            .iter()
            .map(|m| m.name().to_string())
            .collect();

        Ok(Migrator::migrations()
            .iter()
            .map(|m| {
                let name = m.name().to_string();
                let applied = !pending.contains(&name);
                MigrationState { name, applied }
            })
            .collect())
    }

    /// Check database connectivity
    pub async fn ping(&self) -> StorageResult<()> {
        debug!("Pinging database");

        match self.connection.ping().await {
            Ok(_) => {
                debug!("Database ping successful");
                Ok(())
            }
            Err(e) => {
                debug!("Database ping failed: {}", e);
                Err(StorageError::DbError(e))
            }
        }
    }

    /// Close the database connection
    pub async fn close(self) -> StorageResult<()> {
        info!("Closing database connection");
        self.connection.close().await?;
        debug!("Database connection closed");
        Ok(())
    }
}
