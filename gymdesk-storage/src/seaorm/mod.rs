//! SeaORM implementation of the Gymdesk storage layer
//!
//! Entities, the versioned schema migrator, repositories and connection
//! management.

pub mod connection;
pub mod entities;
pub mod errors;
pub mod migrations;
pub mod repositories;

pub use connection::{DatabaseConnection, MigrationState};
pub use migrations::Migrator;
pub use repositories::SeaOrmRepositoryFactory;

// Re-export common SeaORM types for convenience
pub use sea_orm::{ConnectionTrait, DatabaseTransaction, TransactionTrait};
pub use sea_orm_migration::MigratorTrait;
