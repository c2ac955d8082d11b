//! PostgreSQL storage for Gymdesk
//!
//! - [`seaorm`]: connection, schema migrator, entities and the repository
//!   implementations behind `gymdesk-interfaces`
//! - [`migration`]: consolidation of the legacy identity tables into
//!   `member`, its verification and the legacy cleanup
//! - [`sql_runner`]: transactional execution of operator SQL files
//! - [`diagnostics`]: read-only data quality checks

pub mod diagnostics;
pub mod error;
pub mod migration;
pub mod seaorm;
pub mod sql_runner;

pub use error::{StorageError, StorageResult};
pub use seaorm::{DatabaseConnection, MigrationState, Migrator, SeaOrmRepositoryFactory};
