//! Removal of the legacy identity tables once consolidation has been verified

use sea_orm::{ConnectionTrait, DbBackend, Statement, TransactionTrait};
use tracing::{info, warn};

use super::probe::SchemaProbe;
use super::verification::verify_consolidation;
use crate::error::{StorageError, StorageResult};
use crate::seaorm::connection::DatabaseConnection;

/// Dropped in this order; `CASCADE` takes dependent constraints with them
pub const LEGACY_TABLES: [&str; 4] = ["athlete_program", "athlete", "members", "app_user"];

/// User- and athlete-keyed columns superseded by member columns
pub const LEGACY_COLUMNS: [(&str, &str); 4] = [
    ("emergency_contact", "athlete_id"),
    ("family_guardian", "user_id"),
    ("family", "primary_user_id"),
    ("user_role", "user_id"),
];

/// What a cleanup run removed
#[derive(Debug, Clone, Default)]
pub struct CleanupReport {
    pub dropped_tables: Vec<String>,
    pub dropped_columns: Vec<String>,
    /// Verification was bypassed with `force`
    pub forced: bool,
}

impl CleanupReport {
    pub fn is_noop(&self) -> bool {
        self.dropped_tables.is_empty() && self.dropped_columns.is_empty()
    }
}

pub struct LegacyCleanup {
    db: DatabaseConnection,
}

impl LegacyCleanup {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Drop the legacy tables and columns in one transaction. Refuses to run
    /// while verification reports unmigrated rows, unless `force` is set.
    pub async fn run(&self, force: bool) -> StorageResult<CleanupReport> {
        let txn = self.db.get_connection().begin().await?;

        let verification = verify_consolidation(&txn).await?;
        if !verification.passed() {
            if force {
                warn!(problems = verification.problems(), "Dropping legacy tables despite failed verification");
            } else {
                txn.rollback().await?;
                return Err(StorageError::VerificationFailed(verification.describe().join("; ")));
            }
        }

        let mut report = CleanupReport {
            forced: force,
            ..Default::default()
        };

        for (table, column) in LEGACY_COLUMNS {
            if SchemaProbe::new(&txn).column_exists(table, column).await? {
                txn.execute(Statement::from_string(
                    DbBackend::Postgres,
                    format!("ALTER TABLE IF EXISTS {} DROP COLUMN IF EXISTS {}", table, column),
                ))
                .await?;
                report.dropped_columns.push(format!("{}.{}", table, column));
            }
        }

        for table in LEGACY_TABLES {
            if SchemaProbe::new(&txn).table_exists(table).await? {
                txn.execute(Statement::from_string(
                    DbBackend::Postgres,
                    format!("DROP TABLE IF EXISTS {} CASCADE", table),
                ))
                .await?;
                report.dropped_tables.push(table.to_string());
            }
        }

        txn.commit().await?;
        info!(
            tables = ?report.dropped_tables,
            columns = ?report.dropped_columns,
            "Legacy identity objects removed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependents_drop_before_parents() {
        let position = |name: &str| LEGACY_TABLES.iter().position(|t| *t == name);
        assert!(position("athlete_program") < position("athlete"));
        assert!(position("athlete") < position("app_user"));
    }

    #[test]
    fn test_empty_report_is_noop() {
        assert!(CleanupReport::default().is_noop());
        let report = CleanupReport {
            dropped_tables: vec!["athlete".to_string()],
            ..Default::default()
        };
        assert!(!report.is_noop());
    }
}
