//! Transactional execution of operator SQL files

use std::path::{Path, PathBuf};
use std::time::Instant;

use sea_orm::{ConnectionTrait, TransactionTrait};
use tracing::{error, info};

use crate::error::{StorageError, StorageResult};
use crate::seaorm::connection::DatabaseConnection;

/// Result of a committed SQL file
#[derive(Debug, Clone)]
pub struct SqlRunReport {
    pub path: PathBuf,
    pub rows_affected: u64,
    pub duration_ms: u64,
}

/// Runs whole SQL files inside one transaction
pub struct SqlRunner {
    db: DatabaseConnection,
}

impl SqlRunner {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Read and execute `path`. Any failing statement rolls back the file.
    pub async fn run_file(&self, path: impl AsRef<Path>) -> StorageResult<SqlRunReport> {
        let path = path.as_ref();
        let sql = tokio::fs::read_to_string(path).await?;
        let report = self.run_script(&sql).await.map_err(|e| {
            error!("SQL file {} failed: {}", path.display(), e);
            e
        })?;

        Ok(SqlRunReport {
            path: path.to_path_buf(),
            ..report
        })
    }

    /// Execute a script that may hold several statements
    pub async fn run_script(&self, sql: &str) -> StorageResult<SqlRunReport> {
        if sql.trim().is_empty() {
            return Err(StorageError::MigrationError("SQL script is empty".to_string()));
        }

        let started = Instant::now();
        let txn = self.db.get_connection().begin().await?;

        // Unprepared execution uses the simple query protocol, which accepts
        // multiple statements in one round trip
        let result = match txn.execute_unprepared(sql).await {
            Ok(result) => result,
            Err(e) => {
                txn.rollback().await?;
                return Err(e.into());
            }
        };
        txn.commit().await?;

        let report = SqlRunReport {
            path: PathBuf::new(),
            rows_affected: result.rows_affected(),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        info!(
            rows_affected = report.rows_affected,
            duration_ms = report.duration_ms,
            "SQL script committed"
        );
        Ok(report)
    }
}
