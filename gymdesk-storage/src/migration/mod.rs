//! Legacy identity consolidation
//!
//! Folds the legacy `app_user`, `athlete` and `athlete_program` tables into
//! the unified `member` / `member_program` model, verifies the result and
//! finally drops the legacy objects.

pub mod cleanup;
pub mod consolidation;
pub mod probe;
pub mod verification;

pub use cleanup::{CleanupReport, LegacyCleanup};
pub use consolidation::MemberConsolidator;
pub use probe::SchemaProbe;
pub use verification::{verify_consolidation, ConsolidationVerification};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Outcome of one consolidation step
#[derive(Debug, Clone)]
pub struct MigrationReport {
    pub step: u8,
    pub name: String,
    pub migrated_count: u64,
    pub skipped_count: u64,
    /// Set when the step did not run, e.g. its source table is absent
    pub skipped_reason: Option<String>,
    pub duration_ms: u64,
}

impl MigrationReport {
    pub fn new(step: u8, name: impl Into<String>) -> Self {
        Self {
            step,
            name: name.into(),
            migrated_count: 0,
            skipped_count: 0,
            skipped_reason: None,
            duration_ms: 0,
        }
    }

    pub fn skipped(step: u8, name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            skipped_reason: Some(reason.into()),
            ..Self::new(step, name)
        }
    }

    pub fn total_processed(&self) -> u64 {
        self.migrated_count + self.skipped_count
    }

    pub fn ran(&self) -> bool {
        self.skipped_reason.is_none()
    }
}

/// Consolidation error types
#[derive(Debug, Error)]
pub enum ConsolidationError {
    #[error("Step {step} ({name}) failed: {source}")]
    StepFailed {
        step: u8,
        name: &'static str,
        #[source]
        source: sea_orm::DbErr,
    },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Verification failed: {0}")]
    VerificationFailed(String),
}

/// Overall consolidation summary
#[derive(Debug, Clone)]
pub struct MigrationSummary {
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub total_duration_ms: u64,
    pub reports: Vec<MigrationReport>,
    pub success: bool,
    /// The transaction was rolled back on purpose
    pub dry_run: bool,
}

impl MigrationSummary {
    pub fn new(dry_run: bool) -> Self {
        Self {
            started_at: Utc::now(),
            completed_at: None,
            total_duration_ms: 0,
            reports: Vec::new(),
            success: false,
            dry_run,
        }
    }

    pub fn complete(&mut self, success: bool) {
        let completed_at = Utc::now();
        self.total_duration_ms = completed_at
            .signed_duration_since(self.started_at)
            .num_milliseconds()
            .max(0) as u64;
        self.completed_at = Some(completed_at);
        self.success = success;
    }

    pub fn total_migrated(&self) -> u64 {
        self.reports.iter().map(|r| r.migrated_count).sum()
    }

    pub fn total_skipped(&self) -> u64 {
        self.reports.iter().map(|r| r.skipped_count).sum()
    }

    /// Rows inserted into `member` by steps 1 and 2
    pub fn members_inserted(&self) -> u64 {
        self.reports
            .iter()
            .filter(|r| r.step == 1 || r.step == 2)
            .map(|r| r.migrated_count)
            .sum()
    }

    pub fn report(&self, step: u8) -> Option<&MigrationReport> {
        self.reports.iter().find(|r| r.step == step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_report() {
        let mut report = MigrationReport::new(4, "enrollments");
        report.migrated_count = 12;
        report.skipped_count = 3;

        assert_eq!(report.total_processed(), 15);
        assert!(report.ran());
        assert!(!MigrationReport::skipped(7, "user roles", "user_role table not present").ran());
    }

    #[test]
    fn test_migration_summary() {
        let mut summary = MigrationSummary::new(true);

        let mut users = MigrationReport::new(1, "app users");
        users.migrated_count = 10;
        let mut athletes = MigrationReport::new(2, "athletes");
        athletes.migrated_count = 4;
        athletes.skipped_count = 1;
        let mut guardians = MigrationReport::new(9, "guardian authority");
        guardians.migrated_count = 6;

        summary.reports.extend([users, athletes, guardians]);
        summary.complete(true);

        assert_eq!(summary.total_migrated(), 20);
        assert_eq!(summary.members_inserted(), 14);
        assert_eq!(summary.total_skipped(), 1);
        assert_eq!(summary.report(9).map(|r| r.migrated_count), Some(6));
        assert!(summary.success);
        assert!(summary.dry_run);
        assert!(summary.completed_at.is_some());
    }
}
