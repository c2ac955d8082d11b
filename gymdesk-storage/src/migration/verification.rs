//! Post-consolidation checks, run before the legacy tables may be dropped

use sea_orm::{ConnectionTrait, DbErr};
use serde::Serialize;

use super::consolidation::resolve_member_lateral;
use super::probe::SchemaProbe;

/// Counts of legacy rows that have no unified counterpart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConsolidationVerification {
    /// `app_user` rows without a member of the same id
    pub unmigrated_users: u64,
    /// Athletes that resolve to no member
    pub unmatched_athletes: u64,
    /// `athlete_program` rows (for existing programs) with no matching `member_program`
    pub unmigrated_enrollments: u64,
    /// `family_guardian` rows with a user link but no member link
    pub unlinked_guardians: u64,
}

impl ConsolidationVerification {
    pub fn passed(&self) -> bool {
        self.problems() == 0
    }

    pub fn problems(&self) -> u64 {
        self.unmigrated_users + self.unmatched_athletes + self.unmigrated_enrollments + self.unlinked_guardians
    }

    /// One line per non-zero count
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.unmigrated_users > 0 {
            lines.push(format!("{} app_user rows have no member", self.unmigrated_users));
        }
        if self.unmatched_athletes > 0 {
            lines.push(format!("{} athletes resolve to no member", self.unmatched_athletes));
        }
        if self.unmigrated_enrollments > 0 {
            lines.push(format!(
                "{} athlete_program rows have no member_program",
                self.unmigrated_enrollments
            ));
        }
        if self.unlinked_guardians > 0 {
            lines.push(format!(
                "{} family_guardian rows have no member_id",
                self.unlinked_guardians
            ));
        }
        lines
    }
}

/// Compare the legacy tables against the unified ones. Absent legacy tables
/// contribute zero.
pub async fn verify_consolidation<C: ConnectionTrait>(db: &C) -> Result<ConsolidationVerification, DbErr> {
    let probe = SchemaProbe::new(db);
    let mut result = ConsolidationVerification::default();

    if probe.table_exists("app_user").await? {
        result.unmigrated_users = probe
            .scalar_i64(
                "SELECT COUNT(*) AS value FROM app_user u \
                 WHERE NOT EXISTS (SELECT 1 FROM member m WHERE m.id = u.id)",
            )
            .await? as u64;
    }

    let athlete = probe.table_exists("athlete").await?;
    if athlete {
        result.unmatched_athletes = probe
            .scalar_i64(&format!(
                "SELECT COUNT(*) AS value FROM athlete a \
                 WHERE NOT EXISTS (SELECT 1 FROM athlete a2 {lateral} WHERE a2.id = a.id)",
                lateral = resolve_member_lateral("a2"),
            ))
            .await? as u64;
    }

    if athlete && probe.table_exists("athlete_program").await? {
        let iteration = if probe.column_exists("athlete_program", "class_iteration_id").await? {
            "ap.class_iteration_id"
        } else {
            "NULL"
        };
        result.unmigrated_enrollments = probe
            .scalar_i64(&format!(
                "SELECT COUNT(*) AS value FROM athlete_program ap \
                 JOIN athlete a ON a.id = ap.athlete_id \
                 WHERE EXISTS (SELECT 1 FROM program p WHERE p.id = ap.program_id) \
                   AND NOT EXISTS ( \
                     SELECT 1 FROM member_program mp {lateral} \
                      WHERE mp.member_id = resolved.member_id \
                        AND mp.program_id = ap.program_id \
                        AND ({iteration} IS NULL OR mp.class_iteration_id IS NOT DISTINCT FROM {iteration}))",
                lateral = resolve_member_lateral("a"),
                iteration = iteration,
            ))
            .await? as u64;
    }

    if probe.column_exists("family_guardian", "user_id").await?
        && probe.column_exists("family_guardian", "member_id").await?
    {
        result.unlinked_guardians = probe
            .scalar_i64(
                "SELECT COUNT(*) AS value FROM family_guardian \
                 WHERE user_id IS NOT NULL AND member_id IS NULL",
            )
            .await? as u64;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_verification_passes() {
        let verification = ConsolidationVerification::default();
        assert!(verification.passed());
        assert!(verification.describe().is_empty());
    }

    #[test]
    fn test_problems_are_described() {
        let verification = ConsolidationVerification {
            unmatched_athletes: 2,
            unmigrated_enrollments: 5,
            ..Default::default()
        };
        assert!(!verification.passed());
        assert_eq!(verification.problems(), 7);
        assert_eq!(
            verification.describe(),
            vec![
                "2 athletes resolve to no member".to_string(),
                "5 athlete_program rows have no member_program".to_string(),
            ]
        );
    }
}
