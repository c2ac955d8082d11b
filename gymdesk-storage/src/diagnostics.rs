//! Read-only data quality checks

use std::fmt;
use std::str::FromStr;

use sea_orm::{ConnectionTrait, DbBackend, DbErr, Statement};
use serde::Serialize;

use crate::migration::consolidation::resolve_member_lateral;
use crate::migration::probe::SchemaProbe;

/// Tables whose row counts are reported by [`DiagnosticCheck::TableCounts`]
const COUNTED_TABLES: [&str; 12] = [
    "member",
    "member_program",
    "family",
    "family_guardian",
    "parent_guardian_authority",
    "program",
    "class_iteration",
    "registrations",
    "admins",
    "app_user",
    "athlete",
    "athlete_program",
];

/// Upper bound on detail lines per check
const MAX_DETAILS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiagnosticCheck {
    TableCounts,
    UnmatchedAthletes,
    OrphanEnrollments,
    DuplicateMembers,
    MissingGuardianLinks,
}

impl DiagnosticCheck {
    pub const ALL: [DiagnosticCheck; 5] = [
        DiagnosticCheck::TableCounts,
        DiagnosticCheck::UnmatchedAthletes,
        DiagnosticCheck::OrphanEnrollments,
        DiagnosticCheck::DuplicateMembers,
        DiagnosticCheck::MissingGuardianLinks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCheck::TableCounts => "table-counts",
            DiagnosticCheck::UnmatchedAthletes => "unmatched-athletes",
            DiagnosticCheck::OrphanEnrollments => "orphan-enrollments",
            DiagnosticCheck::DuplicateMembers => "duplicate-members",
            DiagnosticCheck::MissingGuardianLinks => "missing-guardian-links",
        }
    }

    /// Table counts only inform; they never fail
    pub fn is_informational(&self) -> bool {
        matches!(self, DiagnosticCheck::TableCounts)
    }
}

impl fmt::Display for DiagnosticCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DiagnosticCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("Unknown diagnostic check: {}", s))
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticFinding {
    pub check: DiagnosticCheck,
    pub problems: u64,
    pub details: Vec<String>,
}

impl DiagnosticFinding {
    fn new(check: DiagnosticCheck) -> Self {
        Self {
            check,
            problems: 0,
            details: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.check.is_informational() || self.problems == 0
    }
}

pub struct Diagnostics<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> Diagnostics<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn run(&self, check: DiagnosticCheck) -> Result<DiagnosticFinding, DbErr> {
        match check {
            DiagnosticCheck::TableCounts => self.table_counts().await,
            DiagnosticCheck::UnmatchedAthletes => self.unmatched_athletes().await,
            DiagnosticCheck::OrphanEnrollments => self.orphan_enrollments().await,
            DiagnosticCheck::DuplicateMembers => self.duplicate_members().await,
            DiagnosticCheck::MissingGuardianLinks => self.missing_guardian_links().await,
        }
    }

    pub async fn run_all(&self) -> Result<Vec<DiagnosticFinding>, DbErr> {
        let mut findings = Vec::with_capacity(DiagnosticCheck::ALL.len());
        for check in DiagnosticCheck::ALL {
            findings.push(self.run(check).await?);
        }
        Ok(findings)
    }

    async fn table_counts(&self) -> Result<DiagnosticFinding, DbErr> {
        let probe = SchemaProbe::new(self.db);
        let mut finding = DiagnosticFinding::new(DiagnosticCheck::TableCounts);
        for table in COUNTED_TABLES {
            if probe.table_exists(table).await? {
                finding.details.push(format!("{}: {}", table, probe.count(table).await?));
            } else {
                finding.details.push(format!("{}: absent", table));
            }
        }
        Ok(finding)
    }

    async fn unmatched_athletes(&self) -> Result<DiagnosticFinding, DbErr> {
        let mut finding = DiagnosticFinding::new(DiagnosticCheck::UnmatchedAthletes);
        if !SchemaProbe::new(self.db).table_exists("athlete").await? {
            return Ok(finding);
        }

        let lines = self
            .detail_lines(&format!(
                "SELECT format('athlete %s (%s %s, born %s, family %s)', a.id, a.first_name, \
                               COALESCE(a.last_name, ''), COALESCE(a.date_of_birth::text, '?'), \
                               COALESCE(a.family_id::text, '-')) AS detail \
                   FROM athlete a \
                  WHERE NOT EXISTS (SELECT 1 FROM athlete a2 {lateral} WHERE a2.id = a.id) \
                  ORDER BY a.id",
                lateral = resolve_member_lateral("a2"),
            ))
            .await?;
        finding.problems = lines.len() as u64;
        finding.details = truncate(lines);
        Ok(finding)
    }

    async fn orphan_enrollments(&self) -> Result<DiagnosticFinding, DbErr> {
        let lines = self
            .detail_lines(
                "SELECT format('member_program %s: %s', mp.id, \
                               CASE WHEN m.id IS NULL THEN 'member ' || mp.member_id || ' missing' \
                                    WHEN p.id IS NULL THEN 'program ' || mp.program_id || ' missing' \
                                    ELSE 'class iteration ' || mp.class_iteration_id || ' belongs to another program' END) AS detail \
                   FROM member_program mp \
                   LEFT JOIN member m ON m.id = mp.member_id \
                   LEFT JOIN program p ON p.id = mp.program_id \
                   LEFT JOIN class_iteration ci ON ci.id = mp.class_iteration_id \
                  WHERE m.id IS NULL \
                     OR p.id IS NULL \
                     OR (mp.class_iteration_id IS NOT NULL AND ci.program_id IS DISTINCT FROM mp.program_id) \
                  ORDER BY mp.id",
            )
            .await?;

        let mut finding = DiagnosticFinding::new(DiagnosticCheck::OrphanEnrollments);
        finding.problems = lines.len() as u64;
        finding.details = truncate(lines);
        Ok(finding)
    }

    async fn duplicate_members(&self) -> Result<DiagnosticFinding, DbErr> {
        let mut lines = self
            .detail_lines(
                "SELECT format('%s %s (born %s, family %s): members %s', first_name, last_name, \
                               COALESCE(date_of_birth::text, '?'), COALESCE(family_id::text, '-'), \
                               string_agg(id::text, ', ' ORDER BY id)) AS detail \
                   FROM member \
                  WHERE status <> 'archived' \
                  GROUP BY first_name, last_name, date_of_birth, family_id \
                 HAVING COUNT(*) > 1 \
                  ORDER BY first_name, last_name",
            )
            .await?;

        // Members created before consolidation that took a legacy user's id
        if SchemaProbe::new(self.db).table_exists("app_user").await? {
            lines.extend(
                self.detail_lines(
                    "SELECT format('member %s (%s) holds the id of app_user %s (%s)', m.id, \
                                   COALESCE(m.email, 'no email'), u.id, COALESCE(u.email, 'no email')) AS detail \
                       FROM member m \
                       JOIN app_user u ON u.id = m.id \
                      WHERE m.email IS DISTINCT FROM lower(btrim(u.email)) \
                      ORDER BY m.id",
                )
                .await?,
            );
        }

        let mut finding = DiagnosticFinding::new(DiagnosticCheck::DuplicateMembers);
        finding.problems = lines.len() as u64;
        finding.details = truncate(lines);
        Ok(finding)
    }

    async fn missing_guardian_links(&self) -> Result<DiagnosticFinding, DbErr> {
        let lines = self
            .detail_lines(
                "SELECT format('minor member %s (%s %s) in family %s has no guardian authority', \
                               m.id, m.first_name, m.last_name, m.family_id) AS detail \
                   FROM member m \
                  WHERE m.family_id IS NOT NULL \
                    AND m.date_of_birth IS NOT NULL \
                    AND m.date_of_birth > CURRENT_DATE - INTERVAL '18 years' \
                    AND m.status <> 'archived' \
                    AND NOT EXISTS (SELECT 1 FROM parent_guardian_authority pga WHERE pga.minor_member_id = m.id) \
                  ORDER BY m.id",
            )
            .await?;

        let mut finding = DiagnosticFinding::new(DiagnosticCheck::MissingGuardianLinks);
        finding.problems = lines.len() as u64;
        finding.details = truncate(lines);
        Ok(finding)
    }

    async fn detail_lines(&self, sql: &str) -> Result<Vec<String>, DbErr> {
        let rows = self
            .db
            .query_all(Statement::from_string(DbBackend::Postgres, sql.to_string()))
            .await?;
        rows.iter().map(|row| row.try_get::<String>("", "detail")).collect()
    }
}

fn truncate(mut lines: Vec<String>) -> Vec<String> {
    if lines.len() > MAX_DETAILS {
        let hidden = lines.len() - MAX_DETAILS;
        lines.truncate(MAX_DETAILS);
        lines.push(format!("... and {} more", hidden));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_names_round_trip() {
        for check in DiagnosticCheck::ALL {
            assert_eq!(check.as_str().parse::<DiagnosticCheck>().unwrap(), check);
        }
        assert!("everything".parse::<DiagnosticCheck>().is_err());
    }

    #[test]
    fn test_table_counts_never_fail() {
        let finding = DiagnosticFinding {
            check: DiagnosticCheck::TableCounts,
            problems: 3,
            details: vec![],
        };
        assert!(finding.passed());

        let finding = DiagnosticFinding {
            check: DiagnosticCheck::DuplicateMembers,
            problems: 1,
            details: vec![],
        };
        assert!(!finding.passed());
    }

    #[test]
    fn test_truncate_keeps_count_of_hidden_lines() {
        let lines: Vec<String> = (0..60).map(|i| i.to_string()).collect();
        let truncated = truncate(lines);
        assert_eq!(truncated.len(), MAX_DETAILS + 1);
        assert_eq!(truncated.last().map(String::as_str), Some("... and 10 more"));
    }
}
