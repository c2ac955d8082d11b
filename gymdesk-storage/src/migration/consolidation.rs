//! Unified-member consolidation
//!
//! Nine ordered steps, all inside one transaction. A failing step rolls back
//! every earlier write of the run. Steps whose legacy source is absent are
//! reported as skipped rather than failing, so the procedure can be re-run
//! after a partial cleanup.

use std::future::Future;
use std::time::Instant;

use sea_orm::{ConnectionTrait, DatabaseTransaction, DbBackend, DbErr, Statement, TransactionTrait};
use tracing::{debug, error, info, warn};

use super::probe::SchemaProbe;
use super::{ConsolidationError, MigrationReport, MigrationSummary};
use crate::seaorm::connection::DatabaseConnection;

pub const STEP_APP_USERS: &str = "app users to members";
pub const STEP_ATHLETES: &str = "unlinked athletes to members";
pub const STEP_LINKED_ATHLETES: &str = "linked athlete details";
pub const STEP_ENROLLMENTS: &str = "athlete programs to member programs";
pub const STEP_FAMILY_LINKS: &str = "family guardian and primary member links";
pub const STEP_EMERGENCY_CONTACTS: &str = "emergency contacts";
pub const STEP_USER_ROLES: &str = "user roles";
pub const STEP_FAMILY_STATUS: &str = "family active status";
pub const STEP_GUARDIAN_AUTHORITY: &str = "parent guardian authority";

/// Statuses that count as an active member
const ACTIVE_STATUSES: &str = "('active', 'legacy')";

/// Identity tuple match between a legacy athlete row and a member row.
///
/// Names compare exactly; birth date and family compare with
/// `IS NOT DISTINCT FROM` so that two NULLs match and a re-run finds the
/// rows it inserted before.
pub fn identity_match(athlete: &str, member: &str) -> String {
    format!(
        "{m}.first_name = {a}.first_name \
         AND {m}.last_name = COALESCE({a}.last_name, '') \
         AND {m}.date_of_birth IS NOT DISTINCT FROM {a}.date_of_birth \
         AND {m}.family_id IS NOT DISTINCT FROM {a}.family_id",
        a = athlete,
        m = member
    )
}

/// Lateral join yielding `resolved.member_id` for an athlete: the linked
/// user's member when `user_id` is set, otherwise the lowest-id identity match.
/// Athletes without a match produce no row.
pub fn resolve_member_lateral(athlete: &str) -> String {
    format!(
        "CROSS JOIN LATERAL (\
            SELECT m.id AS member_id FROM member m \
             WHERE ({a}.user_id IS NOT NULL AND m.id = {a}.user_id) \
                OR ({a}.user_id IS NULL AND {identity}) \
             ORDER BY m.id LIMIT 1\
         ) resolved",
        a = athlete,
        identity = identity_match(athlete, "m")
    )
}

/// Member status derived from a legacy athlete status
pub fn athlete_status_sql(athlete: &str, fallback: &str) -> String {
    format!(
        "CASE WHEN {a}.status IS NULL THEN {fallback} \
              WHEN lower({a}.status::text) = 'active' THEN 'active' \
              WHEN lower({a}.status::text) IN ('archived', 'deleted') THEN 'archived' \
              ELSE 'inactive' END",
        a = athlete,
        fallback = fallback
    )
}

/// First word of a full name
pub fn first_name_sql(full_name: &str, email: &str) -> String {
    format!(
        "CASE WHEN position(' ' IN btrim(COALESCE({n}, ''))) > 0 \
              THEN split_part(btrim({n}), ' ', 1) \
              ELSE COALESCE(NULLIF(btrim({n}), ''), NULLIF(split_part({e}, '@', 1), ''), 'Unknown') END",
        n = full_name,
        e = email
    )
}

/// Everything after the first space of a full name, or empty
pub fn last_name_sql(full_name: &str) -> String {
    format!(
        "CASE WHEN position(' ' IN btrim(COALESCE({n}, ''))) > 0 \
              THEN btrim(substr(btrim({n}), position(' ' IN btrim({n})) + 1)) \
              ELSE '' END",
        n = full_name
    )
}

/// Which legacy objects exist in the current schema
#[derive(Debug, Clone, Default)]
struct LegacyLayout {
    app_user: bool,
    app_user_facility: bool,
    app_user_password: bool,
    athlete: bool,
    athlete_status: bool,
    athlete_medical_notes: bool,
    athlete_internal_flags: bool,
    athlete_program: bool,
    athlete_program_iteration: bool,
    athlete_program_status: bool,
    athlete_program_enrolled_at: bool,
    family: bool,
    family_primary_user: bool,
    family_guardian: bool,
    family_guardian_user: bool,
    emergency_contact_athlete: bool,
    user_role_user: bool,
    family_status_function: bool,
}

impl LegacyLayout {
    async fn detect<C: ConnectionTrait>(db: &C) -> Result<Self, DbErr> {
        let probe = SchemaProbe::new(db);
        let app_user = probe.table_exists("app_user").await?;
        let athlete = probe.table_exists("athlete").await?;
        let athlete_program = probe.table_exists("athlete_program").await?;
        let family = probe.table_exists("family").await?;
        let family_guardian = probe.table_exists("family_guardian").await?;

        Ok(Self {
            app_user,
            app_user_facility: app_user && probe.column_exists("app_user", "facility_id").await?,
            app_user_password: app_user && probe.column_exists("app_user", "password_hash").await?,
            athlete,
            athlete_status: athlete && probe.column_exists("athlete", "status").await?,
            athlete_medical_notes: athlete && probe.column_exists("athlete", "medical_notes").await?,
            athlete_internal_flags: athlete && probe.column_exists("athlete", "internal_flags").await?,
            athlete_program,
            athlete_program_iteration: athlete_program
                && probe.column_exists("athlete_program", "class_iteration_id").await?,
            athlete_program_status: athlete_program && probe.column_exists("athlete_program", "status").await?,
            athlete_program_enrolled_at: athlete_program
                && probe.column_exists("athlete_program", "enrolled_at").await?,
            family,
            family_primary_user: family && probe.column_exists("family", "primary_user_id").await?,
            family_guardian,
            family_guardian_user: family_guardian && probe.column_exists("family_guardian", "user_id").await?,
            emergency_contact_athlete: probe.column_exists("emergency_contact", "athlete_id").await?,
            user_role_user: probe.column_exists("user_role", "user_id").await?,
            family_status_function: probe.function_exists("calculate_family_active_status").await?,
        })
    }
}

/// Runs the consolidation against one database
pub struct MemberConsolidator {
    db: DatabaseConnection,
}

impl MemberConsolidator {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Run all nine steps. With `dry_run` the transaction is rolled back
    /// after the last step, so the report shows what a real run would do.
    pub async fn run(&self, dry_run: bool) -> Result<MigrationSummary, ConsolidationError> {
        let mut summary = MigrationSummary::new(dry_run);
        info!(dry_run, "Starting member consolidation");

        let txn = self.db.get_connection().begin().await?;

        if let Err(e) = Self::run_steps(&txn, &mut summary).await {
            error!("Member consolidation failed, rolling back: {}", e);
            if let Err(rollback_err) = txn.rollback().await {
                warn!("Rollback after failed consolidation also failed: {}", rollback_err);
            }
            summary.complete(false);
            return Err(e);
        }

        if dry_run {
            txn.rollback().await?;
            info!("Dry run finished, all changes rolled back");
        } else {
            txn.commit().await?;
            info!("Member consolidation committed");
        }

        summary.complete(true);
        info!(
            members_inserted = summary.members_inserted(),
            total_migrated = summary.total_migrated(),
            duration_ms = summary.total_duration_ms,
            "Member consolidation finished"
        );
        Ok(summary)
    }

    async fn run_steps(txn: &DatabaseTransaction, summary: &mut MigrationSummary) -> Result<(), ConsolidationError> {
        prepare_columns(txn).await?;
        let layout = LegacyLayout::detect(txn).await?;
        debug!(?layout, "Detected legacy layout");

        summary.reports.push(timed(1, STEP_APP_USERS, step_app_users(txn, &layout)).await?);
        summary.reports.push(timed(2, STEP_ATHLETES, step_unlinked_athletes(txn, &layout)).await?);
        summary.reports.push(timed(3, STEP_LINKED_ATHLETES, step_linked_athletes(txn, &layout)).await?);
        summary.reports.push(timed(4, STEP_ENROLLMENTS, step_enrollments(txn, &layout)).await?);
        summary.reports.push(timed(5, STEP_FAMILY_LINKS, step_family_links(txn, &layout)).await?);
        summary.reports.push(timed(6, STEP_EMERGENCY_CONTACTS, step_emergency_contacts(txn, &layout)).await?);
        summary.reports.push(timed(7, STEP_USER_ROLES, step_user_roles(txn, &layout)).await?);
        summary.reports.push(timed(8, STEP_FAMILY_STATUS, step_family_status(txn, &layout)).await?);
        summary.reports.push(timed(9, STEP_GUARDIAN_AUTHORITY, step_guardian_authority(txn, &layout)).await?);

        Ok(())
    }
}

async fn timed<F>(step: u8, name: &'static str, fut: F) -> Result<MigrationReport, ConsolidationError>
where
    F: Future<Output = Result<MigrationReport, DbErr>>,
{
    let started = Instant::now();
    let mut report = fut
        .await
        .map_err(|source| ConsolidationError::StepFailed { step, name, source })?;
    report.duration_ms = started.elapsed().as_millis() as u64;

    match &report.skipped_reason {
        Some(reason) => info!(step, name, reason = reason.as_str(), "Step skipped"),
        None => info!(
            step,
            name,
            migrated = report.migrated_count,
            skipped = report.skipped_count,
            "Step complete"
        ),
    }
    Ok(report)
}

async fn exec<C: ConnectionTrait>(db: &C, sql: String) -> Result<u64, DbErr> {
    let result = db.execute(Statement::from_string(DbBackend::Postgres, sql)).await?;
    Ok(result.rows_affected())
}

fn or_null(present: bool, expr: &str) -> String {
    if present {
        expr.to_string()
    } else {
        "NULL".to_string()
    }
}

/// Add the member-based columns the steps write to, on tables that exist
async fn prepare_columns(txn: &DatabaseTransaction) -> Result<(), DbErr> {
    let probe = SchemaProbe::new(txn);
    let additions = [
        ("family", "primary_member_id"),
        ("family_guardian", "member_id"),
        ("emergency_contact", "member_id"),
        ("user_role", "member_id"),
    ];

    for (table, column) in additions {
        if probe.table_exists(table).await? {
            exec(txn, format!("ALTER TABLE {} ADD COLUMN IF NOT EXISTS {} INTEGER", table, column)).await?;
        }
    }
    Ok(())
}

/// Step 1: every `app_user` without a member row becomes one, keeping its id
async fn step_app_users(txn: &DatabaseTransaction, layout: &LegacyLayout) -> Result<MigrationReport, DbErr> {
    if !layout.app_user {
        return Ok(MigrationReport::skipped(1, STEP_APP_USERS, "app_user table not present"));
    }

    let total = SchemaProbe::new(txn).count("app_user").await?;
    let inserted = exec(
        txn,
        format!(
            "INSERT INTO member (id, facility_id, first_name, last_name, email, password_hash, \
                                 status, is_active, family_is_active, created_at, updated_at) \
             SELECT u.id, {facility}, {first}, {last}, lower(btrim(u.email)), {password}, \
                    CASE WHEN u.is_active THEN 'legacy' ELSE 'archived' END, \
                    COALESCE(u.is_active, FALSE), COALESCE(u.is_active, FALSE), NOW(), NOW() \
               FROM app_user u \
              WHERE NOT EXISTS (SELECT 1 FROM member m WHERE m.id = u.id)",
            facility = or_null(layout.app_user_facility, "u.facility_id"),
            first = first_name_sql("u.full_name", "u.email"),
            last = last_name_sql("u.full_name"),
            password = or_null(layout.app_user_password, "u.password_hash"),
        ),
    )
    .await?;

    // Explicit ids were inserted; move the sequence past them
    exec(
        txn,
        "SELECT setval(pg_get_serial_sequence('member', 'id'), \
                GREATEST((SELECT COALESCE(MAX(id), 0) FROM member), 1), \
                (SELECT COUNT(*) > 0 FROM member))"
            .to_string(),
    )
    .await?;

    let mut report = MigrationReport::new(1, STEP_APP_USERS);
    report.migrated_count = inserted;
    report.skipped_count = (total as u64).saturating_sub(inserted);
    Ok(report)
}

/// Step 2: athletes without a user link, unless their identity already exists
async fn step_unlinked_athletes(txn: &DatabaseTransaction, layout: &LegacyLayout) -> Result<MigrationReport, DbErr> {
    if !layout.athlete {
        return Ok(MigrationReport::skipped(2, STEP_ATHLETES, "athlete table not present"));
    }

    let probe = SchemaProbe::new(txn);
    let total = probe
        .scalar_i64("SELECT COUNT(*) AS value FROM athlete WHERE user_id IS NULL")
        .await?;

    let status = if layout.athlete_status {
        athlete_status_sql("a", "'active'")
    } else {
        "'active'".to_string()
    };

    let inserted = exec(
        txn,
        format!(
            "INSERT INTO member (family_id, first_name, last_name, date_of_birth, status, is_active, \
                                 family_is_active, medical_notes, internal_flags, created_at, updated_at) \
             SELECT family_id, first_name, last_name, date_of_birth, status, \
                    status IN {active}, status IN {active}, medical_notes, internal_flags, NOW(), NOW() \
               FROM ( \
                 SELECT DISTINCT ON (a.first_name, COALESCE(a.last_name, ''), a.date_of_birth, a.family_id) \
                        a.family_id, a.first_name, COALESCE(a.last_name, '') AS last_name, a.date_of_birth, \
                        {status} AS status, {notes} AS medical_notes, {flags} AS internal_flags \
                   FROM athlete a \
                  WHERE a.user_id IS NULL \
                    AND a.first_name IS NOT NULL \
                    AND NOT EXISTS (SELECT 1 FROM member m WHERE {identity}) \
                  ORDER BY a.first_name, COALESCE(a.last_name, ''), a.date_of_birth, a.family_id, a.id \
               ) candidates",
            active = ACTIVE_STATUSES,
            status = status,
            notes = or_null(layout.athlete_medical_notes, "a.medical_notes::text"),
            flags = or_null(layout.athlete_internal_flags, "a.internal_flags::text"),
            identity = identity_match("a", "m"),
        ),
    )
    .await?;

    let mut report = MigrationReport::new(2, STEP_ATHLETES);
    report.migrated_count = inserted;
    report.skipped_count = (total as u64).saturating_sub(inserted);
    Ok(report)
}

/// Step 3: fold linked athlete details into the member created from the user
async fn step_linked_athletes(txn: &DatabaseTransaction, layout: &LegacyLayout) -> Result<MigrationReport, DbErr> {
    if !layout.athlete {
        return Ok(MigrationReport::skipped(3, STEP_LINKED_ATHLETES, "athlete table not present"));
    }

    let status = if layout.athlete_status {
        athlete_status_sql("a", "m.status")
    } else {
        "m.status".to_string()
    };

    let updated = exec(
        txn,
        format!(
            "UPDATE member m \
                SET date_of_birth = COALESCE(m.date_of_birth, a.date_of_birth), \
                    family_id = COALESCE(m.family_id, a.family_id), \
                    medical_notes = COALESCE(m.medical_notes, {notes}), \
                    internal_flags = COALESCE(m.internal_flags, {flags}), \
                    status = {status}, \
                    is_active = ({status}) IN {active}, \
                    updated_at = NOW() \
               FROM athlete a \
              WHERE a.user_id IS NOT NULL \
                AND m.id = a.user_id",
            notes = or_null(layout.athlete_medical_notes, "a.medical_notes::text"),
            flags = or_null(layout.athlete_internal_flags, "a.internal_flags::text"),
            status = status,
            active = ACTIVE_STATUSES,
        ),
    )
    .await?;

    let mut report = MigrationReport::new(3, STEP_LINKED_ATHLETES);
    report.migrated_count = updated;
    Ok(report)
}

/// Step 4: enrollments, resolved to a member; unresolved and existing rows are skipped
async fn step_enrollments(txn: &DatabaseTransaction, layout: &LegacyLayout) -> Result<MigrationReport, DbErr> {
    if !layout.athlete_program || !layout.athlete {
        return Ok(MigrationReport::skipped(
            4,
            STEP_ENROLLMENTS,
            "athlete_program or athlete table not present",
        ));
    }

    let total = SchemaProbe::new(txn).count("athlete_program").await?;
    let iteration = or_null(layout.athlete_program_iteration, "ap.class_iteration_id");
    let status = if layout.athlete_program_status {
        "CASE WHEN lower(ap.status::text) IN ('active', 'waitlisted', 'completed', 'dropped') \
              THEN lower(ap.status::text) ELSE 'active' END"
            .to_string()
    } else {
        "'active'".to_string()
    };
    let enrolled_at = if layout.athlete_program_enrolled_at {
        "COALESCE(ap.enrolled_at::timestamptz, NOW())"
    } else {
        "NOW()"
    };

    let inserted = exec(
        txn,
        format!(
            "INSERT INTO member_program (member_id, program_id, class_iteration_id, status, enrolled_at, created_at) \
             SELECT DISTINCT ON (resolved.member_id, ap.program_id, {iteration}) \
                    resolved.member_id, ap.program_id, {iteration}, {status}, {enrolled_at}, NOW() \
               FROM athlete_program ap \
               JOIN athlete a ON a.id = ap.athlete_id \
               {lateral} \
              WHERE EXISTS (SELECT 1 FROM program p WHERE p.id = ap.program_id) \
                AND ({iteration} IS NULL OR EXISTS (SELECT 1 FROM class_iteration ci WHERE ci.id = {iteration})) \
                AND NOT EXISTS ( \
                    SELECT 1 FROM member_program mp \
                     WHERE mp.member_id = resolved.member_id \
                       AND mp.program_id = ap.program_id \
                       AND mp.class_iteration_id IS NOT DISTINCT FROM {iteration}) \
              ORDER BY resolved.member_id, ap.program_id, {iteration}, ap.id",
            iteration = iteration,
            status = status,
            enrolled_at = enrolled_at,
            lateral = resolve_member_lateral("a"),
        ),
    )
    .await?;

    let mut report = MigrationReport::new(4, STEP_ENROLLMENTS);
    report.migrated_count = inserted;
    report.skipped_count = (total as u64).saturating_sub(inserted);
    Ok(report)
}

/// Step 5: user-based family references become member-based
async fn step_family_links(txn: &DatabaseTransaction, layout: &LegacyLayout) -> Result<MigrationReport, DbErr> {
    if !layout.family_guardian_user && !layout.family_primary_user {
        return Ok(MigrationReport::skipped(
            5,
            STEP_FAMILY_LINKS,
            "no user-based family columns present",
        ));
    }

    let mut updated = 0;
    if layout.family_guardian_user {
        updated += exec(
            txn,
            "UPDATE family_guardian fg \
                SET member_id = fg.user_id \
              WHERE fg.member_id IS NULL \
                AND fg.user_id IS NOT NULL \
                AND EXISTS (SELECT 1 FROM member m WHERE m.id = fg.user_id)"
                .to_string(),
        )
        .await?;
    }
    if layout.family_primary_user {
        updated += exec(
            txn,
            "UPDATE family f \
                SET primary_member_id = f.primary_user_id \
              WHERE f.primary_member_id IS NULL \
                AND f.primary_user_id IS NOT NULL \
                AND EXISTS (SELECT 1 FROM member m WHERE m.id = f.primary_user_id)"
                .to_string(),
        )
        .await?;
    }

    let mut report = MigrationReport::new(5, STEP_FAMILY_LINKS);
    report.migrated_count = updated;
    Ok(report)
}

/// Step 6: emergency contacts keyed by athlete move to the athlete's member
async fn step_emergency_contacts(txn: &DatabaseTransaction, layout: &LegacyLayout) -> Result<MigrationReport, DbErr> {
    if !layout.emergency_contact_athlete || !layout.athlete {
        return Ok(MigrationReport::skipped(
            6,
            STEP_EMERGENCY_CONTACTS,
            "emergency_contact.athlete_id not present",
        ));
    }

    let updated = exec(
        txn,
        format!(
            "UPDATE emergency_contact ec \
                SET member_id = resolved.member_id \
               FROM athlete a \
               {lateral} \
              WHERE ec.athlete_id = a.id \
                AND ec.member_id IS NULL",
            lateral = resolve_member_lateral("a"),
        ),
    )
    .await?;

    let mut report = MigrationReport::new(6, STEP_EMERGENCY_CONTACTS);
    report.migrated_count = updated;
    Ok(report)
}

/// Step 7: role assignments keyed by user move to the member with the same id
async fn step_user_roles(txn: &DatabaseTransaction, layout: &LegacyLayout) -> Result<MigrationReport, DbErr> {
    if !layout.user_role_user {
        return Ok(MigrationReport::skipped(7, STEP_USER_ROLES, "user_role.user_id not present"));
    }

    let updated = exec(
        txn,
        "UPDATE user_role ur \
            SET member_id = ur.user_id \
          WHERE ur.member_id IS NULL \
            AND ur.user_id IS NOT NULL \
            AND EXISTS (SELECT 1 FROM member m WHERE m.id = ur.user_id)"
            .to_string(),
    )
    .await?;

    let mut report = MigrationReport::new(7, STEP_USER_ROLES);
    report.migrated_count = updated;
    Ok(report)
}

/// Step 8: recompute `member.family_is_active`
async fn step_family_status(txn: &DatabaseTransaction, layout: &LegacyLayout) -> Result<MigrationReport, DbErr> {
    if !layout.family_status_function {
        return Ok(MigrationReport::skipped(
            8,
            STEP_FAMILY_STATUS,
            "calculate_family_active_status() not installed; run `gymdesk db init`",
        ));
    }

    exec(txn, "SELECT calculate_family_active_status()".to_string()).await?;

    let mut report = MigrationReport::new(8, STEP_FAMILY_STATUS);
    report.migrated_count = SchemaProbe::new(txn)
        .scalar_i64("SELECT COUNT(*) AS value FROM member WHERE family_id IS NOT NULL")
        .await? as u64;
    Ok(report)
}

/// Step 9: guardian authority for every guardian-to-minor pair in a family
async fn step_guardian_authority(txn: &DatabaseTransaction, layout: &LegacyLayout) -> Result<MigrationReport, DbErr> {
    let mut sources = Vec::new();
    if layout.family_guardian {
        sources.push(
            "SELECT fg.family_id, fg.member_id AS guardian_id FROM family_guardian fg WHERE fg.member_id IS NOT NULL",
        );
    }
    if layout.family {
        sources.push(
            "SELECT f.id AS family_id, f.primary_member_id AS guardian_id FROM family f \
             WHERE f.primary_member_id IS NOT NULL",
        );
    }
    if sources.is_empty() {
        return Ok(MigrationReport::skipped(
            9,
            STEP_GUARDIAN_AUTHORITY,
            "no family or family_guardian table present",
        ));
    }

    let inserted = exec(
        txn,
        format!(
            "INSERT INTO parent_guardian_authority (guardian_member_id, minor_member_id, family_id, authority_type, created_at) \
             SELECT DISTINCT g.guardian_id, minor.id, g.family_id, 'parent', NOW() \
               FROM ({sources}) g \
               JOIN member minor ON minor.family_id = g.family_id \
              WHERE minor.id <> g.guardian_id \
                AND minor.date_of_birth IS NOT NULL \
                AND minor.date_of_birth > CURRENT_DATE - INTERVAL '18 years' \
                AND EXISTS (SELECT 1 FROM member gm WHERE gm.id = g.guardian_id) \
                AND NOT EXISTS ( \
                    SELECT 1 FROM parent_guardian_authority pga \
                     WHERE pga.guardian_member_id = g.guardian_id \
                       AND pga.minor_member_id = minor.id)",
            sources = sources.join(" UNION "),
        ),
    )
    .await?;

    let mut report = MigrationReport::new(9, STEP_GUARDIAN_AUTHORITY);
    report.migrated_count = inserted;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_match_treats_nulls_as_equal() {
        let sql = identity_match("a", "m");
        assert!(sql.contains("m.first_name = a.first_name"));
        assert!(sql.contains("m.date_of_birth IS NOT DISTINCT FROM a.date_of_birth"));
        assert!(sql.contains("m.family_id IS NOT DISTINCT FROM a.family_id"));
    }

    #[test]
    fn test_resolver_prefers_user_link() {
        let sql = resolve_member_lateral("a");
        assert!(sql.starts_with("CROSS JOIN LATERAL"));
        assert!(sql.contains("a.user_id IS NOT NULL AND m.id = a.user_id"));
        assert!(sql.contains("ORDER BY m.id LIMIT 1"));
        assert!(sql.ends_with("resolved"));
    }

    #[test]
    fn test_status_mapping_uses_fallback_for_null() {
        let sql = athlete_status_sql("a", "m.status");
        assert!(sql.starts_with("CASE WHEN a.status IS NULL THEN m.status"));
        assert!(sql.contains("IN ('archived', 'deleted') THEN 'archived'"));
        assert!(sql.contains("ELSE 'inactive'"));
    }

    #[test]
    fn test_name_split_on_first_space() {
        let first = first_name_sql("u.full_name", "u.email");
        let last = last_name_sql("u.full_name");
        assert!(first.contains("split_part(btrim(u.full_name), ' ', 1)"));
        assert!(last.contains("position(' ' IN btrim(u.full_name)) + 1"));
    }

    #[test]
    fn test_or_null() {
        assert_eq!(or_null(true, "a.medical_notes::text"), "a.medical_notes::text");
        assert_eq!(or_null(false, "a.medical_notes::text"), "NULL");
    }
}
