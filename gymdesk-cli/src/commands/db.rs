//! `gymdesk db ...`

use anyhow::{bail, Context, Result};
use gymdesk_config::GymdeskConfig;
use gymdesk_storage::migration::{verify_consolidation, LegacyCleanup, MemberConsolidator};
use gymdesk_storage::sql_runner::SqlRunner;
use std::path::Path;
use tracing::info;

use super::connect;
use crate::report;

pub async fn handle_init(config: &GymdeskConfig) -> Result<()> {
    let db = connect(config).await?;
    db.migrate().await.context("Schema migration failed")?;

    report::print_migration_status(&db.migration_status().await?);
    Ok(())
}

pub async fn handle_status(config: &GymdeskConfig) -> Result<()> {
    let db = connect(config).await?;
    report::print_migration_status(&db.migration_status().await?);
    Ok(())
}

pub async fn handle_run_sql(config: &GymdeskConfig, file: &Path) -> Result<()> {
    let db = connect(config).await?;
    let result = SqlRunner::new(db)
        .run_file(file)
        .await
        .with_context(|| format!("{} was rolled back", file.display()))?;

    report::success(format!(
        "{} committed: {} row(s) affected in {} ms",
        result.path.display(),
        result.rows_affected,
        result.duration_ms
    ));
    Ok(())
}

pub async fn handle_consolidate(config: &GymdeskConfig, dry_run: bool) -> Result<()> {
    let db = connect(config).await?;
    // Target tables and helper columns come from the schema migrations
    db.migrate().await.context("Schema migration failed")?;

    info!("Consolidating legacy identities (dry run: {})", dry_run);
    let summary = MemberConsolidator::new(db.clone())
        .run(dry_run)
        .await
        .context("Member consolidation failed, all changes were rolled back")?;
    report::print_summary(&summary);

    if dry_run {
        report::warning("Dry run: nothing was committed");
        return Ok(());
    }

    let verification = verify_consolidation(db.get_connection()).await?;
    report::print_verification(&verification);
    if !verification.passed() {
        bail!("Consolidation committed but verification reported unmigrated rows");
    }
    Ok(())
}

pub async fn handle_cleanup(config: &GymdeskConfig, force: bool, yes: bool) -> Result<()> {
    if !yes {
        bail!("Refusing to drop legacy tables without --yes");
    }

    let db = connect(config).await?;
    let cleanup = LegacyCleanup::new(db).run(force).await?;
    report::print_cleanup(&cleanup);
    Ok(())
}
