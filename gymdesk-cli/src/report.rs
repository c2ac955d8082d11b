//! Console rendering of command results

use colored::Colorize;
use gymdesk_storage::diagnostics::DiagnosticFinding;
use gymdesk_storage::migration::{CleanupReport, ConsolidationVerification, MigrationSummary};
use gymdesk_storage::MigrationState;

pub fn success(message: impl AsRef<str>) {
    println!("{} {}", "✓".green().bold(), message.as_ref());
}

pub fn warning(message: impl AsRef<str>) {
    println!("{} {}", "!".yellow().bold(), message.as_ref());
}

pub fn failure(message: impl AsRef<str>) {
    println!("{} {}", "✗".red().bold(), message.as_ref());
}

pub fn print_migration_status(states: &[MigrationState]) {
    println!("{}", "Schema migrations".bold());
    for state in states {
        let marker = if state.applied {
            "applied".green()
        } else {
            "pending".yellow()
        };
        println!("  {:<8} {}", marker, state.name);
    }

    let pending = states.iter().filter(|s| !s.applied).count();
    if pending == 0 {
        success("Schema is up to date");
    } else {
        warning(format!("{} migration(s) pending", pending));
    }
}

pub fn print_summary(summary: &MigrationSummary) {
    let title = if summary.dry_run {
        "Member consolidation (dry run, rolled back)"
    } else {
        "Member consolidation"
    };
    println!("{}", title.bold());
    println!(
        "  {:<4} {:<40} {:>9} {:>9} {:>8}",
        "step", "name", "migrated", "skipped", "ms"
    );

    for report in &summary.reports {
        match &report.skipped_reason {
            Some(reason) => println!(
                "  {:<4} {:<40} {}",
                report.step,
                report.name,
                format!("skipped: {}", reason).dimmed()
            ),
            None => println!(
                "  {:<4} {:<40} {:>9} {:>9} {:>8}",
                report.step, report.name, report.migrated_count, report.skipped_count, report.duration_ms
            ),
        }
    }

    println!(
        "  {} rows migrated, {} skipped, {} members inserted in {} ms",
        summary.total_migrated(),
        summary.total_skipped(),
        summary.members_inserted(),
        summary.total_duration_ms
    );
}

pub fn print_verification(verification: &ConsolidationVerification) {
    if verification.passed() {
        success("Verification passed: every legacy row has a unified counterpart");
        return;
    }

    failure(format!(
        "Verification found {} unmigrated row(s)",
        verification.problems()
    ));
    for line in verification.describe() {
        println!("    - {}", line);
    }
}

pub fn print_cleanup(report: &CleanupReport) {
    if report.is_noop() {
        success("No legacy objects left to drop");
        return;
    }

    if report.forced {
        warning("Verification was bypassed with --force");
    }
    for table in &report.dropped_tables {
        println!("  dropped table  {}", table);
    }
    for column in &report.dropped_columns {
        println!("  dropped column {}", column);
    }
    success("Legacy cleanup committed");
}

pub fn print_finding(finding: &DiagnosticFinding) {
    let status = if finding.check.is_informational() {
        "INFO".cyan()
    } else if finding.passed() {
        "PASS".green()
    } else {
        "FAIL".red()
    };

    println!("{} {}", status.bold(), finding.check.as_str().bold());
    if !finding.check.is_informational() && !finding.passed() {
        println!("    {} problem(s)", finding.problems);
    }
    for detail in &finding.details {
        println!("    {}", detail);
    }
}
