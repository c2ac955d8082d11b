use anyhow::{anyhow, bail, Result};
use gymdesk_config::GymdeskConfig;
use gymdesk_storage::diagnostics::{DiagnosticCheck, Diagnostics};

use super::connect;
use crate::report;

/// `all` or a single check name
pub fn parse_checks(name: &str) -> Result<Vec<DiagnosticCheck>> {
    if name.trim().eq_ignore_ascii_case("all") {
        return Ok(DiagnosticCheck::ALL.to_vec());
    }
    let check = name.parse::<DiagnosticCheck>().map_err(|e| anyhow!(e))?;
    Ok(vec![check])
}

pub async fn handle_diagnose(config: &GymdeskConfig, name: &str) -> Result<()> {
    let checks = parse_checks(name)?;
    let db = connect(config).await?;
    let diagnostics = Diagnostics::new(db.get_connection());

    let mut failed = 0;
    for check in checks {
        let finding = diagnostics.run(check).await?;
        report::print_finding(&finding);
        if !finding.passed() {
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} check(s) found problems", failed);
    }
    report::success("All checks passed");
    Ok(())
}
