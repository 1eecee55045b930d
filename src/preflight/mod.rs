//! Preflight checks.
//!
//! Verifies the oracles and the destination before an export. Run with
//! `slimroot preflight` to see what is missing.

mod host_tools;
mod types;

use std::path::Path;

use anyhow::{bail, Result};

use crate::config::Config;

pub use types::{CheckResult, CheckStatus, PreflightReport};

/// Run all preflight checks.
pub fn run_preflight(config: &Config, dest: &Path, packages_requested: bool) -> PreflightReport {
    let mut checks = vec![host_tools::check_linker(config)];
    checks.extend(host_tools::check_package_backends(config, packages_requested));
    checks.push(host_tools::check_destination(dest));
    PreflightReport { checks }
}

/// Run preflight, print the report, and bail if any check failed.
pub fn run_preflight_or_fail(config: &Config, dest: &Path, packages_requested: bool) -> Result<()> {
    let report = run_preflight(config, dest, packages_requested);
    report.print();

    if !report.all_passed() {
        bail!(
            "Preflight failed: {} check(s) failed. Fix the issues above before exporting.",
            report.fail_count()
        );
    }
    Ok(())
}
