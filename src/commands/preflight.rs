//! Preflight command - runs preflight checks.

use anyhow::Result;
use std::path::Path;

use crate::config::Config;
use crate::preflight;

/// Execute the preflight command.
pub fn cmd_preflight(config: &Config, dest: &Path, packages_requested: bool, strict: bool) -> Result<()> {
    if strict {
        preflight::run_preflight_or_fail(config, dest, packages_requested)?;
    } else {
        let report = preflight::run_preflight(config, dest, packages_requested);
        report.print();
        if !report.all_passed() {
            println!("Some checks failed. Use --strict to exit non-zero.");
        }
    }
    Ok(())
}
