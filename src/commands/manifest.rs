//! Manifest command - prints the resolved path list.

use anyhow::Result;
use std::io::Write;

use super::{output_filter, Selection};
use crate::config::Config;
use crate::manifest::Manifest;
use crate::oracle::HostOracle;

/// Execute the manifest command.
pub fn cmd_manifest(config: &Config, selection: &Selection, json: bool) -> Result<()> {
    let oracle = HostOracle::from_config(config);
    let manifest = Manifest::build(&oracle, &selection.seeds(), &output_filter(config))?;

    let mut stdout = std::io::stdout().lock();
    if json {
        writeln!(stdout, "{}", manifest.to_json()?)?;
    } else {
        stdout.write_all(&manifest.to_lines())?;
    }
    stdout.flush()?;
    Ok(())
}
