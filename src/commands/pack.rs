//! Pack command - writes the archive stream to stdout.

use anyhow::{bail, Result};
use std::io::{BufWriter, IsTerminal};

use super::{output_filter, Selection};
use crate::archive::write_archive;
use crate::config::Config;
use crate::manifest::Manifest;
use crate::oracle::HostOracle;

/// Execute the pack command.
pub fn cmd_pack(config: &Config, selection: &Selection) -> Result<()> {
    let stdout = std::io::stdout();
    if stdout.is_terminal() {
        bail!("Refusing to write a compressed archive to a terminal. Redirect stdout.");
    }

    let oracle = HostOracle::from_config(config);
    let manifest = Manifest::build(&oracle, &selection.seeds(), &output_filter(config))?;
    write_archive(&manifest.paths, BufWriter::new(stdout.lock()))?;
    Ok(())
}
