//! Export command - full pipeline into a destination directory.

use anyhow::{Context, Result};
use std::io::{BufReader, Seek, SeekFrom};
use std::path::Path;
use tracing::info;

use super::{output_filter, require_destination, Selection};
use crate::archive::{extract_archive, write_archive, ExtractFilter};
use crate::config::Config;
use crate::manifest::Manifest;
use crate::oracle::{HostOracle, SystemOracle};
use crate::timing::Timer;

/// Execute the export command against the host's oracles.
pub fn cmd_export(config: &Config, dest: &Path, selection: &Selection, removals: &[String]) -> Result<()> {
    let oracle = HostOracle::from_config(config);
    export_with(&oracle, config, dest, selection, removals)
}

/// Resolve the closure, spool it as an archive stream and unpack it.
///
/// The stream holds the whole manifest; removal patterns are applied only
/// while unpacking.
pub fn export_with<O: SystemOracle>(
    oracle: O,
    config: &Config,
    dest: &Path,
    selection: &Selection,
    removals: &[String],
) -> Result<()> {
    require_destination(dest)?;
    let exclude = ExtractFilter::new(removals)?;

    let manifest = Manifest::build(oracle, &selection.seeds(), &output_filter(config))?;

    let timer = Timer::start("pack");
    let mut spool = tempfile::tempfile().context("Failed to create archive spool file")?;
    let packed = write_archive(&manifest.paths, &mut spool)?;
    spool
        .seek(SeekFrom::Start(0))
        .context("Failed to rewind archive spool file")?;
    timer.finish();

    let timer = Timer::start("unpack");
    let unpacked = extract_archive(BufReader::new(spool), dest, &exclude)?;
    timer.finish();

    info!(
        "exported {} of {} entries ({} bytes) into {}",
        unpacked.extracted,
        packed.entries,
        packed.bytes,
        dest.display()
    );
    Ok(())
}
