//! Unpack command - extracts an archive stream from stdin.

use anyhow::Result;
use std::io::BufReader;
use std::path::Path;
use tracing::info;

use super::require_destination;
use crate::archive::{extract_archive, ExtractFilter};

/// Execute the unpack command.
pub fn cmd_unpack(dest: &Path, removals: &[String]) -> Result<()> {
    require_destination(dest)?;
    let exclude = ExtractFilter::new(removals)?;

    let stdin = std::io::stdin().lock();
    let stats = extract_archive(BufReader::new(stdin), dest, &exclude)?;
    info!(
        "unpacked {} entries into {} ({} excluded)",
        stats.extracted,
        dest.display(),
        stats.excluded
    );
    Ok(())
}
