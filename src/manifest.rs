//! The manifest: final, filtered, sorted list of paths to archive.

use anyhow::Result;
use serde::Serialize;
use std::os::unix::ffi::OsStrExt;
use std::path::PathBuf;
use tracing::info;

use crate::closure::{expand_seeds, ClosureWalker, OutputFilter, Seed, WalkStats};
use crate::oracle::SystemOracle;
use crate::timing::Timer;

/// Result of resolving a seed set.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub paths: Vec<PathBuf>,
    #[serde(flatten)]
    pub stats: WalkStats,
    /// Accepted paths dropped by the output filter
    pub filtered: usize,
}

impl Manifest {
    /// Expand seeds, walk the closure and apply the output filter.
    pub fn build<O: SystemOracle>(oracle: O, seeds: &[Seed], filter: &OutputFilter) -> Result<Self> {
        let timer = Timer::start("resolve closure");

        let initial = expand_seeds(&oracle, seeds)?;
        let (accepted, stats) = ClosureWalker::new(oracle).resolve_with_stats(initial)?;

        let total = accepted.len();
        let paths = filter.finalize(accepted);
        let filtered = total - paths.len();

        timer.finish();
        info!(
            "manifest: {} paths ({} filtered, {} seeds)",
            paths.len(),
            filtered,
            stats.seeds
        );

        Ok(Self {
            paths,
            stats,
            filtered,
        })
    }

    /// One path per line, as consumed by the archiver.
    ///
    /// Raw bytes, so non-UTF-8 file names survive unchanged.
    pub fn to_lines(&self) -> Vec<u8> {
        let mut out = Vec::new();
        for path in &self.paths {
            out.extend_from_slice(path.as_os_str().as_bytes());
            out.push(b'\n');
        }
        out
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
