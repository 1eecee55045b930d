//! CLI command handlers.
//!
//! Each submodule handles a specific CLI command:
//! - `export` - resolve, pack and unpack into a destination in one go
//! - `manifest` - print the resolved manifest
//! - `pack` - write the archive stream to stdout
//! - `unpack` - extract an archive stream from stdin
//! - `preflight` - check oracles and destination
//! - `show` - display configuration

pub mod export;
pub mod manifest;
pub mod pack;
mod preflight;
pub mod show;
pub mod unpack;

pub use export::cmd_export;
pub use manifest::cmd_manifest;
pub use pack::cmd_pack;
pub use preflight::cmd_preflight;
pub use show::cmd_show;
pub use unpack::cmd_unpack;

use anyhow::{bail, Result};
use std::path::{Path, PathBuf};

use crate::closure::{seeds_from, OutputFilter, Seed};
use crate::config::Config;

/// Packages and explicit files requested on the command line.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub packages: Vec<String>,
    pub files: Vec<PathBuf>,
}

impl Selection {
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty() && self.files.is_empty()
    }

    pub fn seeds(&self) -> Vec<Seed> {
        seeds_from(&self.packages, &self.files)
    }
}

/// Manifest-time filter for this configuration.
pub fn output_filter(config: &Config) -> OutputFilter {
    if config.keep_docs {
        OutputFilter::keep_all()
    } else {
        OutputFilter::default()
    }
}

/// The destination must already exist; it is never created.
pub fn require_destination(dest: &Path) -> Result<()> {
    if !dest.is_dir() {
        bail!(
            "Destination directory {} does not exist. Create it first or pass -d.",
            dest.display()
        );
    }
    Ok(())
}
