//! Oracle backed by the host's package manager and dynamic linker.

use anyhow::Result;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::{PackageBackend, SystemOracle};
use crate::closure::libdeps::parse_ldd_output;
use crate::config::Config;
use crate::process::{self, Cmd};

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

/// Runs `dpkg`/`rpm` and `ldd` on the host.
#[derive(Debug, Clone)]
pub struct HostOracle {
    ldd: String,
    backends: Vec<PackageBackend>,
}

impl HostOracle {
    pub fn new(ldd: impl Into<String>, backends: Vec<PackageBackend>) -> Self {
        Self {
            ldd: ldd.into(),
            backends,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.ldd.clone(), config.package_backends.clone())
    }

    /// Configured backends whose tool is installed, in preference order.
    pub fn available_backends(&self) -> Vec<PackageBackend> {
        self.backends
            .iter()
            .copied()
            .filter(|b| process::exists(b.program()))
            .collect()
    }
}

impl SystemOracle for HostOracle {
    /// Query each installed backend in order until one reports files.
    ///
    /// Fallback happens per package: a backend that exits non-zero or lists
    /// nothing for this package hands over to the next one. With no backend
    /// installed the package simply owns nothing; `preflight` reports that.
    fn list_package_files(&self, package: &str) -> Result<Vec<PathBuf>> {
        let available = self.available_backends();
        if available.is_empty() {
            let tried: Vec<_> = self.backends.iter().map(|b| b.program()).collect();
            warn!(
                "package '{}' skipped: no package manager found (tried: {})",
                package,
                tried.join(", ")
            );
            return Ok(Vec::new());
        }

        for backend in available {
            let result = Cmd::new(backend.program())
                .args(backend.list_args())
                .arg(package)
                .allow_fail()
                .run()?;

            if !result.success() {
                debug!(
                    "{}: package '{}' not found (exit code {})",
                    backend,
                    package,
                    result.code()
                );
                continue;
            }

            let files = parse_package_listing(&result.stdout);
            if files.is_empty() {
                debug!("{}: package '{}' lists no files", backend, package);
                continue;
            }

            debug!("{}: package '{}' owns {} paths", backend, package, files.len());
            return Ok(files);
        }

        debug!("no backend knows package '{}'", package);
        Ok(Vec::new())
    }

    fn list_dynamic_dependencies(&self, path: &Path) -> Result<Vec<PathBuf>> {
        // ldd on a text file is a wasted spawn; it would answer "not a dynamic executable"
        if !is_elf(path) {
            return Ok(Vec::new());
        }

        let result = Cmd::new(&self.ldd).arg_path(path).allow_fail().run()?;
        if !result.success() {
            debug!("{}: not a dynamic executable", path.display());
            return Ok(Vec::new());
        }

        Ok(parse_ldd_output(&result.stdout))
    }
}

/// Extract absolute paths from a package manager's file listing.
///
/// `dpkg -L` mixes in diversion notes ("diverted by ... to: /path") and
/// `rpm -ql` prints "(contains no files)"; only lines that are themselves
/// absolute paths count.
pub fn parse_package_listing(output: &str) -> Vec<PathBuf> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with('/'))
        .map(PathBuf::from)
        .collect()
}

fn is_elf(path: &Path) -> bool {
    let mut magic = [0u8; 4];
    match File::open(path) {
        Ok(mut file) => file.read_exact(&mut magic).is_ok() && magic == ELF_MAGIC,
        Err(_) => false,
    }
}
