//! Seeds: where a closure starts.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::oracle::SystemOracle;

/// A starting point for the closure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Seed {
    /// Installed package, expanded to the files it owns
    Package(String),
    /// Explicit path, taken literally (no globbing)
    File(PathBuf),
}

/// Files owned by `package`, without directory entries.
///
/// Directories are not independently meaningful: the package listing
/// already names every file inside them.
pub fn list_package_files<O: SystemOracle + ?Sized>(oracle: &O, package: &str) -> Result<Vec<PathBuf>> {
    let listed = oracle
        .list_package_files(package)
        .with_context(|| format!("Failed to list files of package '{}'", package))?;

    let total = listed.len();
    let files: Vec<PathBuf> = listed.into_iter().filter(|p| !is_directory(p)).collect();
    debug!(
        "package '{}': {} files ({} directories skipped)",
        package,
        files.len(),
        total - files.len()
    );
    Ok(files)
}

/// Turn seeds into the walker's initial worklist, in seed order.
pub fn expand_seeds<O: SystemOracle + ?Sized>(oracle: &O, seeds: &[Seed]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for seed in seeds {
        match seed {
            Seed::Package(name) => paths.extend(list_package_files(oracle, name)?),
            Seed::File(path) => paths.push(path.clone()),
        }
    }
    Ok(paths)
}

/// Build the seed list from CLI-style inputs: packages first, then files.
pub fn seeds_from(packages: &[String], files: &[PathBuf]) -> Vec<Seed> {
    packages
        .iter()
        .map(|p| Seed::Package(p.clone()))
        .chain(files.iter().map(|f| Seed::File(f.clone())))
        .collect()
}

/// Real directory, not a symlink pointing at one.
fn is_directory(path: &Path) -> bool {
    fs::symlink_metadata(path)
        .map(|m| m.file_type().is_dir())
        .unwrap_or(false)
}
