//! Dynamic-library edges.
//!
//! The linker oracle (`ldd` on the host) is the only thing that knows
//! where a binary's libraries resolve to; this module turns its output
//! into paths and filters out what cannot be a file.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::oracle::SystemOracle;

/// Parse ldd output into absolute library paths.
///
/// ```text
///     linux-vdso.so.1 (0x00007ffee9bfe000)
///     libc.so.6 => /lib64/libc.so.6 (0x00007f1234000000)
///     /lib64/ld-linux-x86-64.so.2 (0x00007f1234500000)
///     libfoo.so.1 => not found
///     statically linked
/// ```
///
/// The resolved path after `=>` wins over the soname before it. Virtual
/// objects (vdso), unresolved libraries and marker lines contribute
/// nothing.
pub fn parse_ldd_output(output: &str) -> Vec<PathBuf> {
    let mut libs: Vec<PathBuf> = Vec::new();

    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line.contains("statically linked") {
            continue;
        }

        let candidate = match line.split_once("=>") {
            Some((name, resolved)) => {
                let resolved = resolved.split_whitespace().next().unwrap_or("");
                if resolved == "not" {
                    debug!("library {} not found by linker", name.trim());
                    continue;
                }
                resolved
            }
            None => line.split_whitespace().next().unwrap_or(""),
        };

        if candidate.starts_with('/') {
            let path = PathBuf::from(candidate);
            if !libs.contains(&path) {
                libs.push(path);
            }
        }
    }

    libs
}

/// Yields the libraries a file links against.
pub struct DynamicDependencyExpander<O> {
    oracle: O,
}

impl<O: SystemOracle> DynamicDependencyExpander<O> {
    pub fn new(oracle: O) -> Self {
        Self { oracle }
    }

    /// Libraries `path` links against, or nothing for anything that is not
    /// a non-empty regular file.
    ///
    /// Symlinks are skipped: their target is a node of its own and gets
    /// asked instead.
    pub fn expand(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let meta = match fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(_) => return Ok(Vec::new()),
        };
        if !meta.file_type().is_file() || meta.len() == 0 {
            return Ok(Vec::new());
        }

        let libs = self.oracle.list_dynamic_dependencies(path)?;
        Ok(libs.into_iter().filter(|lib| lib.is_absolute()).collect())
    }
}
