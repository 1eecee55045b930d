//! Path normalization and the visited set.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// `path` joined onto the working directory unless already absolute.
///
/// Purely lexical; nothing is resolved.
pub fn absolute(path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        Some(path.to_path_buf())
    } else {
        std::env::current_dir().ok().map(|cwd| cwd.join(path))
    }
}

/// Canonical dedup key for `path`.
///
/// The path is made absolute against the working directory, its parent
/// directory is fully resolved (symlinks, `.`, `..`), and the final
/// component is kept as-is: if it is a symlink, the link itself is the node
/// and its target is a separate node.
///
/// Returns `None` when the parent directory does not exist.
pub fn normalize(path: &Path) -> Option<PathBuf> {
    let absolute = absolute(path)?;

    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => Some(fs::canonicalize(parent).ok()?.join(name)),
        // "/" or a path ending in ".."
        _ => fs::canonicalize(&absolute).ok(),
    }
}

/// Append-only record of accepted paths.
///
/// Keeps insertion order for emission and a hash set for membership.
#[derive(Debug, Default)]
pub struct VisitedTracker {
    order: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl VisitedTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` if it exists and has not been accepted before.
    ///
    /// `path` must already be normalized. Existence is checked with
    /// `lstat`, so a dangling symlink is still accepted.
    pub fn accept(&mut self, path: &Path) -> bool {
        if self.seen.contains(path) || fs::symlink_metadata(path).is_err() {
            return false;
        }
        self.seen.insert(path.to_path_buf());
        self.order.push(path.to_path_buf());
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains(path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Accepted paths in acceptance order.
    pub fn paths(&self) -> &[PathBuf] {
        &self.order
    }

    pub fn into_paths(self) -> Vec<PathBuf> {
        self.order
    }
}
