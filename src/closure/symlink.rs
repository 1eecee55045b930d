//! Symlink edges.
//!
//! A symlink contributes one edge: link → target. Symlinked directories
//! on the way to a path (`/lib64 -> usr/lib64`) are nodes too, so the
//! exported tree resolves the same names the host does.

use std::fs;
use std::path::{Component, Path, PathBuf};

/// Single-level symlink resolution.
#[derive(Debug, Default, Clone, Copy)]
pub struct SymlinkExpander;

impl SymlinkExpander {
    pub fn new() -> Self {
        Self
    }

    /// Target of `path` if it is a symlink, as an absolute path.
    ///
    /// Relative targets are taken relative to the directory holding the
    /// link. The target is not followed further; the walker expands it
    /// again when it pops it.
    pub fn expand(&self, path: &Path) -> Option<PathBuf> {
        let meta = fs::symlink_metadata(path).ok()?;
        if !meta.file_type().is_symlink() || meta.len() == 0 {
            return None;
        }

        let target = fs::read_link(path).ok()?;
        let resolved = if target.is_absolute() {
            target
        } else {
            path.parent().unwrap_or_else(|| Path::new("/")).join(target)
        };
        Some(clean(&resolved))
    }

    /// Ancestor directories of `path` that are themselves symlinks.
    ///
    /// `path` should be absolute. The path itself is not included.
    pub fn symlinked_ancestors(&self, path: &Path) -> Vec<PathBuf> {
        path.ancestors()
            .skip(1)
            .filter(|dir| dir.parent().is_some())
            .filter(|dir| {
                fs::symlink_metadata(dir)
                    .map(|m| m.file_type().is_symlink())
                    .unwrap_or(false)
            })
            .map(Path::to_path_buf)
            .collect()
    }
}

/// Drop `.` and redundant separators without touching the filesystem.
///
/// `..` is kept: resolving it lexically would be wrong across symlinks,
/// and normalization resolves it physically later.
fn clean(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}
