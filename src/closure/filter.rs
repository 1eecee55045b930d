//! Manifest-time filtering.
//!
//! Documentation and manual pages are never needed at runtime, so they
//! are dropped from the closure before anything is archived. User removal
//! patterns are a different stage (see `archive::ExtractFilter`) and only
//! apply when unpacking.

use std::path::{Path, PathBuf};

/// Trees removed from every manifest.
pub const DOC_PREFIXES: &[&str] = &["/usr/share/doc", "/usr/share/man"];

/// Prefix filter applied to the closure result.
#[derive(Debug, Clone)]
pub struct OutputFilter {
    prefixes: Vec<PathBuf>,
}

impl Default for OutputFilter {
    fn default() -> Self {
        Self::new(DOC_PREFIXES.iter().map(PathBuf::from))
    }
}

impl OutputFilter {
    pub fn new(prefixes: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            prefixes: prefixes.into_iter().collect(),
        }
    }

    /// Filter that removes nothing.
    pub fn keep_all() -> Self {
        Self::new(std::iter::empty())
    }

    /// True if `path` lies in (or is) one of the removed trees.
    ///
    /// Matching is per component: `/usr/share/docs` is not under
    /// `/usr/share/doc`.
    pub fn excludes(&self, path: &Path) -> bool {
        self.prefixes.iter().any(|prefix| path.starts_with(prefix))
    }

    /// Sort, deduplicate and drop excluded paths.
    pub fn finalize(&self, paths: impl IntoIterator<Item = PathBuf>) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = paths.into_iter().filter(|p| !self.excludes(p)).collect();
        paths.sort();
        paths.dedup();
        paths
    }
}
