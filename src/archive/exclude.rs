//! Unpack-time exclusions (`-r` patterns).

use anyhow::{Context, Result};
use glob::Pattern;
use std::path::{Component, Path, PathBuf};

/// Patterns removed while unpacking.
///
/// Patterns containing `/` are anchored at the destination; a leading `/`
/// is stripped so `-r /usr/share/locale` and `-r usr/share/locale` are the
/// same rule. A pattern without `/` (`-r locale`, `-r '*.a'`) matches any
/// single component, as tar's `--exclude` does. A pattern matching a
/// directory excludes everything beneath it.
#[derive(Debug, Clone, Default)]
pub struct ExtractFilter {
    anchored: Vec<Pattern>,
    components: Vec<Pattern>,
}

impl ExtractFilter {
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut filter = Self::default();
        for raw in patterns {
            let raw = raw.as_ref();
            let trimmed = raw.trim().trim_start_matches('/').trim_end_matches('/');
            if trimmed.is_empty() {
                continue;
            }
            let pattern = Pattern::new(trimmed)
                .with_context(|| format!("Invalid removal pattern '{}'", raw))?;
            if trimmed.contains('/') {
                filter.anchored.push(pattern);
            } else {
                filter.components.push(pattern);
            }
        }
        Ok(filter)
    }

    pub fn is_empty(&self) -> bool {
        self.anchored.is_empty() && self.components.is_empty()
    }

    /// True if the archive member `name` (or a directory above it) matches.
    pub fn excludes(&self, name: &Path) -> bool {
        if self.is_empty() {
            return false;
        }
        let relative = relative_name(name);

        let by_component = relative.components().any(|c| {
            let component = c.as_os_str().to_string_lossy();
            self.components.iter().any(|pat| pat.matches(&component))
        });

        by_component
            || relative
                .ancestors()
                .filter(|p| !p.as_os_str().is_empty())
                .any(|candidate| self.anchored.iter().any(|pat| pat.matches_path(candidate)))
    }
}

/// Strip root and `./` prefixes from an archive member name.
fn relative_name(name: &Path) -> PathBuf {
    name.components()
        .filter(|c| matches!(c, Component::Normal(_) | Component::ParentDir))
        .collect()
}
