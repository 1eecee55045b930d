//! Closure walker: worklist traversal to fixpoint.
//!
//! ```text
//! pop path ──normalize──> accept? ──no──> skip
//!                            │
//!                           yes
//!                            ├── symlink target        ──> push
//!                            └── linked libraries      ──> push
//! ```
//!
//! The visited set only grows and an accepted path is never expanded
//! twice, so the walk terminates on any finite filesystem, symlink loops
//! included.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::libdeps::DynamicDependencyExpander;
use super::symlink::SymlinkExpander;
use super::visited::{absolute, normalize, VisitedTracker};
use crate::oracle::SystemOracle;

/// Where a path stands in the current walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    /// Exists but has not been accepted yet
    Unvisited,
    /// In the closure
    Accepted,
    /// Does not exist, or was already accepted when it came up again
    Skipped,
}

/// Counters for one walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WalkStats {
    pub seeds: usize,
    pub accepted: usize,
    pub skipped: usize,
    pub symlink_edges: usize,
    pub library_edges: usize,
}

/// Computes the closure of a seed set. Single use.
pub struct ClosureWalker<O> {
    tracker: VisitedTracker,
    symlinks: SymlinkExpander,
    libdeps: DynamicDependencyExpander<O>,
    worklist: Vec<PathBuf>,
    stats: WalkStats,
}

impl<O: SystemOracle> ClosureWalker<O> {
    pub fn new(oracle: O) -> Self {
        Self {
            tracker: VisitedTracker::new(),
            symlinks: SymlinkExpander::new(),
            libdeps: DynamicDependencyExpander::new(oracle),
            worklist: Vec::new(),
            stats: WalkStats::default(),
        }
    }

    /// Every path reachable from `seeds`, each exactly once, in acceptance
    /// order.
    pub fn resolve(self, seeds: impl IntoIterator<Item = PathBuf>) -> Result<Vec<PathBuf>> {
        self.resolve_with_stats(seeds).map(|(paths, _)| paths)
    }

    pub fn resolve_with_stats(
        mut self,
        seeds: impl IntoIterator<Item = PathBuf>,
    ) -> Result<(Vec<PathBuf>, WalkStats)> {
        let mut seeds: Vec<PathBuf> = seeds.into_iter().collect();
        self.stats.seeds = seeds.len();

        // Stack: reverse so the first seed is popped first
        seeds.reverse();
        self.worklist = seeds;

        while let Some(path) = self.worklist.pop() {
            if self.visit(&path)? == NodeStatus::Skipped {
                match self.status(&path) {
                    NodeStatus::Accepted => debug!("already accepted: {}", path.display()),
                    _ => debug!("does not exist: {}", path.display()),
                }
            }
        }

        debug!(
            "closure: {} accepted, {} skipped, {} symlink edges, {} library edges",
            self.stats.accepted, self.stats.skipped, self.stats.symlink_edges, self.stats.library_edges
        );
        Ok((self.tracker.into_paths(), self.stats))
    }

    /// Status of `path` against the walk so far.
    pub fn status(&self, path: &Path) -> NodeStatus {
        match normalize(path) {
            Some(key) if self.tracker.contains(&key) => NodeStatus::Accepted,
            Some(key) if fs::symlink_metadata(&key).is_ok() => NodeStatus::Unvisited,
            _ => NodeStatus::Skipped,
        }
    }

    /// Process one popped path and push its neighbours.
    fn visit(&mut self, path: &Path) -> Result<NodeStatus> {
        let Some(key) = normalize(path) else {
            self.stats.skipped += 1;
            return Ok(NodeStatus::Skipped);
        };

        // Symlinked directories on the raw path vanish from the key, so
        // they are queued here even when the key itself is a duplicate.
        if fs::symlink_metadata(&key).is_ok() {
            let raw = absolute(path).unwrap_or_else(|| key.clone());
            for dir in self.symlinks.symlinked_ancestors(&raw) {
                if normalize(&dir).is_some_and(|k| !self.tracker.contains(&k)) {
                    self.stats.symlink_edges += 1;
                    self.worklist.push(dir);
                }
            }
        }

        if !self.tracker.accept(&key) {
            self.stats.skipped += 1;
            return Ok(NodeStatus::Skipped);
        }
        self.stats.accepted += 1;

        if let Some(target) = self.symlinks.expand(&key) {
            debug!("{} -> {}", key.display(), target.display());
            self.stats.symlink_edges += 1;
            self.worklist.push(target);
        }

        let libs = self
            .libdeps
            .expand(&key)
            .with_context(|| format!("Failed to list libraries of {}", key.display()))?;
        for lib in libs {
            self.stats.library_edges += 1;
            self.worklist.push(lib);
        }

        Ok(NodeStatus::Accepted)
    }
}
