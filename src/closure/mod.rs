//! Dependency closure: every path a set of seeds needs at runtime.
//!
//! - `visited` - path normalization and the dedup set
//! - `symlink` - link → target edges
//! - `libdeps` - binary → shared library edges
//! - `walker` - worklist traversal to fixpoint
//! - `seeds` - packages and explicit files as starting points
//! - `filter` - manifest-time removal of doc/man trees

pub mod filter;
pub mod libdeps;
pub mod seeds;
pub mod symlink;
pub mod visited;
pub mod walker;

pub use filter::OutputFilter;
pub use libdeps::{parse_ldd_output, DynamicDependencyExpander};
pub use seeds::{expand_seeds, list_package_files, seeds_from, Seed};
pub use symlink::SymlinkExpander;
pub use visited::{normalize, VisitedTracker};
pub use walker::{ClosureWalker, NodeStatus, WalkStats};
