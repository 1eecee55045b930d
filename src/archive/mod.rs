//! Archival: the manifest as a compressed stream, and back onto disk.
//!
//! Packing and unpacking are separate steps joined by a byte stream
//! (stdout/stdin for `pack`/`unpack`, a temporary file for `export`).
//! Removal patterns only apply on the unpack side, so the stream always
//! carries the full manifest.

mod exclude;
mod tarball;

pub use exclude::ExtractFilter;
pub use tarball::{archive_name, extract_archive, write_archive, PackStats, UnpackStats};
