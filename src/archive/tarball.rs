//! Gzip-compressed tar streams: manifest in, files out.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::{Read, Write};
use std::os::unix::fs::MetadataExt;
use std::path::{Component, Path, PathBuf};
use tar::{Archive, Builder};
use tracing::debug;

use super::ExtractFilter;

/// Counters for one pack.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PackStats {
    pub entries: usize,
    pub bytes: u64,
}

/// Counters for one unpack.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct UnpackStats {
    pub extracted: usize,
    pub excluded: usize,
}

/// Name of `path` inside the archive: leading `/` stripped.
pub fn archive_name(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect()
}

/// Serialize every manifest path into a gzip tar stream.
///
/// Symlinks are stored as links and directories as bare directory
/// entries (never their contents); mode, ownership and mtime come from
/// the source file.
pub fn write_archive<W: Write>(manifest: &[PathBuf], writer: W) -> Result<PackStats> {
    let encoder = GzEncoder::new(writer, Compression::default());
    let mut builder = Builder::new(encoder);
    builder.follow_symlinks(false);

    let mut stats = PackStats::default();
    for path in manifest {
        let name = archive_name(path);
        if name.as_os_str().is_empty() {
            continue;
        }

        let meta = fs::symlink_metadata(path)
            .with_context(|| format!("Failed to stat {}", path.display()))?;
        builder
            .append_path_with_name(path, &name)
            .with_context(|| format!("Failed to archive {}", path.display()))?;

        if meta.file_type().is_file() {
            stats.bytes += meta.len();
        }
        stats.entries += 1;
    }

    let encoder = builder
        .into_inner()
        .context("Failed to finish archive stream")?;
    let mut writer = encoder.finish().context("Failed to finish compression")?;
    writer.flush().context("Failed to flush archive stream")?;

    debug!("packed {} entries ({} bytes)", stats.entries, stats.bytes);
    Ok(stats)
}

/// Unpack a gzip tar stream into `dest`, skipping excluded members.
///
/// Permissions and mtimes are always restored; ownership only when running
/// as root, since chown fails for anyone else.
pub fn extract_archive<R: Read>(reader: R, dest: &Path, filter: &ExtractFilter) -> Result<UnpackStats> {
    let mut archive = Archive::new(GzDecoder::new(reader));
    archive.set_preserve_permissions(true);
    archive.set_preserve_mtime(true);
    archive.set_preserve_ownerships(running_as_root());
    archive.set_overwrite(true);

    let mut stats = UnpackStats::default();
    for entry in archive.entries().context("Failed to read archive stream")? {
        let mut entry = entry.context("Corrupt archive entry")?;
        let name = entry.path().context("Invalid entry name")?.into_owned();

        if filter.excludes(&name) {
            debug!("excluded {}", name.display());
            stats.excluded += 1;
            continue;
        }

        let written = entry
            .unpack_in(dest)
            .with_context(|| format!("Failed to extract {} into {}", name.display(), dest.display()))?;
        if written {
            stats.extracted += 1;
        } else {
            debug!("refused to extract {} outside destination", name.display());
        }
    }

    debug!(
        "unpacked {} entries into {} ({} excluded)",
        stats.extracted,
        dest.display(),
        stats.excluded
    );
    Ok(stats)
}

fn running_as_root() -> bool {
    fs::metadata("/proc/self")
        .map(|m| m.uid() == 0)
        .unwrap_or(false)
}
