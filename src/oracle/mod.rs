//! Oracles: external tools the closure treats as black boxes.
//!
//! The walker never spawns processes itself. It asks a [`SystemOracle`]
//! for two things:
//! - which files a package owns (`dpkg -L`, `rpm -ql`)
//! - which shared libraries a binary links against (`ldd`)
//!
//! [`HostOracle`] answers by running the host's tools. Tests substitute
//! their own implementation backed by a temporary tree.

mod host;

pub use host::{parse_package_listing, HostOracle};

use anyhow::{bail, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Source of package and dynamic-linking knowledge.
pub trait SystemOracle {
    /// Every path the package manager recorded for `package`.
    ///
    /// An unknown package yields an empty list, not an error.
    fn list_package_files(&self, package: &str) -> Result<Vec<PathBuf>>;

    /// Libraries `path` links against directly.
    ///
    /// Static binaries and non-ELF files yield an empty list.
    fn list_dynamic_dependencies(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

impl<T: SystemOracle + ?Sized> SystemOracle for &T {
    fn list_package_files(&self, package: &str) -> Result<Vec<PathBuf>> {
        (**self).list_package_files(package)
    }

    fn list_dynamic_dependencies(&self, path: &Path) -> Result<Vec<PathBuf>> {
        (**self).list_dynamic_dependencies(path)
    }
}

/// A package database the host oracle can query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageBackend {
    /// Debian family, `dpkg -L <package>`
    Dpkg,
    /// RPM family, `rpm -ql <package>`
    Rpm,
}

impl PackageBackend {
    /// Preference order when nothing is configured.
    pub const DEFAULT_ORDER: [PackageBackend; 2] = [PackageBackend::Dpkg, PackageBackend::Rpm];

    pub fn program(&self) -> &'static str {
        match self {
            PackageBackend::Dpkg => "dpkg",
            PackageBackend::Rpm => "rpm",
        }
    }

    /// Arguments that precede the package name.
    pub fn list_args(&self) -> &'static [&'static str] {
        match self {
            PackageBackend::Dpkg => &["-L"],
            PackageBackend::Rpm => &["-ql"],
        }
    }
}

impl fmt::Display for PackageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

impl FromStr for PackageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dpkg" | "deb" => Ok(PackageBackend::Dpkg),
            "rpm" => Ok(PackageBackend::Rpm),
            other => bail!("unknown package backend '{}' (expected dpkg or rpm)", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parse() {
        assert_eq!("dpkg".parse::<PackageBackend>().unwrap(), PackageBackend::Dpkg);
        assert_eq!(" RPM ".parse::<PackageBackend>().unwrap(), PackageBackend::Rpm);
        assert!("pacman".parse::<PackageBackend>().is_err());
    }

    #[test]
    fn test_backend_commands() {
        assert_eq!(PackageBackend::Dpkg.program(), "dpkg");
        assert_eq!(PackageBackend::Dpkg.list_args(), &["-L"]);
        assert_eq!(PackageBackend::Rpm.list_args(), &["-ql"]);
        assert_eq!(PackageBackend::Rpm.to_string(), "rpm");
    }
}
