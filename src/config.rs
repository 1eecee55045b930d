//! Configuration management for slimroot.
//!
//! Reads configuration from environment variables. `main` loads a `.env`
//! file first (via dotenvy), so values there act as defaults that the real
//! environment overrides. CLI flags override both.

use std::path::PathBuf;

use crate::oracle::PackageBackend;

/// Default export destination.
pub const DEFAULT_DEST: &str = "/export";

/// Default dynamic-linker oracle.
pub const DEFAULT_LDD: &str = "ldd";

/// slimroot configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Destination directory when `-d` is not given (SLIMROOT_DEST)
    pub dest: PathBuf,
    /// Program used to list dynamic dependencies (SLIMROOT_LDD)
    pub ldd: String,
    /// Package backends in preference order (SLIMROOT_PACKAGE_BACKENDS)
    pub package_backends: Vec<PackageBackend>,
    /// Keep documentation and manual pages in the manifest (SLIMROOT_KEEP_DOCS)
    pub keep_docs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dest: PathBuf::from(DEFAULT_DEST),
            ldd: DEFAULT_LDD.to_string(),
            package_backends: PackageBackend::DEFAULT_ORDER.to_vec(),
            keep_docs: false,
        }
    }
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let dest = lookup("SLIMROOT_DEST")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.dest);

        let ldd = lookup("SLIMROOT_LDD")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.ldd);

        let package_backends = lookup("SLIMROOT_PACKAGE_BACKENDS")
            .map(|s| parse_backends(&s))
            .filter(|b| !b.is_empty())
            .unwrap_or(defaults.package_backends);

        let keep_docs = lookup("SLIMROOT_KEEP_DOCS")
            .map(|s| matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(defaults.keep_docs);

        Self {
            dest,
            ldd,
            package_backends,
            keep_docs,
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        let backends: Vec<_> = self.package_backends.iter().map(|b| b.program()).collect();
        println!("Configuration:");
        println!("  SLIMROOT_DEST: {}", self.dest.display());
        println!("  SLIMROOT_LDD: {}", self.ldd);
        println!("  SLIMROOT_PACKAGE_BACKENDS: {}", backends.join(","));
        println!("  SLIMROOT_KEEP_DOCS: {}", self.keep_docs);
    }
}

/// Parse a comma-separated backend list, ignoring unknown names.
fn parse_backends(value: &str) -> Vec<PackageBackend> {
    let mut backends = Vec::new();
    for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match name.parse::<PackageBackend>() {
            Ok(backend) if !backends.contains(&backend) => backends.push(backend),
            Ok(_) => {}
            Err(e) => tracing::warn!("ignoring package backend: {}", e),
        }
    }
    backends
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config.dest, PathBuf::from("/export"));
        assert_eq!(config.ldd, "ldd");
        assert_eq!(
            config.package_backends,
            vec![PackageBackend::Dpkg, PackageBackend::Rpm]
        );
        assert!(!config.keep_docs);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("SLIMROOT_DEST", "/tmp/out"),
            ("SLIMROOT_LDD", "/usr/bin/ldd"),
            ("SLIMROOT_PACKAGE_BACKENDS", "rpm, dpkg"),
            ("SLIMROOT_KEEP_DOCS", "true"),
        ]));
        assert_eq!(config.dest, PathBuf::from("/tmp/out"));
        assert_eq!(config.ldd, "/usr/bin/ldd");
        assert_eq!(
            config.package_backends,
            vec![PackageBackend::Rpm, PackageBackend::Dpkg]
        );
        assert!(config.keep_docs);
    }

    #[test]
    fn test_bad_backends_fall_back_to_default() {
        let config = Config::from_lookup(lookup_from(&[("SLIMROOT_PACKAGE_BACKENDS", "pacman")]));
        assert_eq!(config.package_backends, PackageBackend::DEFAULT_ORDER.to_vec());
    }

    #[test]
    fn test_duplicate_backends_collapse() {
        let config =
            Config::from_lookup(lookup_from(&[("SLIMROOT_PACKAGE_BACKENDS", "rpm,rpm,dpkg")]));
        assert_eq!(
            config.package_backends,
            vec![PackageBackend::Rpm, PackageBackend::Dpkg]
        );
    }
}
