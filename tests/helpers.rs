//! Shared test utilities for slimroot tests.

#![allow(dead_code)]

use anyhow::Result;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::os::unix::fs::{symlink, PermissionsExt};
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use walkdir::WalkDir;

use slimroot::SystemOracle;

/// Test environment: a fake host tree and an export destination.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Fake host filesystem (canonical, so normalized keys match)
    pub root: PathBuf,
    /// Export destination
    pub dest: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base = fs::canonicalize(temp_dir.path()).expect("Failed to canonicalize temp dir");

        let root = base.join("host");
        let dest = base.join("export");
        fs::create_dir_all(&root).expect("Failed to create host dir");
        fs::create_dir_all(&dest).expect("Failed to create export dir");

        Self {
            _temp_dir: temp_dir,
            root,
            dest,
        }
    }

    /// Absolute path of `rel` inside the fake host.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.join(rel)
    }

    /// Where `rel` lands after export.
    pub fn exported(&self, rel: &str) -> PathBuf {
        self.dest.join(slimroot::archive::archive_name(&self.path(rel)))
    }

    pub fn binary(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        create_mock_binary(&path);
        path
    }

    pub fn library(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        create_mock_library(&path);
        path
    }

    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent dir");
        fs::write(&path, content).expect("Failed to write file");
        path
    }

    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    /// Create `rel` as a symlink with the literal `target`.
    pub fn link(&self, rel: &str, target: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).expect("Failed to create parent dir");
        symlink(target, &path).expect("Failed to create symlink");
        path
    }
}

/// Oracle answering from in-memory tables.
///
/// Records every dependency query so tests can check nothing is expanded
/// twice.
#[derive(Default)]
pub struct FakeOracle {
    pub packages: HashMap<String, Vec<PathBuf>>,
    pub deps: HashMap<PathBuf, Vec<PathBuf>>,
    pub queries: RefCell<Vec<PathBuf>>,
}

impl FakeOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn package<P: AsRef<Path>>(mut self, name: &str, files: &[P]) -> Self {
        self.packages.insert(
            name.to_string(),
            files.iter().map(|p| p.as_ref().to_path_buf()).collect(),
        );
        self
    }

    pub fn links<P: AsRef<Path>>(mut self, binary: &Path, libs: &[P]) -> Self {
        self.deps.insert(
            binary.to_path_buf(),
            libs.iter().map(|p| p.as_ref().to_path_buf()).collect(),
        );
        self
    }
}

impl SystemOracle for FakeOracle {
    fn list_package_files(&self, package: &str) -> Result<Vec<PathBuf>> {
        Ok(self.packages.get(package).cloned().unwrap_or_default())
    }

    fn list_dynamic_dependencies(&self, path: &Path) -> Result<Vec<PathBuf>> {
        self.queries.borrow_mut().push(path.to_path_buf());
        Ok(self.deps.get(path).cloned().unwrap_or_default())
    }
}

/// Create a mock executable binary file.
pub fn create_mock_binary(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir for binary");
    }
    fs::write(path, "#!/bin/sh\necho mock\n").expect("Failed to create mock binary");

    let mut perms = fs::metadata(path).expect("Failed to get metadata").permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).expect("Failed to set permissions");
}

/// Create a mock shared library file (non-empty, so it gets expanded).
pub fn create_mock_library(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir for library");
    }
    fs::write(path, b"mock library").expect("Failed to create mock library");
}

/// Assert that a symlink exists and points to the expected target.
pub fn assert_symlink(path: &Path, expected_target: &str) {
    assert!(
        path.is_symlink(),
        "Expected symlink at {}, but it's not a symlink",
        path.display()
    );
    let target = fs::read_link(path).expect("Failed to read symlink");
    assert_eq!(
        target.to_string_lossy(),
        expected_target,
        "Symlink {} points to {:?}, expected {}",
        path.display(),
        target,
        expected_target
    );
}

pub fn assert_file_exists(path: &Path) {
    assert!(
        path.symlink_metadata().is_ok(),
        "Expected file to exist: {}",
        path.display()
    );
}

pub fn assert_missing(path: &Path) {
    assert!(
        path.symlink_metadata().is_err(),
        "Expected no file at: {}",
        path.display()
    );
}

/// Every non-directory entry below `dir`, relative to it, sorted.
pub fn list_tree(dir: &Path) -> Vec<PathBuf> {
    let mut entries: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| !e.file_type().is_dir())
        .map(|e| e.path().strip_prefix(dir).unwrap().to_path_buf())
        .collect();
    entries.sort();
    entries
}
