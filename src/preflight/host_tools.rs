//! Oracle availability checks.

use std::path::Path;

use super::types::CheckResult;
use crate::config::Config;
use crate::process;

/// The linker oracle is always required.
pub fn check_linker(config: &Config) -> CheckResult {
    match process::which(&config.ldd) {
        Some(path) => CheckResult::pass_with("linker oracle", &path.display().to_string()),
        None => CheckResult::fail(
            "linker oracle",
            &format!(
                "'{}' not found. Install glibc's ldd or set SLIMROOT_LDD.",
                config.ldd
            ),
        ),
    }
}

/// One result per configured package backend, plus an overall verdict.
///
/// A missing backend only warns; having none at all fails when packages
/// were requested.
pub fn check_package_backends(config: &Config, packages_requested: bool) -> Vec<CheckResult> {
    let mut results = Vec::new();
    let mut found = 0;

    for backend in &config.package_backends {
        let name = format!("package backend {}", backend);
        match process::which(backend.program()) {
            Some(path) => {
                found += 1;
                results.push(CheckResult::pass_with(&name, &path.display().to_string()));
            }
            None => results.push(CheckResult::warn(&name, "not installed")),
        }
    }

    if found == 0 {
        let msg = "No package manager found; only explicit files can be exported";
        if packages_requested {
            results.push(CheckResult::fail("package oracle", msg));
        } else {
            results.push(CheckResult::warn("package oracle", msg));
        }
    }

    results
}

pub fn check_destination(dest: &Path) -> CheckResult {
    if dest.is_dir() {
        CheckResult::pass_with("destination", &dest.display().to_string())
    } else {
        CheckResult::fail(
            "destination",
            &format!("{} does not exist or is not a directory", dest.display()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preflight::types::CheckStatus;

    #[test]
    fn test_missing_linker_fails() {
        let config = Config {
            ldd: "nonexistent_ldd_12345".to_string(),
            ..Config::default()
        };
        assert_eq!(check_linker(&config).status, CheckStatus::Fail);
    }

    #[test]
    fn test_no_backends_configured() {
        let config = Config {
            package_backends: Vec::new(),
            ..Config::default()
        };
        let results = check_package_backends(&config, true);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].status, CheckStatus::Fail);

        let results = check_package_backends(&config, false);
        assert_eq!(results[0].status, CheckStatus::Warn);
    }

    #[test]
    fn test_destination() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(check_destination(dir.path()).status, CheckStatus::Pass);
        assert_eq!(
            check_destination(&dir.path().join("missing")).status,
            CheckStatus::Fail
        );
    }
}
