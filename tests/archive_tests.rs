//! Archive stream and export pipeline tests.

mod helpers;

use flate2::read::GzDecoder;
use helpers::{assert_file_exists, assert_missing, assert_symlink, list_tree, FakeOracle, TestEnv};
use slimroot::archive::{archive_name, extract_archive, write_archive, ExtractFilter};
use slimroot::commands::export::export_with;
use slimroot::commands::Selection;
use slimroot::config::Config;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;

/// Member names of a gzip tar stream.
fn stream_members(stream: &[u8]) -> Vec<PathBuf> {
    let mut archive = tar::Archive::new(GzDecoder::new(stream));
    archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().into_owned())
        .collect()
}

#[test]
fn test_pack_stores_relative_names() {
    let env = TestEnv::new();
    let ls = env.binary("usr/bin/ls");
    let dir = env.link("usr/bin/dir", "ls");

    let mut stream = Vec::new();
    let stats = write_archive(&[dir.clone(), ls.clone()], &mut stream).unwrap();
    assert_eq!(stats.entries, 2);

    let members = stream_members(&stream);
    assert_eq!(members, vec![archive_name(&dir), archive_name(&ls)]);
    assert!(members.iter().all(|m| m.is_relative()));
}

#[test]
fn test_directory_entry_is_not_recursive() {
    let env = TestEnv::new();
    let lib = env.dir("usr/lib");
    env.library("usr/lib/unrelated.so");

    let mut stream = Vec::new();
    write_archive(&[lib.clone()], &mut stream).unwrap();
    assert_eq!(stream_members(&stream).len(), 1);
}

#[test]
fn test_unpack_preserves_links_and_modes() {
    let env = TestEnv::new();
    let ls = env.binary("usr/bin/ls");
    let dir = env.link("usr/bin/dir", "ls");
    let conf = env.file("etc/app.conf", "key=value\n");
    fs::set_permissions(&conf, fs::Permissions::from_mode(0o600)).unwrap();

    let mut stream = Vec::new();
    write_archive(&[conf, dir, ls], &mut stream).unwrap();
    let stats = extract_archive(stream.as_slice(), &env.dest, &ExtractFilter::default()).unwrap();
    assert_eq!(stats.extracted, 3);
    assert_eq!(stats.excluded, 0);

    assert_symlink(&env.exported("usr/bin/dir"), "ls");
    let mode = |rel: &str| {
        fs::metadata(env.exported(rel)).unwrap().permissions().mode() & 0o777
    };
    assert_eq!(mode("usr/bin/ls"), 0o755);
    assert_eq!(mode("etc/app.conf"), 0o600);
    assert_eq!(
        fs::read_to_string(env.exported("etc/app.conf")).unwrap(),
        "key=value\n"
    );
}

#[test]
fn test_removal_applies_only_at_unpack() {
    let env = TestEnv::new();
    let ls = env.binary("usr/bin/ls");
    let mo = env.file("usr/share/locale/de/LC_MESSAGES/ls.mo", "mo");

    let mut stream = Vec::new();
    write_archive(&[ls, mo.clone()], &mut stream).unwrap();

    // The stream still carries the removed path
    assert!(stream_members(&stream).contains(&archive_name(&mo)));

    let locale = env.path("usr/share/locale");
    let filter = ExtractFilter::new(&[locale.to_string_lossy()]).unwrap();
    let stats = extract_archive(stream.as_slice(), &env.dest, &filter).unwrap();
    assert_eq!(stats.extracted, 1);
    assert_eq!(stats.excluded, 1);

    assert_file_exists(&env.exported("usr/bin/ls"));
    assert_missing(&env.exported("usr/share/locale/de/LC_MESSAGES/ls.mo"));
}

#[test]
fn test_corrupt_stream_is_error() {
    let env = TestEnv::new();
    let garbage = b"definitely not gzip".to_vec();
    assert!(extract_archive(garbage.as_slice(), &env.dest, &ExtractFilter::default()).is_err());
}

#[test]
fn test_pack_missing_file_is_error() {
    let env = TestEnv::new();
    let mut stream = Vec::new();
    let err = write_archive(&[env.path("vanished")], &mut stream).unwrap_err();
    assert!(err.to_string().contains("vanished"));
}

// =============================================================================
// Export pipeline
// =============================================================================

#[test]
fn test_export_end_to_end() {
    let env = TestEnv::new();
    let sh = env.binary("usr/bin/sh");
    let libc = env.library("usr/lib/libc.so.6");
    let ld = env.library("usr/lib/ld-linux.so.2");
    let mo = env.file("usr/share/locale/fr/sh.mo", "mo");
    let passwd = env.file("etc/passwd", "root:x:0:0::/root:/bin/sh\n");
    env.link("bin", "usr/bin");

    let oracle = FakeOracle::new()
        .package("dash", &[&env.path("bin/sh"), &mo])
        .links(&sh, &[&libc, &ld])
        .links(&libc, &[&ld]);

    let selection = Selection {
        packages: vec!["dash".to_string()],
        files: vec![passwd, env.path("etc/shadow")],
    };
    let removals = vec![format!("/{}", archive_name(&env.path("usr/share/locale")).display())];

    export_with(&oracle, &Config::default(), &env.dest, &selection, &removals).unwrap();

    let tree = list_tree(&env.dest);
    let expected: Vec<PathBuf> = {
        let mut v: Vec<PathBuf> = ["bin", "etc/passwd", "usr/bin/sh", "usr/lib/ld-linux.so.2", "usr/lib/libc.so.6"]
            .iter()
            .map(|rel| archive_name(&env.path(rel)))
            .collect();
        v.sort();
        v
    };
    assert_eq!(tree, expected);
    assert_symlink(&env.exported("bin"), "usr/bin");
}

#[test]
fn test_export_requires_destination() {
    let env = TestEnv::new();
    let passwd = env.file("etc/passwd", "root\n");
    let selection = Selection {
        packages: Vec::new(),
        files: vec![passwd],
    };

    let err = export_with(
        &FakeOracle::new(),
        &Config::default(),
        &env.path("no-such-dest"),
        &selection,
        &[],
    )
    .unwrap_err();
    assert!(err.to_string().contains("does not exist"));
}

#[test]
fn test_export_rejects_bad_pattern_before_resolving() {
    let env = TestEnv::new();
    let bin = env.binary("bin/x");
    let oracle = FakeOracle::new();
    let selection = Selection {
        packages: Vec::new(),
        files: vec![bin],
    };

    let err = export_with(
        &oracle,
        &Config::default(),
        &env.dest,
        &selection,
        &["usr/[".to_string()],
    )
    .unwrap_err();
    assert!(err.to_string().contains("Invalid removal pattern"));
    assert!(oracle.queries.borrow().is_empty());
}
