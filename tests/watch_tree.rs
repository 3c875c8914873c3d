// tests/watch_tree.rs

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use proptest::prelude::*;

use syncwatcher::fs::mock::MockFileSystem;
use syncwatcher::watch::{IgnoreMatcher, WatchTree};
use syncwatcher_test_utils::fake_registrar::RecordingRegistrar;
use syncwatcher_test_utils::{init_tracing, LogCapture};

fn tree(
    fs: &MockFileSystem,
    root: &str,
    patterns: &[&str],
    registrar: &RecordingRegistrar,
) -> WatchTree<RecordingRegistrar> {
    let ignore = IgnoreMatcher::new(patterns).expect("patterns should compile");
    WatchTree::new(root, ignore, Arc::new(fs.clone()), registrar.clone())
}

fn paths(items: &[&str]) -> BTreeSet<PathBuf> {
    items.iter().map(PathBuf::from).collect()
}

#[test]
fn build_registers_every_directory_once() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/proj/src/main.rs", "");
    fs.add_file("/proj/src/util/mod.rs", "");
    fs.add_dir("/proj/docs");
    let registrar = RecordingRegistrar::new();

    let mut t = tree(&fs, "/proj", &[], &registrar);
    let added = t.build().expect("walk should succeed");

    let expected = paths(&["/proj", "/proj/src", "/proj/src/util", "/proj/docs"]);
    assert_eq!(added, expected.len());
    assert_eq!(registrar.watched(), expected);
    assert_eq!(registrar.watch_calls().len(), expected.len(), "no duplicate watches");
    assert!(t.is_registered(Path::new("/proj/src/util")));
}

#[test]
fn ignored_directory_and_descendants_are_never_registered() {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("/proj/.git/objects/ab/cdef", "");
    fs.add_file("/proj/.git/HEAD", "");
    fs.add_file("/proj/src/main.rs", "");
    let registrar = RecordingRegistrar::new();

    let mut t = tree(&fs, "/proj", &[r"^\.git$"], &registrar);
    t.build().expect("walk should succeed");

    assert_eq!(registrar.watched(), paths(&["/proj", "/proj/src"]));
}

#[test]
fn symlinked_directories_are_not_followed() {
    let fs = MockFileSystem::new();
    fs.add_dir("/proj/src");
    fs.add_dir("/elsewhere/deep");
    fs.add_symlink("/proj/link", "/elsewhere");
    let registrar = RecordingRegistrar::new();

    let mut t = tree(&fs, "/proj", &[], &registrar);
    t.build().expect("walk should succeed");

    assert_eq!(registrar.watched(), paths(&["/proj", "/proj/src"]));
}

#[test]
fn unreadable_directory_fails_the_build() {
    let fs = MockFileSystem::new();
    fs.add_dir("/proj/private/inner");
    fs.deny_read("/proj/private");
    let registrar = RecordingRegistrar::new();

    let mut t = tree(&fs, "/proj", &[], &registrar);
    let err = t.build().expect_err("walk should fail");
    assert!(format!("{err:#}").contains("Permission denied"), "{err:#}");
}

#[test]
fn refused_watch_fails_the_build() {
    let fs = MockFileSystem::new();
    fs.add_dir("/proj/src");
    let registrar = RecordingRegistrar::new();
    registrar.refuse("/proj/src");

    let mut t = tree(&fs, "/proj", &[], &registrar);
    assert!(t.build().is_err());
}

#[test]
fn register_subtree_adds_only_new_directories() {
    let fs = MockFileSystem::new();
    fs.add_dir("/proj/src");
    let registrar = RecordingRegistrar::new();
    let mut t = tree(&fs, "/proj", &[r"(^|/)target$"], &registrar);
    t.build().unwrap();

    fs.add_dir("/proj/new/a/b");
    fs.add_dir("/proj/new/target/debug");
    let added = t.register_subtree(Path::new("/proj/new")).unwrap();

    assert_eq!(added, 3);
    assert!(registrar.is_watched("/proj/new/a/b"));
    assert!(!registrar.is_watched("/proj/new/target"));
    assert!(!registrar.is_watched("/proj/new/target/debug"));

    // Already registered: nothing new.
    assert_eq!(t.register_subtree(Path::new("/proj/new")).unwrap(), 0);
}

#[test]
fn unregister_subtree_removes_descendants_only() {
    let fs = MockFileSystem::new();
    fs.add_dir("/proj/a/b/c");
    fs.add_dir("/proj/ab");
    let registrar = RecordingRegistrar::new();
    let mut t = tree(&fs, "/proj", &[], &registrar);
    t.build().unwrap();

    let removed = t.unregister_subtree(Path::new("/proj/a"));

    assert_eq!(removed, 3);
    assert_eq!(registrar.watched(), paths(&["/proj", "/proj/ab"]));
    assert_eq!(t.unregister_subtree(Path::new("/proj/a")), 0);
}

#[test]
fn unwatching_a_dir_the_os_already_dropped_is_quiet() {
    let logs = LogCapture::new();
    let _guard = logs.install();
    let fs = MockFileSystem::new();
    fs.add_dir("/proj/old/sub");
    let registrar = RecordingRegistrar::new();
    let mut t = tree(&fs, "/proj", &[], &registrar);
    t.build().expect("walk should succeed");

    registrar.forget("/proj/old");
    registrar.forget("/proj/old/sub");
    assert_eq!(t.unregister_subtree(Path::new("/proj/old")), 2);

    assert!(!t.is_registered(Path::new("/proj/old")));
    assert!(logs.lines_with(&["WARN"]).is_empty(), "{}", logs.contents());
    assert_eq!(logs.lines_with(&["DEBUG", "watch already dropped"]).len(), 2);
}

#[test]
fn clear_drops_every_registration() {
    let fs = MockFileSystem::new();
    fs.add_dir("/proj/a/b");
    let registrar = RecordingRegistrar::new();
    let mut t = tree(&fs, "/proj", &[], &registrar);
    t.build().unwrap();

    t.clear();

    assert!(t.is_empty());
    assert!(registrar.watched().is_empty());
}

const SEGMENTS: &[&str] = &["a", "b", ".git", "build", "node_modules"];
const PATTERNS: &[&str] = &[
    r"^\.git$",
    r"(^|/)build$",
    r"node_modules",
    r"^a/b$",
    r"b/a",
];

fn dir_strategy() -> impl Strategy<Value = Vec<String>> {
    proptest::collection::vec(proptest::sample::select(SEGMENTS), 1..=4)
        .prop_map(|segs| segs.into_iter().map(str::to_string).collect())
}

proptest! {
    /// A directory is registered iff neither it nor any ancestor below the
    /// root matches an ignore pattern.
    #[test]
    fn registered_set_matches_ignore_semantics(
        dirs in proptest::collection::vec(dir_strategy(), 0..12),
        chosen in proptest::sample::subsequence(PATTERNS.to_vec(), 0..=PATTERNS.len()),
    ) {
        let fs = MockFileSystem::new();
        fs.add_dir("/root");
        for d in &dirs {
            fs.add_dir(Path::new("/root").join(d.join("/")));
        }

        let ignore = IgnoreMatcher::new(&chosen).unwrap();
        let registrar = RecordingRegistrar::new();
        let mut t = WatchTree::new("/root", ignore.clone(), Arc::new(fs.clone()), registrar.clone());
        t.build().unwrap();

        let mut expected = BTreeSet::new();
        expected.insert(PathBuf::from("/root"));
        for d in &dirs {
            for depth in 1..=d.len() {
                let prefixes_ok = (1..=depth).all(|k| !ignore.matches_relative(&d[..k].join("/")));
                if prefixes_ok {
                    expected.insert(Path::new("/root").join(d[..depth].join("/")));
                }
            }
        }

        prop_assert_eq!(registrar.watched(), expected);
        prop_assert_eq!(registrar.watch_calls().len(), t.len());
    }
}
