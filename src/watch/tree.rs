// src/watch/tree.rs

//! Live set of watched directories under one target root.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::fs::{EntryKind, FileSystem};
use crate::watch::patterns::IgnoreMatcher;

/// Something that can start and stop watching a single directory
/// (non-recursively).
///
/// Production code uses [`crate::watch::NotifyRegistrar`]; tests provide a
/// recording implementation.
pub trait DirRegistrar: Send {
    fn watch_dir(&mut self, path: &Path) -> Result<()>;
    fn unwatch_dir(&mut self, path: &Path) -> Result<()>;
}

/// Tracks which directories under `root` are registered with the OS watch
/// facility.
///
/// Every non-ignored directory reachable from `root` is registered exactly
/// once; an ignored directory and its descendants are never registered.
/// Symlinks are not followed.
pub struct WatchTree<R: DirRegistrar> {
    root: PathBuf,
    ignore: IgnoreMatcher,
    fs: Arc<dyn FileSystem>,
    registrar: R,
    registered: BTreeSet<PathBuf>,
    show_ignored: bool,
}

impl<R: DirRegistrar> std::fmt::Debug for WatchTree<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatchTree")
            .field("root", &self.root)
            .field("registered", &self.registered.len())
            .finish_non_exhaustive()
    }
}

impl<R: DirRegistrar> WatchTree<R> {
    pub fn new(
        root: impl Into<PathBuf>,
        ignore: IgnoreMatcher,
        fs: Arc<dyn FileSystem>,
        registrar: R,
    ) -> Self {
        Self {
            root: root.into(),
            ignore,
            fs,
            registrar,
            registered: BTreeSet::new(),
            show_ignored: false,
        }
    }

    /// Log skipped directories at info instead of debug.
    pub fn with_show_ignored(mut self, show: bool) -> Self {
        self.show_ignored = show;
        self
    }

    pub fn is_registered(&self, path: &Path) -> bool {
        self.registered.contains(path)
    }

    pub fn len(&self) -> usize {
        self.registered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registered.is_empty()
    }

    /// True if `path` is ignored by this tree's patterns.
    pub fn is_ignored(&self, path: &Path) -> bool {
        self.ignore.should_ignore(&self.root, path)
    }

    /// Initial walk: register the root and every non-ignored directory below.
    ///
    /// Any failure aborts the walk; the caller treats it as fatal for the
    /// target.
    pub fn build(&mut self) -> Result<usize> {
        let root = self.root.clone();
        let added = self.register_subtree(&root)?;
        info!(root = ?self.root, dirs = added, "initial watch tree built");
        Ok(added)
    }

    /// Register `dir` and its non-ignored descendants.
    ///
    /// Directories already registered are skipped (but still descended, so a
    /// partially registered subtree is completed). Returns how many
    /// directories were newly registered. Stops at the first error, keeping
    /// whatever was registered so far.
    pub fn register_subtree(&mut self, dir: &Path) -> Result<usize> {
        let mut added = 0;
        let mut stack = vec![dir.to_path_buf()];

        while let Some(dir) = stack.pop() {
            if self.is_ignored(&dir) {
                self.log_ignored(&dir);
                continue;
            }

            if !self.registered.contains(&dir) {
                self.registrar.watch_dir(&dir)?;
                debug!(path = ?dir, "watching dir");
                self.registered.insert(dir.clone());
                added += 1;
            }

            stack.extend(
                self.fs
                    .list_dir(&dir)?
                    .into_iter()
                    .filter(|child| child.kind == EntryKind::Dir)
                    .map(|child| child.path),
            );
        }

        Ok(added)
    }

    /// Unregister `path` and every registered directory below it.
    ///
    /// A watch the OS already dropped along with its directory is expected
    /// on every remove or rename and only logged at debug; other unwatch
    /// failures are warnings. Returns how many entries were removed from the
    /// set.
    pub fn unregister_subtree(&mut self, path: &Path) -> usize {
        let doomed: Vec<PathBuf> = self
            .registered
            .range(path.to_path_buf()..)
            .take_while(|p| p.starts_with(path))
            .cloned()
            .collect();

        for dir in &doomed {
            self.registered.remove(dir);
            match self.registrar.unwatch_dir(dir) {
                Ok(()) => debug!(path = ?dir, "stopped watching dir"),
                Err(err) if watch_already_gone(&err) => {
                    debug!(path = ?dir, "watch already dropped with its dir")
                }
                Err(err) => warn!(path = ?dir, error = %err, "unwatch failed"),
            }
        }

        doomed.len()
    }

    /// Drop every registration. Used on shutdown.
    pub fn clear(&mut self) {
        let root = self.root.clone();
        let removed = self.unregister_subtree(&root);
        debug!(root = ?self.root, removed, "watch tree cleared");
    }

    fn log_ignored(&self, dir: &Path) {
        if self.show_ignored {
            info!(path = ?dir, "ignoring dir");
        } else {
            debug!(path = ?dir, "ignoring dir");
        }
    }
}

fn watch_already_gone(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<notify::Error>(),
        Some(notify::Error { kind: notify::ErrorKind::WatchNotFound, .. })
    )
}
