use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use syncwatcher::watch::DirRegistrar;

/// Registrar that only records which directories are watched.
///
/// Clones share state, so a test can keep one handle and move the other
/// into a supervisor.
#[derive(Debug, Clone, Default)]
pub struct RecordingRegistrar {
    watched: Arc<Mutex<BTreeSet<PathBuf>>>,
    watch_calls: Arc<Mutex<Vec<PathBuf>>>,
    refuse: Arc<Mutex<BTreeSet<PathBuf>>>,
}

impl RecordingRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `watch_dir` fail for this path.
    pub fn refuse(&self, path: impl Into<PathBuf>) {
        self.refuse.lock().unwrap().insert(path.into());
    }

    /// Drop the watch behind the tree's back, the way the OS does when a
    /// watched directory is deleted. A later `unwatch_dir` then fails like
    /// notify does.
    pub fn forget(&self, path: impl AsRef<Path>) {
        self.watched.lock().unwrap().remove(path.as_ref());
    }

    pub fn watched(&self) -> BTreeSet<PathBuf> {
        self.watched.lock().unwrap().clone()
    }

    pub fn is_watched(&self, path: impl AsRef<Path>) -> bool {
        self.watched.lock().unwrap().contains(path.as_ref())
    }

    /// Every successful `watch_dir` call, in order (duplicates included).
    pub fn watch_calls(&self) -> Vec<PathBuf> {
        self.watch_calls.lock().unwrap().clone()
    }
}

impl DirRegistrar for RecordingRegistrar {
    fn watch_dir(&mut self, path: &Path) -> Result<()> {
        if self.refuse.lock().unwrap().contains(path) {
            return Err(anyhow!("watch refused for {:?}", path));
        }
        self.watched.lock().unwrap().insert(path.to_path_buf());
        self.watch_calls.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn unwatch_dir(&mut self, path: &Path) -> Result<()> {
        if self.watched.lock().unwrap().remove(path) {
            Ok(())
        } else {
            Err(notify::Error::watch_not_found().add_path(path.to_path_buf()).into())
        }
    }
}
