// src/fs/mock.rs

use super::{DirEntry, EntryKind, FileSystem};
use anyhow::{anyhow, Result};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // List of child names
    Symlink(PathBuf),
}

impl MockEntry {
    fn kind(&self) -> EntryKind {
        match self {
            MockEntry::File(_) => EntryKind::File,
            MockEntry::Dir(_) => EntryKind::Dir,
            MockEntry::Symlink(_) => EntryKind::Symlink,
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    entries: BTreeMap<PathBuf, MockEntry>,
    unreadable: HashSet<PathBuf>,
}

/// In-memory filesystem for tests.
///
/// Paths are used verbatim (no normalisation), so tests should stick to
/// absolute paths like `/proj/src/a.txt`. Parent directories are created
/// implicitly.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    state: Arc<Mutex<MockState>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().expect("mock filesystem mutex poisoned")
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        self.insert(path.as_ref(), MockEntry::File(content.into()));
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.lock();
        ensure_dir_entry(&mut state.entries, path);
    }

    pub fn add_symlink(&self, path: impl AsRef<Path>, target: impl Into<PathBuf>) {
        self.insert(path.as_ref(), MockEntry::Symlink(target.into()));
    }

    /// Make `list_dir` fail for this directory (e.g. permission denied).
    pub fn deny_read(&self, path: impl AsRef<Path>) {
        self.lock().unreadable.insert(path.as_ref().to_path_buf());
    }

    /// Remove an entry and everything below it.
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut state = self.lock();
        state.entries.retain(|p, _| !p.starts_with(path));
        if let (Some(parent), Some(name)) = (path.parent(), file_name(path)) {
            if let Some(MockEntry::Dir(children)) = state.entries.get_mut(parent) {
                children.retain(|c| *c != name);
            }
        }
    }

    fn insert(&self, path: &Path, entry: MockEntry) {
        let mut state = self.lock();
        state.entries.insert(path.to_path_buf(), entry);
        if let Some(parent) = path.parent() {
            ensure_dir_entry(&mut state.entries, parent);
            link_child(&mut state.entries, parent, path);
        }
    }
}

fn file_name(path: &Path) -> Option<String> {
    path.file_name().and_then(|n| n.to_str()).map(str::to_string)
}

fn link_child(entries: &mut BTreeMap<PathBuf, MockEntry>, parent: &Path, child: &Path) {
    if let (Some(MockEntry::Dir(children)), Some(name)) = (entries.get_mut(parent), file_name(child)) {
        if !children.contains(&name) {
            children.push(name);
        }
    }
}

fn ensure_dir_entry(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
    if let Some(parent) = path.parent() {
        if parent != path && !parent.as_os_str().is_empty() {
            ensure_dir_entry(entries, parent);
            link_child(entries, parent, path);
        }
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(_) => Err(anyhow!("Not a regular file: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().entries.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::Dir(_)) => true,
            Some(MockEntry::Symlink(target)) => {
                matches!(state.entries.get(target), Some(MockEntry::Dir(_)))
            }
            _ => false,
        }
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        let state = self.lock();
        match state.entries.get(path) {
            Some(MockEntry::Symlink(target)) => Ok(target.clone()),
            Some(_) => Ok(path.to_path_buf()),
            None => Err(anyhow!("No such file or directory: {:?}", path)),
        }
    }

    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        self.lock().entries.get(path).map(MockEntry::kind)
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let state = self.lock();
        if state.unreadable.contains(path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        let Some(MockEntry::Dir(children)) = state.entries.get(path) else {
            return Err(anyhow!("Not a directory or not found: {:?}", path));
        };

        Ok(children
            .iter()
            .filter_map(|name| {
                let child = path.join(name);
                let kind = state.entries.get(&child)?.kind();
                Some(DirEntry { path: child, kind })
            })
            .collect())
    }
}
