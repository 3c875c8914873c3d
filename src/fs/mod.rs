// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub mod mock;

/// What a directory entry is, judged without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    /// Sockets, fifos, devices.
    Other,
}

/// One child of a listed directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Filesystem access needed by config validation and the watch tree.
///
/// The directory walk only ever goes through [`FileSystem::list_dir`] and
/// [`FileSystem::entry_kind`], so it can run against
/// [`mock::MockFileSystem`] in tests.
pub trait FileSystem: Send + Sync + Debug {
    fn read_to_string(&self, path: &Path) -> Result<String>;
    /// Both follow symlinks.
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Kind of `path` itself (symlinks are reported, not followed), or
    /// `None` if nothing is there.
    fn entry_kind(&self, path: &Path) -> Option<EntryKind>;

    /// Children of a directory, with full paths.
    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>>;
}

#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

fn kind_of(ft: fs::FileType) -> EntryKind {
    if ft.is_symlink() {
        EntryKind::Symlink
    } else if ft.is_dir() {
        EntryKind::Dir
    } else if ft.is_file() {
        EntryKind::File
    } else {
        EntryKind::Other
    }
}

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).with_context(|| format!("reading file {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("canonicalizing {:?}", path))
    }

    fn entry_kind(&self, path: &Path) -> Option<EntryKind> {
        fs::symlink_metadata(path).ok().map(|m| kind_of(m.file_type()))
    }

    fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>> {
        let iter = fs::read_dir(path).with_context(|| format!("listing dir {:?}", path))?;
        iter.map(|entry| {
            let entry = entry.with_context(|| format!("listing dir {:?}", path))?;
            let ft = entry
                .file_type()
                .with_context(|| format!("stat {:?}", entry.path()))?;
            Ok(DirEntry {
                path: entry.path(),
                kind: kind_of(ft),
            })
        })
        .collect()
    }
}
