// src/watch/event.rs

//! Classification of raw `notify` events.
//!
//! Raw events are first reduced to a closed set of operations ([`FsOp`]),
//! which then map totally onto what the supervisor should do with them:
//! whether they count towards a run ([`Disposition`]) and how they affect
//! the set of watched directories ([`RegistrationEffect`]).

use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind};

/// Operation kind of a filesystem event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FsOp {
    Write,
    Create,
    Remove,
    Rename,
    PermissionChange,
}

/// Whether an operation counts towards a debounced run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    TriggersRun,
    /// Logged, but never arms the debounce timer.
    Ignored,
}

/// How an operation changes the watched directory set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationEffect {
    /// Register the path (and its subtree) if it is a directory.
    RegisterIfDir,
    /// Unregister the path and everything registered below it.
    Unregister,
    /// Register if the path is now a directory, unregister otherwise.
    /// Renames are reported once per side, so the same op covers both the
    /// old and the new name.
    Reconcile,
    None,
}

impl FsOp {
    /// Map a `notify` event kind onto an operation.
    ///
    /// Access events and unclassified kinds return `None`.
    pub fn from_kind(kind: &EventKind) -> Option<FsOp> {
        match kind {
            EventKind::Create(_) => Some(FsOp::Create),
            EventKind::Remove(_) => Some(FsOp::Remove),
            EventKind::Modify(ModifyKind::Name(_)) => Some(FsOp::Rename),
            EventKind::Modify(ModifyKind::Metadata(_)) => Some(FsOp::PermissionChange),
            EventKind::Modify(_) => Some(FsOp::Write),
            EventKind::Access(_) | EventKind::Any | EventKind::Other => None,
        }
    }

    pub fn disposition(self) -> Disposition {
        match self {
            FsOp::Write | FsOp::Create | FsOp::Remove | FsOp::Rename => Disposition::TriggersRun,
            FsOp::PermissionChange => Disposition::Ignored,
        }
    }

    pub fn registration_effect(self) -> RegistrationEffect {
        match self {
            FsOp::Create => RegistrationEffect::RegisterIfDir,
            FsOp::Remove => RegistrationEffect::Unregister,
            FsOp::Rename => RegistrationEffect::Reconcile,
            FsOp::Write | FsOp::PermissionChange => RegistrationEffect::None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FsOp::Write => "write",
            FsOp::Create => "create",
            FsOp::Remove => "remove",
            FsOp::Rename => "rename",
            FsOp::PermissionChange => "chmod",
        }
    }
}

/// A raw event reduced to its operation and paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    pub op: FsOp,
    pub paths: Vec<PathBuf>,
}

impl FsEvent {
    /// Returns `None` for events that carry no classified operation.
    pub fn from_notify(event: notify::Event) -> Option<FsEvent> {
        let op = FsOp::from_kind(&event.kind)?;
        Some(FsEvent {
            op,
            paths: event.paths,
        })
    }
}
