// src/watch/mod.rs

//! File watching and change detection.
//!
//! This module is responsible for:
//! - Compiling per-target ignore patterns (regular expressions).
//! - Keeping the set of watched directories in sync with the tree
//!   (`notify`, one non-recursive watch per directory).
//! - Reducing raw `notify` events to a small closed set of operations.
//!
//! It does **not** decide when to run scripts; that is the engine's job.

pub mod event;
pub mod path_utils;
pub mod patterns;
pub mod source;
pub mod tree;

pub use event::{Disposition, FsEvent, FsOp, RegistrationEffect};
pub use patterns::{should_ignore, IgnoreMatcher};
pub use source::{notify_event_source, NotifyRegistrar, RawEventReceiver, RawEventSender};
pub use tree::{DirRegistrar, WatchTree};
