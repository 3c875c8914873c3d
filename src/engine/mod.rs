// src/engine/mod.rs

//! Orchestration engine for syncwatcher.
//!
//! One [`TargetSupervisor`] per configured target, all sharing an
//! [`AppContext`]. Each supervisor folds raw filesystem events through a
//! [`DebounceEngine`] and starts runs through its [`RunSerializer`].

pub mod context;
pub mod debounce;
pub mod serializer;
pub mod supervisor;

pub use context::AppContext;
pub use debounce::{DebounceEngine, Trigger};
pub use serializer::{RunPermit, RunSerializer};
pub use supervisor::{ScriptJob, SupervisorState, TargetSupervisor};
