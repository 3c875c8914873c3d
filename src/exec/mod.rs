// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`command`] spawns a script through the configured interpreter using
//!   `tokio::process::Command` and captures its output.
//! - [`backend`] provides the `ScriptRunner` trait and the production
//!   `ShellRunner`, which tests can replace with a fake implementation.

pub mod backend;
pub mod command;

pub use backend::{ScriptRunner, ShellRunner};
pub use command::{run_command, ExecutionResult, ScriptRequest};
