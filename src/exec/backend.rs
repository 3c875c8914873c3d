// src/exec/backend.rs

//! Pluggable script runner abstraction.
//!
//! Supervisors talk to a `ScriptRunner` instead of spawning processes
//! directly. This makes it easy to swap in a fake runner in tests while
//! keeping the production implementation in [`super::command`].

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

use super::command::{run_command, ExecutionResult, ScriptRequest};

/// Trait abstracting how a script is executed.
///
/// Production code uses [`ShellRunner`]; tests can provide their own
/// implementation that doesn't spawn real processes.
pub trait ScriptRunner: Send + Sync {
    /// Run the script to completion.
    ///
    /// `Err` means the script could not be run at all; a script that ran and
    /// failed is an `Ok` with a non-zero exit code.
    fn run<'a>(
        &'a self,
        request: &'a ScriptRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>>;
}

/// Real runner used in production: spawns the interpreter as a child process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl ScriptRunner for ShellRunner {
    fn run<'a>(
        &'a self,
        request: &'a ScriptRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ExecutionResult>> + Send + 'a>> {
        Box::pin(run_command(request))
    }
}
