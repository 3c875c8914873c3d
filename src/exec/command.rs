// src/exec/command.rs

//! One-shot script execution with fully captured output.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use crate::errors::{Result, SyncWatcherError};
use crate::types::Interpreter;

/// Everything needed to run a script once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRequest {
    pub script: String,
    pub interpreter: Interpreter,
    /// The child's *entire* environment; nothing is inherited.
    pub env: BTreeMap<String, OsString>,
}

/// Outcome of a script that was started successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Exit status, or -1 if the process was terminated by a signal.
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ExecutionResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Spawn `<interpreter> <flag> <script>` with exactly `request.env` and wait
/// for it, capturing stdout/stderr in memory.
///
/// A non-zero exit is reported through [`ExecutionResult::exit_code`];
/// only a failure to start or wait for the process is an `Err`.
pub async fn run_command(request: &ScriptRequest) -> Result<ExecutionResult> {
    let mut cmd = Command::new(&request.interpreter.program);
    cmd.arg(&request.interpreter.flag)
        .arg(&request.script)
        .env_clear()
        .envs(&request.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(
        interpreter = %request.interpreter,
        script = %request.script,
        "spawning script process"
    );

    let output = cmd.output().await.map_err(|e| {
        SyncWatcherError::ScriptExecutionError(format!(
            "starting `{} {}` failed: {e}",
            request.interpreter, request.script
        ))
    })?;

    Ok(ExecutionResult {
        exit_code: output.status.code().unwrap_or(-1),
        stdout: output.stdout,
        stderr: output.stderr,
    })
}
