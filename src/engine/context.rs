// src/engine/context.rs

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::ConfigFile;
use crate::exec::ScriptRunner;
use crate::fs::FileSystem;
use crate::types::Interpreter;

/// Process-wide state shared by every supervisor.
///
/// Built once in [`crate::run`] and handed to each supervisor as an `Arc`;
/// nothing in here changes after construction except the shutdown token
/// being cancelled.
#[derive(Clone)]
pub struct AppContext {
    pub interpreter: Interpreter,
    pub quiescence: Duration,
    pub runner: Arc<dyn ScriptRunner>,
    pub fs: Arc<dyn FileSystem>,
    pub shutdown: CancellationToken,
    /// Log ignored directories at info instead of debug.
    pub show_ignored: bool,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("interpreter", &self.interpreter)
            .field("quiescence", &self.quiescence)
            .field("shutdown", &self.shutdown.is_cancelled())
            .finish_non_exhaustive()
    }
}

impl AppContext {
    pub fn new(
        interpreter: Interpreter,
        quiescence: Duration,
        runner: Arc<dyn ScriptRunner>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self {
            interpreter,
            quiescence,
            runner,
            fs,
            shutdown: CancellationToken::new(),
            show_ignored: false,
        }
    }

    pub fn from_config(
        cfg: &ConfigFile,
        runner: Arc<dyn ScriptRunner>,
        fs: Arc<dyn FileSystem>,
    ) -> Self {
        Self::new(cfg.interpreter().clone(), cfg.quiescence(), runner, fs)
    }

    pub fn with_show_ignored(mut self, show: bool) -> Self {
        self.show_ignored = show;
        self
    }

    /// Ask every supervisor to stop. Idempotent.
    pub fn request_shutdown(&self) {
        self.shutdown.cancel();
    }
}
