// src/engine/supervisor.rs

//! Per-target lifecycle: watch tree, debounce, run serialization.
//!
//! ```text
//! Starting ──build tree──▶ Watching ──cancel──▶ Stopped
//!     │                      │  ▲
//!     └─walk failed─▶ Stopped │  └─ trigger: run (slot free) or drop (busy)
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tokio::time::{sleep_until, Instant};
use tracing::{debug, error, info, trace, warn};

use crate::config::WatchTarget;
use crate::engine::context::AppContext;
use crate::engine::debounce::{DebounceEngine, Trigger};
use crate::engine::serializer::RunSerializer;
use crate::errors::{Result, SyncWatcherError};
use crate::exec::{ExecutionResult, ScriptRequest, ScriptRunner};
use crate::fs::EntryKind;
use crate::types::SYNC_DIR_ENV;
use crate::watch::{
    notify_event_source, DirRegistrar, FsEvent, FsOp, NotifyRegistrar, RawEventReceiver,
    RegistrationEffect, WatchTree,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupervisorState {
    Starting,
    Watching,
    Stopped,
}

/// The script of one target, ready to run any number of times.
#[derive(Debug)]
pub struct ScriptJob {
    request: ScriptRequest,
    root_dir: String,
    suppress_output_logging: bool,
}

impl ScriptJob {
    pub fn new(ctx: &AppContext, target: &WatchTarget) -> Self {
        let root_dir = target.root_dir().display().to_string();
        let mut env = BTreeMap::new();
        env.insert(SYNC_DIR_ENV.to_string(), target.root_dir().as_os_str().to_owned());

        Self {
            request: ScriptRequest {
                script: target.script().to_string(),
                interpreter: ctx.interpreter.clone(),
                env,
            },
            root_dir,
            suppress_output_logging: target.suppress_output_logging(),
        }
    }

    /// Run the script once and log the outcome. Never fails: every error is
    /// reported to the log and watching carries on.
    pub async fn execute(&self, runner: &dyn ScriptRunner) -> Option<ExecutionResult> {
        info!(target_dir = %self.root_dir, script = %self.request.script, "running script");

        match runner.run(&self.request).await {
            Ok(result) => {
                self.report(&result);
                Some(result)
            }
            Err(err) => {
                error!(target_dir = %self.root_dir, error = %err, "script could not be run");
                None
            }
        }
    }

    fn report(&self, result: &ExecutionResult) {
        if !result.success() {
            error!(
                target_dir = %self.root_dir,
                exit_code = result.exit_code,
                stdout = %result.stdout_lossy(),
                stderr = %result.stderr_lossy(),
                "script exited with non-zero status"
            );
            return;
        }

        info!(target_dir = %self.root_dir, exit_code = result.exit_code, "script finished");
        if !self.suppress_output_logging {
            info!(
                target_dir = %self.root_dir,
                stdout = %result.stdout_lossy(),
                stderr = %result.stderr_lossy(),
                "script output"
            );
        }
    }
}

/// Owns one target from startup to shutdown.
pub struct TargetSupervisor<R: DirRegistrar> {
    ctx: Arc<AppContext>,
    target: WatchTarget,
    tree: WatchTree<R>,
    events: RawEventReceiver,
    debounce: DebounceEngine,
    serializer: RunSerializer,
    job: Arc<ScriptJob>,
    state: SupervisorState,
}

impl<R: DirRegistrar> std::fmt::Debug for TargetSupervisor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetSupervisor")
            .field("root_dir", &self.target.root_dir())
            .field("state", &self.state)
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

impl TargetSupervisor<NotifyRegistrar> {
    /// Supervisor backed by the platform's recommended `notify` watcher.
    pub fn with_notify(ctx: Arc<AppContext>, target: WatchTarget) -> Result<Self> {
        let (registrar, events) =
            notify_event_source().map_err(|e| SyncWatcherError::WatchSetupError {
                dir: target.root_dir().to_path_buf(),
                reason: format!("creating file watcher: {e:#}"),
            })?;
        Ok(Self::new(ctx, target, registrar, events))
    }
}

impl<R: DirRegistrar + 'static> TargetSupervisor<R> {
    /// Build a supervisor from an explicit registrar and event stream.
    ///
    /// `events` must carry the events for directories registered through
    /// `registrar`.
    pub fn new(
        ctx: Arc<AppContext>,
        target: WatchTarget,
        registrar: R,
        events: RawEventReceiver,
    ) -> Self {
        let tree = WatchTree::new(
            target.root_dir(),
            target.ignore().clone(),
            Arc::clone(&ctx.fs),
            registrar,
        )
        .with_show_ignored(ctx.show_ignored);

        let job = Arc::new(ScriptJob::new(&ctx, &target));
        let debounce = DebounceEngine::new(ctx.quiescence);

        Self {
            ctx,
            target,
            tree,
            events,
            debounce,
            serializer: RunSerializer::new(),
            job,
            state: SupervisorState::Starting,
        }
    }

    /// Handle to this target's run slot.
    pub fn serializer(&self) -> RunSerializer {
        self.serializer.clone()
    }

    pub fn target(&self) -> &WatchTarget {
        &self.target
    }

    /// Run until the shared shutdown token is cancelled.
    ///
    /// Returns `Err` only if the target could not start; the error is
    /// fatal to this target alone.
    pub async fn run(mut self) -> Result<()> {
        let root = self.target.root_dir().to_path_buf();

        if let Err(e) = self.tree.build() {
            self.transition(SupervisorState::Stopped);
            return Err(SyncWatcherError::WatchSetupError {
                dir: root,
                reason: format!("initial directory walk failed: {e:#}"),
            });
        }
        self.transition(SupervisorState::Watching);

        // Not subject to the run slot: nothing else can be running yet.
        if self.target.sync_first() {
            info!(target_dir = ?root, "initial sync before watching");
            self.job.execute(self.ctx.runner.as_ref()).await;
        }

        info!(target_dir = ?root, dirs = self.tree.len(), "watching");
        self.event_loop().await;
        self.stop();
        Ok(())
    }

    async fn event_loop(&mut self) {
        let shutdown = self.ctx.shutdown.clone();

        loop {
            let deadline = self.debounce.deadline();

            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    debug!(target_dir = ?self.target.root_dir(), "shutdown observed");
                    break;
                }

                received = self.events.recv() => match received {
                    Some(Ok(event)) => match FsEvent::from_notify(event) {
                        Some(event) => self.handle_event(event),
                        None => trace!("unclassified fs event"),
                    },
                    Some(Err(err)) => {
                        warn!(target_dir = ?self.target.root_dir(), error = %err, "file watch error");
                    }
                    None => {
                        warn!(target_dir = ?self.target.root_dir(), "event source closed; stopping target");
                        break;
                    }
                },

                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    if let Some(trigger) = self.debounce.poll_trigger(Instant::now()) {
                        self.dispatch(trigger);
                    }
                }
            }
        }
    }

    /// Apply one classified event: registration bookkeeping first, then the
    /// debounce decision.
    fn handle_event(&mut self, event: FsEvent) {
        let op = event.op;
        let mut relevant = 0;

        for path in &event.paths {
            if self.tree.is_ignored(path) {
                trace!(op = op.as_str(), path = ?path, "ignored path");
                continue;
            }
            relevant += 1;
            debug!(op = op.as_str(), path = ?path, "fs event");
            self.apply_registration(op, path);
        }

        if relevant == 0 {
            return;
        }

        if self.debounce.observe(op.disposition(), Instant::now()) {
            trace!(window = ?self.debounce.window(), "debounce countdown reset");
        }
    }

    fn apply_registration(&mut self, op: FsOp, path: &Path) {
        match op.registration_effect() {
            RegistrationEffect::RegisterIfDir => self.register_if_dir(path),
            RegistrationEffect::Unregister => {
                self.tree.unregister_subtree(path);
            }
            RegistrationEffect::Reconcile => {
                if self.is_plain_dir(path) {
                    self.register_if_dir(path);
                } else {
                    self.tree.unregister_subtree(path);
                }
            }
            RegistrationEffect::None => {}
        }
    }

    fn is_plain_dir(&self, path: &Path) -> bool {
        self.ctx.fs.entry_kind(path) == Some(EntryKind::Dir)
    }

    fn register_if_dir(&mut self, path: &Path) {
        if !self.is_plain_dir(path) {
            return;
        }
        match self.tree.register_subtree(path) {
            Ok(added) => debug!(path = ?path, added, "registered new dir"),
            Err(e) => {
                let err = SyncWatcherError::WatchMaintenanceError {
                    path: path.to_path_buf(),
                    reason: format!("{e:#}"),
                };
                warn!(target_dir = ?self.target.root_dir(), error = %err, "watch set may be incomplete");
            }
        }
    }

    /// Start a run if the slot is free; otherwise drop the trigger.
    fn dispatch(&self, trigger: Trigger) {
        let Some(permit) = self.serializer.try_acquire() else {
            info!(
                target_dir = ?self.target.root_dir(),
                events = trigger.events,
                "script still running; dropping change"
            );
            return;
        };

        debug!(
            target_dir = ?self.target.root_dir(),
            events = trigger.events,
            burst = ?trigger.last_event.duration_since(trigger.first_event),
            "change settled; starting run"
        );

        let job = Arc::clone(&self.job);
        let runner = Arc::clone(&self.ctx.runner);
        tokio::spawn(async move {
            let _permit = permit;
            job.execute(runner.as_ref()).await;
        });
    }

    fn stop(&mut self) {
        self.tree.clear();
        if self.serializer.is_busy() {
            warn!(
                target_dir = ?self.target.root_dir(),
                "script still running; it is left to finish on its own"
            );
        }
        self.transition(SupervisorState::Stopped);
    }

    fn transition(&mut self, next: SupervisorState) {
        debug!(target_dir = ?self.target.root_dir(), from = ?self.state, to = ?next, "supervisor state");
        self.state = next;
    }
}
