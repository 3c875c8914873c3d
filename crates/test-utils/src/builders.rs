#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::event::{CreateKind, DataChange, EventKind, MetadataKind, ModifyKind, RemoveKind, RenameMode};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use syncwatcher::config::WatchTarget;
use syncwatcher::engine::{AppContext, RunSerializer, TargetSupervisor};
use syncwatcher::errors::Result;
use syncwatcher::fs::FileSystem;
use syncwatcher::types::Interpreter;
use syncwatcher::watch::{IgnoreMatcher, RawEventSender};

use crate::fake_executor::RecordingRunner;
use crate::fake_registrar::RecordingRegistrar;

/// Builder for `WatchTarget` to simplify test setup.
pub struct WatchTargetBuilder {
    root: PathBuf,
    script: String,
    ignore: Vec<String>,
    sync_first: bool,
    suppress_output_logging: bool,
}

impl WatchTargetBuilder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            script: "echo ok".to_string(),
            ignore: Vec::new(),
            sync_first: false,
            suppress_output_logging: false,
        }
    }

    pub fn script(mut self, script: &str) -> Self {
        self.script = script.to_string();
        self
    }

    pub fn ignore(mut self, pattern: &str) -> Self {
        self.ignore.push(pattern.to_string());
        self
    }

    pub fn sync_first(mut self, val: bool) -> Self {
        self.sync_first = val;
        self
    }

    pub fn suppress_output_logging(mut self, val: bool) -> Self {
        self.suppress_output_logging = val;
        self
    }

    pub fn build(self) -> WatchTarget {
        let ignore = IgnoreMatcher::new(&self.ignore).expect("invalid ignore pattern in test");
        WatchTarget::new(self.root, self.script, ignore)
            .with_sync_first(self.sync_first)
            .with_suppress_output_logging(self.suppress_output_logging)
    }
}

/// Shared context wired to a fake runner.
pub fn test_context(
    runner: &RecordingRunner,
    fs: Arc<dyn FileSystem>,
    quiescence: Duration,
) -> Arc<AppContext> {
    Arc::new(AppContext::new(
        Interpreter::default(),
        quiescence,
        Arc::new(runner.clone()),
        fs,
    ))
}

/// One supervisor running in the background on fake IO.
pub struct SupervisorHarness {
    pub ctx: Arc<AppContext>,
    pub registrar: RecordingRegistrar,
    pub serializer: RunSerializer,
    events: RawEventSender,
    handle: JoinHandle<Result<()>>,
}

impl SupervisorHarness {
    pub fn spawn(ctx: Arc<AppContext>, target: WatchTarget) -> Self {
        Self::spawn_with(ctx, target, RecordingRegistrar::new())
    }

    pub fn spawn_with(ctx: Arc<AppContext>, target: WatchTarget, registrar: RecordingRegistrar) -> Self {
        let (events, rx) = mpsc::unbounded_channel();
        let supervisor = TargetSupervisor::new(Arc::clone(&ctx), target, registrar.clone(), rx);
        let serializer = supervisor.serializer();
        let handle = tokio::spawn(supervisor.run());
        Self {
            ctx,
            registrar,
            serializer,
            events,
            handle,
        }
    }

    pub fn send(&self, kind: EventKind, path: impl AsRef<Path>) {
        let event = notify::Event::new(kind).add_path(path.as_ref().to_path_buf());
        // Ignore send errors: the supervisor may already have stopped.
        let _ = self.events.send(Ok(event));
    }

    pub fn send_raw(&self, event: notify::Result<notify::Event>) {
        let _ = self.events.send(event);
    }

    pub fn write(&self, path: impl AsRef<Path>) {
        self.send(EventKind::Modify(ModifyKind::Data(DataChange::Content)), path);
    }

    pub fn chmod(&self, path: impl AsRef<Path>) {
        self.send(EventKind::Modify(ModifyKind::Metadata(MetadataKind::Permissions)), path);
    }

    pub fn created_file(&self, path: impl AsRef<Path>) {
        self.send(EventKind::Create(CreateKind::File), path);
    }

    pub fn created_dir(&self, path: impl AsRef<Path>) {
        self.send(EventKind::Create(CreateKind::Folder), path);
    }

    pub fn removed(&self, path: impl AsRef<Path>) {
        self.send(EventKind::Remove(RemoveKind::Any), path);
    }

    pub fn renamed(&self, from: impl AsRef<Path>, to: impl AsRef<Path>) {
        let event = notify::Event::new(EventKind::Modify(ModifyKind::Name(RenameMode::Both)))
            .add_path(from.as_ref().to_path_buf())
            .add_path(to.as_ref().to_path_buf());
        let _ = self.events.send(Ok(event));
    }

    /// True once the supervisor task has returned.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the shared token and wait for the supervisor to stop.
    pub async fn shutdown(self) -> Result<()> {
        self.ctx.request_shutdown();
        self.join().await
    }

    /// Wait for the supervisor to stop on its own.
    pub async fn join(self) -> Result<()> {
        self.handle.await.expect("supervisor task panicked")
    }
}
