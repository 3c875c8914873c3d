// src/watch/source.rs

//! `notify`-backed event source for one target.

use std::path::Path;

use anyhow::Result;
use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::watch::tree::DirRegistrar;

/// Raw events as delivered by the OS watch facility.
pub type RawEventReceiver = mpsc::UnboundedReceiver<notify::Result<Event>>;
pub type RawEventSender = mpsc::UnboundedSender<notify::Result<Event>>;

/// Registers directories non-recursively with a `RecommendedWatcher`.
///
/// Dropping this stops all watching and closes the event channel.
pub struct NotifyRegistrar {
    inner: RecommendedWatcher,
}

impl std::fmt::Debug for NotifyRegistrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotifyRegistrar").finish()
    }
}

impl DirRegistrar for NotifyRegistrar {
    fn watch_dir(&mut self, path: &Path) -> Result<()> {
        self.inner.watch(path, RecursiveMode::NonRecursive)?;
        Ok(())
    }

    fn unwatch_dir(&mut self, path: &Path) -> Result<()> {
        self.inner.unwatch(path)?;
        Ok(())
    }
}

/// Create a watcher whose events (and errors) are forwarded, in delivery
/// order, into an unbounded tokio channel.
pub fn notify_event_source() -> Result<(NotifyRegistrar, RawEventReceiver)> {
    let (event_tx, event_rx): (RawEventSender, RawEventReceiver) = mpsc::unbounded_channel();

    // Called synchronously on notify's own thread. A send error only means
    // the supervisor has already stopped.
    let inner = RecommendedWatcher::new(
        move |res: notify::Result<Event>| {
            let _ = event_tx.send(res);
        },
        Config::default(),
    )?;

    Ok((NotifyRegistrar { inner }, event_rx))
}
