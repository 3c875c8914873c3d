// src/engine/serializer.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Per-target run slot: at most one script execution in flight.
///
/// Acquisition never blocks. A trigger that finds the slot busy is meant to
/// be dropped by the caller, not queued or retried.
#[derive(Debug, Clone, Default)]
pub struct RunSerializer {
    busy: Arc<AtomicBool>,
}

impl RunSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the slot busy if it was free.
    ///
    /// The returned permit frees the slot when dropped, so the release also
    /// happens if the run errors or its task panics.
    pub fn try_acquire(&self) -> Option<RunPermit> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| RunPermit {
                busy: Arc::clone(&self.busy),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Proof of holding a target's run slot.
#[derive(Debug)]
#[must_use = "dropping the permit frees the run slot immediately"]
pub struct RunPermit {
    busy: Arc<AtomicBool>,
}

impl Drop for RunPermit {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
