// src/engine/debounce.rs

//! Quiescence-based coalescing of filesystem events.
//!
//! Pure and clock-agnostic: callers pass `now` in, so the engine can be
//! tested without Tokio. Each qualifying event pushes the deadline out to
//! `now + window`; a trigger only comes out of [`DebounceEngine::poll_trigger`]
//! once that deadline has passed with no further qualifying events.

use std::time::Duration;

use tokio::time::Instant;

use crate::watch::Disposition;

/// A coalesced "run the script now" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    /// Number of qualifying raw events folded into this trigger.
    pub events: usize,
    pub first_event: Instant,
    pub last_event: Instant,
}

#[derive(Debug, Clone, Copy)]
struct Pending {
    events: usize,
    first_event: Instant,
    last_event: Instant,
}

#[derive(Debug, Clone)]
pub struct DebounceEngine {
    window: Duration,
    pending: Option<Pending>,
}

impl DebounceEngine {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Whether at least one qualifying event is waiting for quiescence.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Fold one classified event in. Returns true if it armed or re-armed
    /// the countdown.
    pub fn observe(&mut self, disposition: Disposition, now: Instant) -> bool {
        if disposition != Disposition::TriggersRun {
            return false;
        }

        match self.pending.as_mut() {
            Some(p) => {
                p.events += 1;
                p.last_event = now;
            }
            None => {
                self.pending = Some(Pending {
                    events: 1,
                    first_event: now,
                    last_event: now,
                });
            }
        }
        true
    }

    /// When the pending trigger becomes due, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.map(|p| p.last_event + self.window)
    }

    /// Hand off the consolidated trigger if the window has elapsed since the
    /// last qualifying event. Otherwise leave it armed.
    pub fn poll_trigger(&mut self, now: Instant) -> Option<Trigger> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }

        self.pending.take().map(|p| Trigger {
            events: p.events,
            first_event: p.first_event,
            last_event: p.last_event,
        })
    }

    /// Forget any pending trigger.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}
