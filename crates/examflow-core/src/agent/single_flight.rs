//! Single-flight guard for evaluation passes.
//!
//! At most one evaluation runs at a time; at most one follow-up waits
//! behind it. Triggers arriving beyond that are dropped and picked up
//! by the next periodic pass.

use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of asking to start a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Passage {
    /// Caller holds the flight and must call [`SingleFlight::finish`].
    Entered,
    /// A pass is in flight; one follow-up is now queued behind it.
    Queued,
    /// A pass is in flight and a follow-up was already queued.
    Dropped,
}

/// Lock-free guard: one flight, one queued follow-up.
///
/// A follow-up queued in the instant a flight is being released may not
/// be drained by that holder; the next trigger picks it up.
pub struct SingleFlight {
    busy: AtomicBool,
    queued: AtomicBool,
}

impl SingleFlight {
    pub const fn new() -> Self {
        Self {
            busy: AtomicBool::new(false),
            queued: AtomicBool::new(false),
        }
    }

    /// Try to start a pass.
    pub fn try_begin(&self) -> Passage {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            Passage::Entered
        } else if !self.queued.swap(true, Ordering::AcqRel) {
            Passage::Queued
        } else {
            Passage::Dropped
        }
    }

    /// Finish a pass. Returns true when a queued follow-up was claimed;
    /// the caller must then run another pass before releasing the
    /// flight. Returns false once the flight is released.
    pub fn finish(&self) -> bool {
        if self.queued.swap(false, Ordering::AcqRel) {
            true
        } else {
            self.busy.store(false, Ordering::Release);
            false
        }
    }
}

impl Default for SingleFlight {
    fn default() -> Self {
        Self::new()
    }
}
