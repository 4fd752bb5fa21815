// SPDX-License-Identifier: MPL-2.0
//! Wall-clock sources for the group clock.
//!
//! The group synchronizer samples a [`Clock`] once per update and advances
//! its timestamp by the elapsed interval times the playback speed.
//!
//! ```text
//!  host tick ──▶ Clock::now() ──▶ elapsed × speed ──▶ group timestamp
//!                                                        │ − offset
//!                                                        ▼
//!                                              member update(local time)
//! ```

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Source of monotonic instants.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// The process monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test (or a frame-stepping host)
/// can keep one handle and give the other to a group.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Moves every handle forward by `step`.
    pub fn advance(&self, step: Duration) {
        self.now.set(self.now.get() + step);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}
