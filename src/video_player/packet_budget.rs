// SPDX-License-Identifier: MPL-2.0
//! Per-call work budget for the decode loops.
//!
//! Catch-up and seek scans read packets until a condition holds. On a
//! single-threaded host one call must not monopolise a tick, so each call
//! may read at most this many packets before yielding.

use crate::config::{DEFAULT_PACKETS_PER_TICK, MAX_PACKETS_PER_TICK, MIN_PACKETS_PER_TICK};

/// Maximum packets read per update or seek poll.
///
/// # Example
///
/// ```
/// use group_player::video_player::PacketBudget;
///
/// let budget = PacketBudget::new(128);
/// assert_eq!(budget.value(), 128);
///
/// // Values outside range are clamped
/// let too_low = PacketBudget::new(0);
/// assert_eq!(too_low.value(), 8);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketBudget(usize);

impl PacketBudget {
    /// Creates a budget, clamping to valid range.
    #[must_use]
    pub fn new(value: usize) -> Self {
        Self(value.clamp(MIN_PACKETS_PER_TICK, MAX_PACKETS_PER_TICK))
    }

    #[must_use]
    pub fn value(self) -> usize {
        self.0
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= MIN_PACKETS_PER_TICK
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= MAX_PACKETS_PER_TICK
    }
}

impl Default for PacketBudget {
    fn default() -> Self {
        Self(DEFAULT_PACKETS_PER_TICK)
    }
}
