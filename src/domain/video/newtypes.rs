// SPDX-License-Identifier: MPL-2.0
//! Video playback newtypes.
//!
//! This module provides type-safe wrappers for playback values,
//! ensuring they are always within valid ranges.

use std::fmt;
use std::time::Duration;

const NANOS_PER_SEC: i128 = 1_000_000_000;

// =============================================================================
// TimeBase
// =============================================================================

/// Fractional unit in which a container expresses timestamps.
///
/// A timestamp of `ticks` in a time base `num/den` lasts
/// `ticks * num / den` seconds. Conversions are done in integer
/// nanoseconds so round trips do not drift.
///
/// # Example
///
/// ```
/// use group_player::domain::video::TimeBase;
/// use std::time::Duration;
///
/// let tb = TimeBase::new(1, 90_000);
/// assert_eq!(tb.to_duration(45_000), Duration::from_millis(500));
/// assert_eq!(tb.to_ticks(Duration::from_secs(1)), 90_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeBase {
    num: i32,
    den: i32,
}

impl TimeBase {
    /// Microsecond ticks, the unit containers use for global durations.
    pub const MICROSECONDS: Self = Self {
        num: 1,
        den: 1_000_000,
    };

    /// Millisecond ticks.
    pub const MILLISECONDS: Self = Self { num: 1, den: 1_000 };

    /// Creates a time base from a numerator and denominator.
    #[must_use]
    pub const fn new(num: i32, den: i32) -> Self {
        Self { num, den }
    }

    #[must_use]
    pub fn numerator(self) -> i32 {
        self.num
    }

    #[must_use]
    pub fn denominator(self) -> i32 {
        self.den
    }

    /// Returns false for degenerate fractions (zero or negative terms).
    #[must_use]
    pub fn is_valid(self) -> bool {
        self.num > 0 && self.den > 0
    }

    /// Returns the fraction as seconds per tick.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        if self.den == 0 {
            return 0.0;
        }
        f64::from(self.num) / f64::from(self.den)
    }

    /// Converts a tick count to a duration.
    ///
    /// Negative ticks and invalid time bases yield [`Duration::ZERO`].
    #[must_use]
    pub fn to_duration(self, ticks: i64) -> Duration {
        if !self.is_valid() || ticks <= 0 {
            return Duration::ZERO;
        }
        let nanos = i128::from(ticks) * i128::from(self.num) * NANOS_PER_SEC / i128::from(self.den);
        duration_from_nanos(nanos)
    }

    /// Converts a duration to ticks, truncating toward zero.
    #[must_use]
    pub fn to_ticks(self, duration: Duration) -> i64 {
        if !self.is_valid() {
            return 0;
        }
        let nanos = i128::try_from(duration.as_nanos()).unwrap_or(i128::MAX);
        let ticks = nanos.saturating_mul(i128::from(self.den))
            / (i128::from(self.num) * NANOS_PER_SEC);
        i64::try_from(ticks).unwrap_or(i64::MAX)
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::MICROSECONDS
    }
}

impl fmt::Display for TimeBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

fn duration_from_nanos(nanos: i128) -> Duration {
    let secs = u64::try_from(nanos / NANOS_PER_SEC).unwrap_or(u64::MAX);
    // Remainder is always below one billion.
    let subsec = u32::try_from(nanos % NANOS_PER_SEC).unwrap_or(0);
    Duration::new(secs, subsec)
}

// =============================================================================
// PlaybackSpeed
// =============================================================================

/// Playback speed bounds (0.1x to 8.0x).
pub mod speed_bounds {
    /// Minimum playback speed (0.1x = ten times slower).
    pub const MIN: f64 = 0.1;
    /// Maximum playback speed (8x = eight times faster).
    pub const MAX: f64 = 8.0;
    /// Default playback speed (1.0 = normal speed).
    pub const DEFAULT: f64 = 1.0;
    /// Playback speed presets for stepping up and down.
    pub const PRESETS: &[f64] = &[
        0.1, 0.15, 0.2, 0.25, 0.33, 0.5, 0.75, 1.0, 1.25, 1.5, 2.0, 4.0, 8.0,
    ];
}

/// Group clock multiplier, guaranteed to be within valid range (0.1x - 8.0x).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSpeed(f64);

impl PlaybackSpeed {
    /// Creates a new playback speed, clamping to valid range.
    ///
    /// NaN falls back to the default speed.
    #[must_use]
    pub fn new(speed: f64) -> Self {
        if speed.is_nan() {
            return Self::default();
        }
        Self(speed.clamp(speed_bounds::MIN, speed_bounds::MAX))
    }

    /// Returns the speed value as f64.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Scales a wall-clock interval into group-clock time.
    #[must_use]
    pub fn scale(self, elapsed: Duration) -> Duration {
        elapsed.mul_f64(self.0)
    }

    /// Returns the next higher preset speed, or self if at maximum.
    #[must_use]
    pub fn increase(self) -> Self {
        let next = speed_bounds::PRESETS
            .iter()
            .find(|&&s| s > self.0 + 0.001)
            .copied()
            .unwrap_or(self.0);
        Self(next)
    }

    /// Returns the next lower preset speed, or self if at minimum.
    #[must_use]
    pub fn decrease(self) -> Self {
        let prev = speed_bounds::PRESETS
            .iter()
            .rev()
            .find(|&&s| s < self.0 - 0.001)
            .copied()
            .unwrap_or(self.0);
        Self(prev)
    }

    #[must_use]
    pub fn is_min(self) -> bool {
        self.0 <= speed_bounds::MIN
    }

    #[must_use]
    pub fn is_max(self) -> bool {
        self.0 >= speed_bounds::MAX
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self(speed_bounds::DEFAULT)
    }
}

// =============================================================================
// MemberId
// =============================================================================

/// Identifier of a stream inside a playback group.
///
/// Ids are chosen by the caller (usually the project layer) and must be
/// unique within one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(u64);

impl MemberId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

impl From<u64> for MemberId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
