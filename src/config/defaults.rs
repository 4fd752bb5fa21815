// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! This module serves as the single source of truth for default values
//! used by the decode pipeline and the group synchronizer.
//!
//! # Categories
//!
//! - **Frame rate**: Fallback when a container declares no usable rate
//! - **Work budget**: Packets read per call before yielding to the host
//! - **Group**: Playback speed and looping defaults

use crate::domain::video::newtypes::speed_bounds;

// ==========================================================================
// Frame Rate Defaults
// ==========================================================================

/// Frame rate assumed when the container reports none.
pub const DEFAULT_FALLBACK_FPS: f64 = 30.0;

/// Smallest frame rate accepted as a fallback.
pub const MIN_FALLBACK_FPS: f64 = 1.0;

/// Largest frame rate accepted as a fallback.
pub const MAX_FALLBACK_FPS: f64 = 240.0;

/// Declared rates at or below this are treated as missing.
pub const FPS_EPSILON: f64 = 0.000_025;

// ==========================================================================
// Work Budget Defaults
// ==========================================================================

/// Packets a stream may read in one update or seek poll.
pub const DEFAULT_PACKETS_PER_TICK: usize = 512;

/// Minimum packets per tick (one GOP of a still image needs at least this).
pub const MIN_PACKETS_PER_TICK: usize = 8;

/// Maximum packets per tick.
pub const MAX_PACKETS_PER_TICK: usize = 65_536;

// ==========================================================================
// Group Defaults
// ==========================================================================

/// Group clock multiplier on a fresh group.
pub const DEFAULT_SPEED: f64 = speed_bounds::DEFAULT;

/// Whether a fresh group restarts at the end.
pub const DEFAULT_LOOPING: bool = false;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    // Frame rate validation
    assert!(MIN_FALLBACK_FPS > 0.0);
    assert!(MAX_FALLBACK_FPS > MIN_FALLBACK_FPS);
    assert!(DEFAULT_FALLBACK_FPS >= MIN_FALLBACK_FPS);
    assert!(DEFAULT_FALLBACK_FPS <= MAX_FALLBACK_FPS);
    assert!(FPS_EPSILON < MIN_FALLBACK_FPS);

    // Work budget validation
    assert!(MIN_PACKETS_PER_TICK > 0);
    assert!(MAX_PACKETS_PER_TICK >= MIN_PACKETS_PER_TICK);
    assert!(DEFAULT_PACKETS_PER_TICK >= MIN_PACKETS_PER_TICK);
    assert!(DEFAULT_PACKETS_PER_TICK <= MAX_PACKETS_PER_TICK);

    // Speed validation
    assert!(DEFAULT_SPEED >= speed_bounds::MIN);
    assert!(DEFAULT_SPEED <= speed_bounds::MAX);
};
