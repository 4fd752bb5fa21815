// SPDX-License-Identifier: MPL-2.0
//! Stream-level facts gathered when a container is opened.

use std::time::Duration;

/// Resolution, rate and length of the active video stream.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StreamMetadata {
    pub width: u32,
    pub height: u32,
    /// Frames per second after fallbacks; always positive once opened.
    pub fps: f64,
    pub frame_count: u64,
    pub duration: Duration,
}

impl StreamMetadata {
    /// Nominal duration of one frame.
    #[must_use]
    pub fn frame_time(&self) -> Duration {
        if self.fps > 0.0 {
            Duration::from_secs_f64(1.0 / self.fps)
        } else {
            Duration::ZERO
        }
    }

    /// Start time of frame `frame_number` at the nominal rate.
    #[must_use]
    pub fn frame_number_to_timestamp(&self, frame_number: u64) -> Duration {
        if self.fps <= 0.0 {
            return Duration::ZERO;
        }
        #[allow(clippy::cast_precision_loss)]
        let secs = frame_number as f64 / self.fps;
        Duration::from_secs_f64(secs)
    }

    /// Nearest frame number for `timestamp` at the nominal rate.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn timestamp_to_frame_number(&self, timestamp: Duration) -> u64 {
        (timestamp.as_secs_f64() * self.fps).round().max(0.0) as u64
    }
}
