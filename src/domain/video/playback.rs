// SPDX-License-Identifier: MPL-2.0
//! Group playback state machine.
//!
//! A group is either stopped or playing. Looping is an orthogonal flag
//! kept next to the state, not a state of its own.

/// Represents the current playback state of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Group clock is frozen.
    #[default]
    Stopped,
    /// Group clock advances on every update.
    Playing,
}

impl PlaybackState {
    #[must_use]
    pub fn from_playing(playing: bool) -> Self {
        if playing {
            Self::Playing
        } else {
            Self::Stopped
        }
    }

    /// Returns true if the group clock is advancing.
    #[must_use]
    pub fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }

    /// Returns true if the group clock is frozen.
    #[must_use]
    pub fn is_stopped(self) -> bool {
        matches!(self, Self::Stopped)
    }
}
