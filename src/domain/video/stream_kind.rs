// SPDX-License-Identifier: MPL-2.0
//! Stream kinds and per-kind storage.
//!
//! A decoder session tracks at most one stream per kind. [`PerKind`] holds
//! exactly one slot per trackable kind, so that rule is a property of the
//! type rather than of index bookkeeping.

use std::fmt;

/// Media type of a container stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamKind {
    Video,
    Audio,
    /// Subtitles, data tracks, attachments and anything else.
    #[default]
    Unknown,
}

impl StreamKind {
    /// Kinds a session can track, in slot order.
    pub const TRACKED: [StreamKind; 2] = [StreamKind::Video, StreamKind::Audio];

    /// Returns true if a session can keep a stream of this kind.
    #[must_use]
    pub fn is_tracked(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for StreamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One value per tracked [`StreamKind`].
///
/// Lookups with [`StreamKind::Unknown`] return `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PerKind<T> {
    video: T,
    audio: T,
}

impl<T> PerKind<T> {
    #[must_use]
    pub fn new(video: T, audio: T) -> Self {
        Self { video, audio }
    }

    /// Builds a table by calling `init` once per tracked kind.
    pub fn from_fn(mut init: impl FnMut(StreamKind) -> T) -> Self {
        Self {
            video: init(StreamKind::Video),
            audio: init(StreamKind::Audio),
        }
    }

    #[must_use]
    pub fn get(&self, kind: StreamKind) -> Option<&T> {
        match kind {
            StreamKind::Video => Some(&self.video),
            StreamKind::Audio => Some(&self.audio),
            StreamKind::Unknown => None,
        }
    }

    pub fn get_mut(&mut self, kind: StreamKind) -> Option<&mut T> {
        match kind {
            StreamKind::Video => Some(&mut self.video),
            StreamKind::Audio => Some(&mut self.audio),
            StreamKind::Unknown => None,
        }
    }

    #[must_use]
    pub fn video(&self) -> &T {
        &self.video
    }

    pub fn video_mut(&mut self) -> &mut T {
        &mut self.video
    }

    #[must_use]
    pub fn audio(&self) -> &T {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut T {
        &mut self.audio
    }

    /// Iterates over `(kind, value)` pairs in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (StreamKind, &T)> {
        [(StreamKind::Video, &self.video), (StreamKind::Audio, &self.audio)].into_iter()
    }

    /// Iterates mutably over `(kind, value)` pairs in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (StreamKind, &mut T)> {
        [
            (StreamKind::Video, &mut self.video),
            (StreamKind::Audio, &mut self.audio),
        ]
        .into_iter()
    }
}
