// SPDX-License-Identifier: MPL-2.0
//! Container and codec port definitions.
//!
//! This module defines the [`MediaContainer`] and [`FrameDecoder`] traits:
//! the boundary between the decode pipeline and a codec library.
//! Infrastructure adapters (like `FFmpeg`) implement them.
//!
//! # Design Notes
//!
//! - Timestamps cross this boundary as ticks; every packet carries the
//!   [`TimeBase`] of its stream so callers never divide by hand
//! - Reading is pull-based and single-threaded: one call, at most one packet
//! - Seeking is backward-biased: the container lands on the nearest
//!   keyframe at or before the requested tick

use crate::domain::error::VideoError;
use crate::domain::video::{Frame, Packet, StreamKind, TimeBase};
use std::path::Path;
use std::time::Duration;

// =============================================================================
// Stream description
// =============================================================================

/// What a container reports about one of its streams.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamInfo {
    pub index: usize,
    pub kind: StreamKind,
    pub time_base: TimeBase,
    /// True when the codec library has a decoder for this stream's codec.
    pub decodable: bool,
    /// Average frame rate declared by the container, zero when unknown.
    pub avg_frame_rate: f64,
    /// Frame rate guessed from timestamps, zero when unknown.
    pub guessed_frame_rate: f64,
    /// Frame count declared by the container, zero when unknown.
    pub frame_count: u64,
    pub width: u32,
    pub height: u32,
}

impl StreamInfo {
    /// Describes a decodable stream with no rate or size information.
    #[must_use]
    pub fn new(index: usize, kind: StreamKind, time_base: TimeBase) -> Self {
        Self {
            index,
            kind,
            time_base,
            decodable: true,
            avg_frame_rate: 0.0,
            guessed_frame_rate: 0.0,
            frame_count: 0,
            width: 0,
            height: 0,
        }
    }
}

/// Result of pulling one unit from a container.
#[derive(Debug)]
pub enum ReadOutcome<D> {
    /// A packet, stamped with its stream index and time base.
    Packet(Packet<D>),
    /// The next unit was malformed and has been skipped.
    Malformed,
    /// No more data.
    EndOfInput,
    /// The container could not be read.
    Failed(VideoError),
}

// =============================================================================
// Port traits
// =============================================================================

/// Port for an opened multimedia container.
///
/// # Lifecycle
///
/// 1. [`MediaContainer::open`] a path
/// 2. Inspect [`MediaContainer::streams`] and open a decoder per kept stream
/// 3. Pull packets with [`MediaContainer::read_packet`]
/// 4. Reposition with [`MediaContainer::seek`]
///
/// Dropping the container releases the underlying handle.
pub trait MediaContainer: Sized {
    /// Backend-specific compressed payload.
    type Payload;
    /// Decoder type created for this container's streams.
    type Decoder: FrameDecoder<Payload = Self::Payload>;

    /// Opens a container.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a container.
    fn open(path: &Path) -> Result<Self, VideoError>;

    /// Lists every stream of the container.
    fn streams(&self) -> Vec<StreamInfo>;

    /// Total duration, zero when unknown.
    fn duration(&self) -> Duration;

    /// Pulls the next packet of any stream.
    fn read_packet(&mut self) -> ReadOutcome<Self::Payload>;

    /// Seeks to the nearest keyframe at or before `tick` on `stream_index`.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be repositioned; the read
    /// position is then unchanged.
    fn seek(&mut self, stream_index: usize, tick: i64) -> Result<(), VideoError>;

    /// Allocates a decoder for `stream`.
    ///
    /// # Errors
    ///
    /// Returns an error if no decoder exists or its parameters are rejected.
    fn open_decoder(&self, stream: &StreamInfo) -> Result<Self::Decoder, VideoError>;
}

/// Port for a per-stream decode context.
pub trait FrameDecoder {
    type Payload;

    /// Submits one compressed packet.
    ///
    /// # Errors
    ///
    /// Returns an error if the decoder rejects the packet.
    fn send_packet(&mut self, packet: &Packet<Self::Payload>) -> Result<(), VideoError>;

    /// Retrieves the next decoded picture.
    ///
    /// # Errors
    ///
    /// Returns an error if no picture is ready or decoding failed.
    fn receive_frame(&mut self) -> Result<Frame, VideoError>;

    /// Drops buffered state after a seek.
    fn flush(&mut self);
}
