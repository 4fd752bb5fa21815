// SPDX-License-Identifier: MPL-2.0
//! Playback engine for groups of synchronized video streams.
//!
//! Everything here runs on the host's render thread: the host calls
//! [`GroupSynchronizer::update`] once per rendered frame, which advances the
//! group clock and lets every member stream demux and decode just enough to
//! catch up. No call blocks beyond a bounded number of packet reads.
//!
//! - [`DecoderSession`]: one container, one decoder per stream kind, packet queues
//! - [`PlayableStream`]: catch-up playback and seeking on top of a session
//! - [`GroupSynchronizer`]: the shared timeline for several members

mod clock;
mod decoder;
mod group;
mod packet_budget;
mod stream;
mod surface;

pub use clock::{Clock, ManualClock, SystemClock};
pub use decoder::DecoderSession;
pub use group::{GroupMember, GroupSynchronizer};
pub use packet_budget::PacketBudget;
pub use stream::{PlayableStream, SeekProgress};
pub use surface::FrameBuffer;

use crate::infrastructure::ffmpeg::FfmpegContainer;

/// A playable stream decoding through `FFmpeg`.
pub type FfmpegStream<S> = PlayableStream<FfmpegContainer, S>;
