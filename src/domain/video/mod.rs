// SPDX-License-Identifier: MPL-2.0
//! Video playback domain types.
//!
//! This module contains the value objects shared by the decode pipeline and
//! the group synchronizer. None of them depend on a codec library.

pub mod frame;
pub mod metadata;
pub mod newtypes;
pub mod packet;
pub mod playback;
pub mod stream_kind;

// Re-export commonly used types
pub use frame::{Frame, Plane, PlaneRef, Yuv};
pub use metadata::StreamMetadata;
pub use newtypes::{MemberId, PlaybackSpeed, TimeBase};
pub use packet::{Packet, PacketQueue};
pub use playback::PlaybackState;
pub use stream_kind::{PerKind, StreamKind};
