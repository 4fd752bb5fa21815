// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core playback types with ZERO external dependencies.
//!
//! This module contains pure value objects and rules. It depends on `std`
//! only, so everything here is testable without FFmpeg.
//!
//! # Modules
//!
//! - [`error`]: Domain error types ([`VideoError`](error::VideoError))
//! - [`video`]: Packets, frames and playback values ([`Packet`](video::Packet),
//!   [`Frame`](video::Frame), [`TimeBase`](video::TimeBase),
//!   [`PlaybackSpeed`](video::PlaybackSpeed))

pub mod error;
pub mod video;
