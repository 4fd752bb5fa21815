// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! This module defines abstract interfaces that infrastructure adapters and
//! hosts implement. These traits use only domain types, so the playback
//! pipeline stays independent of any concrete codec library or renderer.
//!
//! # Available Ports
//!
//! - [`container`]: Demuxing and per-stream decoding
//! - [`display`]: Sink for decoded pictures
//! - [`playable`]: What a playback group drives
//!
//! # Design Notes
//!
//! - No `FFmpeg` types appear here
//! - Everything is single-threaded; no trait requires `Send`
//! - Only opening returns `Result`; per-tick calls degrade silently
//!
//! # Example
//!
//! ```ignore
//! use group_player::application::port::{MediaContainer, ReadOutcome};
//!
//! fn count_packets<C: MediaContainer>(container: &mut C) -> usize {
//!     let mut count = 0;
//!     loop {
//!         match container.read_packet() {
//!             ReadOutcome::Packet(_) => count += 1,
//!             ReadOutcome::Malformed => continue,
//!             ReadOutcome::EndOfInput | ReadOutcome::Failed(_) => return count,
//!         }
//!     }
//! }
//! ```

pub mod container;
pub mod display;
pub mod playable;

// Re-export main types for convenience
pub use container::{FrameDecoder, MediaContainer, ReadOutcome, StreamInfo};
pub use display::DisplaySurface;
pub use playable::Playable;
