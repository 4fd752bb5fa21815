// SPDX-License-Identifier: MPL-2.0
//! `group_player` decodes video files and plays several of them in sync.
//!
//! The crate is split the way a host application consumes it:
//!
//! - [`domain`]: packets, frames, time bases and playback value types
//! - [`application::port`]: the traits a backend or member must implement
//! - [`infrastructure::ffmpeg`]: the `FFmpeg` container and decoder adapter
//! - [`video_player`]: decoder sessions, playable streams and the group clock
//! - [`config`]: persisted playback defaults
//!
//! Rendering, audio output and project persistence are left to the host.

#![doc(html_root_url = "https://docs.rs/group_player/0.1.0")]

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod video_player;

#[cfg(test)]
mod test_utils;
