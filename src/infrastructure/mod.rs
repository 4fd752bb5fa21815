// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! - [`ffmpeg`]: demuxing and decoding via `FFmpeg` (implements [`MediaContainer`])
//!
//! [`MediaContainer`]: crate::application::port::MediaContainer

pub mod ffmpeg;
