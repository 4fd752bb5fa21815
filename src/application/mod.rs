// SPDX-License-Identifier: MPL-2.0
//! Application layer - Ports between the playback core and its collaborators.
//!
//! - [`port`]: Trait definitions (interfaces) for dependency inversion
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - `video_player` orchestrates through these ports only

pub mod port;
