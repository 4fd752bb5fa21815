// SPDX-License-Identifier: MPL-2.0
//! In-memory display surface.

use crate::application::port::DisplaySurface;
use crate::domain::video::{Plane, PlaneRef};

/// Owned copy of the last picture pushed to it.
///
/// Hosts that upload textures themselves read the planes back between
/// ticks. `presented()` counts updates, which is how callers tell a new
/// frame from a repeated one.
#[derive(Debug, Clone, Default)]
pub struct FrameBuffer {
    planes: [Plane; 3],
    presented: u64,
}

impl FrameBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of pictures received so far.
    #[must_use]
    pub fn presented(&self) -> u64 {
        self.presented
    }

    #[must_use]
    pub fn planes(&self) -> [PlaneRef<'_>; 3] {
        [
            self.planes[0].view(),
            self.planes[1].view(),
            self.planes[2].view(),
        ]
    }

    /// First luma byte, handy to identify flat test pictures.
    #[must_use]
    pub fn luma_sample(&self) -> Option<u8> {
        self.planes[0].data().first().copied()
    }
}

impl DisplaySurface for FrameBuffer {
    fn update_planes(&mut self, y: PlaneRef<'_>, u: PlaneRef<'_>, v: PlaneRef<'_>) {
        for (plane, source) in self.planes.iter_mut().zip([y, u, v]) {
            *plane = Plane::new(source.data.to_vec(), source.stride);
        }
        self.presented += 1;
    }
}
