// SPDX-License-Identifier: MPL-2.0
//! Display surface port.
//!
//! A display surface is the sink a playable stream pushes decoded pictures
//! into. The rendering backend owns presentation; the pipeline only hands
//! over one luma and two half-resolution chroma planes per frame.

use crate::domain::video::PlaneRef;

/// Port for receiving decoded YUV 4:2:0 pictures.
pub trait DisplaySurface {
    /// Replaces the surface content with the given planes.
    fn update_planes(&mut self, y: PlaneRef<'_>, u: PlaneRef<'_>, v: PlaneRef<'_>);
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for &mut S {
    fn update_planes(&mut self, y: PlaneRef<'_>, u: PlaneRef<'_>, v: PlaneRef<'_>) {
        (**self).update_planes(y, u, v);
    }
}

impl<S: DisplaySurface + ?Sized> DisplaySurface for Box<S> {
    fn update_planes(&mut self, y: PlaneRef<'_>, u: PlaneRef<'_>, v: PlaneRef<'_>) {
        (**self).update_planes(y, u, v);
    }
}
