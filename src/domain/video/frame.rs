// SPDX-License-Identifier: MPL-2.0
//! Decoded pictures in planar YUV 4:2:0.

use super::newtypes::TimeBase;
use std::time::Duration;

/// One image plane: raw bytes plus the distance between two rows.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plane {
    data: Vec<u8>,
    stride: usize,
}

impl Plane {
    #[must_use]
    pub fn new(data: Vec<u8>, stride: usize) -> Self {
        Self { data, stride }
    }

    /// Builds a plane of `rows` rows of `stride` bytes, all set to `value`.
    #[must_use]
    pub fn filled(stride: usize, rows: usize, value: u8) -> Self {
        Self {
            data: vec![value; stride * rows],
            stride,
        }
    }

    #[must_use]
    pub fn view(&self) -> PlaneRef<'_> {
        PlaneRef {
            data: &self.data,
            stride: self.stride,
        }
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }
}

/// Borrowed view of a plane, as handed to display surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneRef<'a> {
    pub data: &'a [u8],
    pub stride: usize,
}

impl PlaneRef<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns row `index`, or `None` past the end of the plane.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[u8]> {
        let start = index.checked_mul(self.stride)?;
        let end = start.checked_add(self.stride)?;
        self.data.get(start..end)
    }
}

/// A YUV triple in BT.601 studio range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Yuv {
    pub y: u8,
    pub u: u8,
    pub v: u8,
}

impl Yuv {
    /// Converts an RGB colour.
    #[must_use]
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        let (r, g, b) = (f32::from(r), f32::from(g), f32::from(b));
        Self {
            y: to_byte(0.257 * r + 0.504 * g + 0.098 * b + 16.0),
            u: to_byte(-0.148 * r - 0.291 * g + 0.439 * b + 128.0),
            v: to_byte(0.439 * r - 0.368 * g - 0.071 * b + 128.0),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_byte(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// One decoded picture.
///
/// Planes are luma then the two half-resolution chroma planes.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    pts: Option<i64>,
    duration: i64,
    time_base: TimeBase,
    keyframe: bool,
    planes: [Plane; 3],
}

impl Frame {
    /// Creates a frame from its planes. Timing defaults to zero.
    #[must_use]
    pub fn new(width: u32, height: u32, planes: [Plane; 3]) -> Self {
        Self {
            width,
            height,
            pts: None,
            duration: 0,
            time_base: TimeBase::default(),
            keyframe: false,
            planes,
        }
    }

    /// Builds a flat picture of one colour.
    #[must_use]
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let colour = Yuv::from_rgb(rgb[0], rgb[1], rgb[2]);
        let (w, h) = (width as usize, height as usize);
        let (cw, ch) = (w.div_ceil(2), h.div_ceil(2));
        Self::new(
            width,
            height,
            [
                Plane::filled(w, h, colour.y),
                Plane::filled(cw, ch, colour.u),
                Plane::filled(cw, ch, colour.v),
            ],
        )
    }

    #[must_use]
    pub fn with_pts(mut self, pts: Option<i64>) -> Self {
        self.pts = pts;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, ticks: i64) -> Self {
        self.duration = ticks;
        self
    }

    #[must_use]
    pub fn with_time_base(mut self, time_base: TimeBase) -> Self {
        self.time_base = time_base;
        self
    }

    #[must_use]
    pub fn with_keyframe(mut self, keyframe: bool) -> Self {
        self.keyframe = keyframe;
        self
    }

    /// Applies the timing of the packet the frame was decoded from.
    ///
    /// The time base is always taken from the packet; the duration only
    /// when the decoder left it unset.
    pub fn stamp(&mut self, time_base: TimeBase, packet_duration: i64) {
        self.time_base = time_base;
        if self.duration <= 0 {
            self.duration = packet_duration;
        }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn pts(&self) -> Option<i64> {
        self.pts
    }

    #[must_use]
    pub fn time_base(&self) -> TimeBase {
        self.time_base
    }

    #[must_use]
    pub fn is_keyframe(&self) -> bool {
        self.keyframe
    }

    /// Presentation time since container start.
    #[must_use]
    pub fn timestamp(&self) -> Duration {
        self.time_base.to_duration(self.pts.unwrap_or(0))
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.time_base.to_duration(self.duration)
    }

    #[must_use]
    pub fn planes(&self) -> [PlaneRef<'_>; 3] {
        [
            self.planes[0].view(),
            self.planes[1].view(),
            self.planes[2].view(),
        ]
    }

    #[must_use]
    pub fn luma(&self) -> PlaneRef<'_> {
        self.planes[0].view()
    }
}
