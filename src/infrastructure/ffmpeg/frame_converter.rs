// SPDX-License-Identifier: MPL-2.0
//! Conversion of decoded `FFmpeg` pictures into domain [`Frame`]s.
//!
//! Display surfaces always receive planar YUV 4:2:0. Pictures already in
//! that layout are copied plane by plane; anything else goes through a
//! cached swscale context first.

use crate::domain::error::VideoError;
use crate::domain::video::{Frame, Plane};
use ffmpeg_next::format::Pixel;
use ffmpeg_next::software::scaling;

/// Converts decoded pictures to YUV420P, reusing the scaler across frames.
#[derive(Default)]
pub struct FrameConverter {
    scaler: Option<CachedScaler>,
}

struct CachedScaler {
    source: (Pixel, u32, u32),
    context: scaling::Context,
}

impl FrameConverter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `decoded` into an owned frame, converting if needed.
    ///
    /// Timing fields are taken from the decoded picture; the caller stamps
    /// the time base.
    ///
    /// # Errors
    ///
    /// Returns an error if a scaler cannot be created or conversion fails.
    pub fn convert(&mut self, decoded: &ffmpeg_next::frame::Video) -> Result<Frame, VideoError> {
        let width = decoded.width();
        let height = decoded.height();
        if width == 0 || height == 0 {
            return Err(VideoError::DecodingFailed(
                "decoded picture has no size".to_string(),
            ));
        }

        let pts = decoded.timestamp().or_else(|| decoded.pts());
        let keyframe = decoded.is_key();

        let frame = if decoded.format() == Pixel::YUV420P {
            copy_planes(decoded)
        } else {
            let scaler = self.scaler_for(decoded.format(), width, height)?;
            let mut converted = ffmpeg_next::frame::Video::empty();
            scaler
                .run(decoded, &mut converted)
                .map_err(|e| VideoError::DecodingFailed(format!("Scaling failed: {e}")))?;
            copy_planes(&converted)
        };

        Ok(frame.with_pts(pts).with_keyframe(keyframe))
    }

    fn scaler_for(
        &mut self,
        format: Pixel,
        width: u32,
        height: u32,
    ) -> Result<&mut scaling::Context, VideoError> {
        let source = (format, width, height);
        let stale = self.scaler.as_ref().is_none_or(|cached| cached.source != source);
        if stale {
            let context = scaling::Context::get(
                format,
                width,
                height,
                Pixel::YUV420P,
                width,
                height,
                scaling::Flags::BILINEAR,
            )
            .map_err(|e| VideoError::Other(format!("Failed to create scaler: {e}")))?;
            self.scaler = Some(CachedScaler { source, context });
        }
        self.scaler
            .as_mut()
            .map(|cached| &mut cached.context)
            .ok_or_else(|| VideoError::Other("scaler unavailable".to_string()))
    }
}

/// Copies the three planes of a YUV420P picture, keeping their strides.
fn copy_planes(picture: &ffmpeg_next::frame::Video) -> Frame {
    let planes = [0, 1, 2].map(|index| Plane::new(picture.data(index).to_vec(), picture.stride(index)));
    Frame::new(picture.width(), picture.height(), planes)
}
