// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg` decode contexts implementing the [`FrameDecoder`] port.

use super::frame_converter::FrameConverter;
use crate::application::port::FrameDecoder;
use crate::domain::error::VideoError;
use crate::domain::video::{Frame, Packet};

/// One opened codec context, video or audio.
///
/// Audio contexts accept packets so the audio path stays structurally
/// complete, but never produce pictures.
pub enum FfmpegDecoder {
    Video {
        decoder: ffmpeg_next::decoder::Video,
        converter: FrameConverter,
    },
    Audio {
        decoder: ffmpeg_next::decoder::Audio,
    },
}

impl FfmpegDecoder {
    pub(super) fn video(decoder: ffmpeg_next::decoder::Video) -> Self {
        Self::Video {
            decoder,
            converter: FrameConverter::new(),
        }
    }

    pub(super) fn audio(decoder: ffmpeg_next::decoder::Audio) -> Self {
        Self::Audio { decoder }
    }
}

impl FrameDecoder for FfmpegDecoder {
    type Payload = ffmpeg_next::Packet;

    fn send_packet(&mut self, packet: &Packet<Self::Payload>) -> Result<(), VideoError> {
        let result = match self {
            Self::Video { decoder, .. } => decoder.send_packet(packet.data()),
            Self::Audio { decoder } => decoder.send_packet(packet.data()),
        };
        result.map_err(|e| VideoError::DecodingFailed(format!("Packet send failed: {e}")))
    }

    fn receive_frame(&mut self) -> Result<Frame, VideoError> {
        match self {
            Self::Video { decoder, converter } => {
                let mut decoded = ffmpeg_next::frame::Video::empty();
                decoder
                    .receive_frame(&mut decoded)
                    .map_err(|e| VideoError::DecodingFailed(format!("No frame: {e}")))?;
                converter.convert(&decoded)
            }
            Self::Audio { decoder } => {
                let mut samples = ffmpeg_next::frame::Audio::empty();
                // Drain so the context does not back up; samples are not rendered.
                let _ = decoder.receive_frame(&mut samples);
                Err(VideoError::Other(
                    "audio samples are not rendered".to_string(),
                ))
            }
        }
    }

    fn flush(&mut self) {
        match self {
            Self::Video { decoder, .. } => decoder.flush(),
            Self::Audio { decoder } => decoder.flush(),
        }
    }
}
