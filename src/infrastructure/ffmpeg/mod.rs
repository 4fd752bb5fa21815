// SPDX-License-Identifier: MPL-2.0
//! `FFmpeg` adapter implementing the [`MediaContainer`] port trait.
//!
//! This module provides [`FfmpegContainer`], a demuxer over
//! `ffmpeg_next::format::context::Input`, and [`FfmpegDecoder`], the
//! matching per-stream decode context.
//!
//! # Design Notes
//!
//! - Everything here is synchronous and single-threaded
//! - Seeks go through the container-wide microsecond clock, with the
//!   upper bound set to the target so the demuxer lands on a keyframe at
//!   or before it
//! - Decoded pictures are always handed out as YUV420P
//!
//! [`MediaContainer`]: crate::application::port::MediaContainer

mod decoder;
mod frame_converter;

pub use decoder::FfmpegDecoder;
pub use frame_converter::FrameConverter;

use crate::application::port::{MediaContainer, ReadOutcome, StreamInfo};
use crate::domain::error::VideoError;
use crate::domain::video::{Packet, StreamKind, TimeBase};
use std::path::Path;
use std::sync::Once;
use std::time::Duration;

static FFMPEG_INIT: Once = Once::new();

/// Initialize `FFmpeg` with appropriate log level.
///
/// This function is safe to call multiple times - initialization will only
/// happen once thanks to `std::sync::Once`. It sets the `FFmpeg` log level
/// to ERROR to suppress warning messages like "Detected creation time before 1970".
///
/// # Errors
///
/// Returns an error if the library fails to initialize.
pub fn init_ffmpeg() -> Result<(), VideoError> {
    let mut init_result = Ok(());

    FFMPEG_INIT.call_once(|| {
        if let Err(e) = ffmpeg_next::init() {
            init_result = Err(VideoError::Other(format!(
                "FFmpeg initialization failed: {e}"
            )));
            return;
        }

        // SAFETY: av_log_set_level is thread-safe and only affects logging
        unsafe {
            ffmpeg_next::ffi::av_log_set_level(ffmpeg_next::ffi::AV_LOG_ERROR);
        }
    });

    init_result
}

fn time_base(rational: ffmpeg_next::Rational) -> TimeBase {
    TimeBase::new(rational.numerator(), rational.denominator())
}

fn rate(rational: ffmpeg_next::Rational) -> f64 {
    if rational.numerator() > 0 && rational.denominator() > 0 {
        f64::from(rational.numerator()) / f64::from(rational.denominator())
    } else {
        0.0
    }
}

fn stream_kind(medium: ffmpeg_next::media::Type) -> StreamKind {
    match medium {
        ffmpeg_next::media::Type::Video => StreamKind::Video,
        ffmpeg_next::media::Type::Audio => StreamKind::Audio,
        _ => StreamKind::Unknown,
    }
}

fn describe_stream(stream: &ffmpeg_next::format::stream::Stream<'_>) -> StreamInfo {
    let parameters = stream.parameters();
    // SAFETY: the parameters belong to `stream`, which outlives this read.
    let (width, height) = unsafe {
        let raw = parameters.as_ptr();
        ((*raw).width, (*raw).height)
    };

    StreamInfo {
        index: stream.index(),
        kind: stream_kind(parameters.medium()),
        time_base: time_base(stream.time_base()),
        decodable: ffmpeg_next::decoder::find(parameters.id()).is_some(),
        avg_frame_rate: rate(stream.avg_frame_rate()),
        guessed_frame_rate: rate(stream.rate()),
        frame_count: u64::try_from(stream.frames()).unwrap_or(0),
        width: u32::try_from(width).unwrap_or(0),
        height: u32::try_from(height).unwrap_or(0),
    }
}

/// `FFmpeg`-backed container.
///
/// Dropping it closes the input.
pub struct FfmpegContainer {
    input: ffmpeg_next::format::context::Input,
}

impl FfmpegContainer {
    fn stream_time_base(&self, index: usize) -> Option<TimeBase> {
        self.input
            .stream(index)
            .map(|stream| time_base(stream.time_base()))
    }
}

impl MediaContainer for FfmpegContainer {
    type Payload = ffmpeg_next::Packet;
    type Decoder = FfmpegDecoder;

    fn open(path: &Path) -> Result<Self, VideoError> {
        init_ffmpeg()?;
        let input = ffmpeg_next::format::input(path)
            .map_err(|e| VideoError::from_message(&format!("Failed to open {}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), streams = input.nb_streams(), "container opened");
        Ok(Self { input })
    }

    fn streams(&self) -> Vec<StreamInfo> {
        self.input.streams().map(|stream| describe_stream(&stream)).collect()
    }

    fn duration(&self) -> Duration {
        // Container duration is expressed in AV_TIME_BASE (microsecond) ticks.
        TimeBase::MICROSECONDS.to_duration(self.input.duration())
    }

    fn read_packet(&mut self) -> ReadOutcome<Self::Payload> {
        let mut packet = ffmpeg_next::Packet::empty();
        match packet.read(&mut self.input) {
            Ok(()) => {
                let index = packet.stream();
                let pts = packet.pts();
                let dts = packet.dts();
                let duration = packet.duration();
                let keyframe = packet.is_key();
                let time_base = self.stream_time_base(index).unwrap_or_default();
                ReadOutcome::Packet(
                    Packet::new(packet, index)
                        .with_pts(pts)
                        .with_dts(dts)
                        .with_duration(duration)
                        .with_keyframe(keyframe)
                        .with_time_base(time_base),
                )
            }
            Err(ffmpeg_next::Error::Eof) => ReadOutcome::EndOfInput,
            Err(ffmpeg_next::Error::InvalidData) => ReadOutcome::Malformed,
            Err(e) => ReadOutcome::Failed(VideoError::from_message(&e.to_string())),
        }
    }

    fn seek(&mut self, stream_index: usize, tick: i64) -> Result<(), VideoError> {
        let stream_base = self
            .stream_time_base(stream_index)
            .ok_or_else(|| VideoError::SeekFailed(format!("no stream {stream_index}")))?;
        let timestamp = TimeBase::MICROSECONDS.to_ticks(stream_base.to_duration(tick));

        self.input
            .seek(timestamp, ..timestamp)
            .map_err(|e| VideoError::SeekFailed(e.to_string()))
    }

    fn open_decoder(&self, info: &StreamInfo) -> Result<Self::Decoder, VideoError> {
        let stream = self
            .input
            .stream(info.index)
            .ok_or(VideoError::NoDecodableStream)?;
        let context = ffmpeg_next::codec::context::Context::from_parameters(stream.parameters())
            .map_err(|e| VideoError::Other(format!("Failed to create codec context: {e}")))?;

        match info.kind {
            StreamKind::Video => context
                .decoder()
                .video()
                .map(FfmpegDecoder::video)
                .map_err(|e| VideoError::from_message(&format!("video decoder: {e}"))),
            StreamKind::Audio => context
                .decoder()
                .audio()
                .map(FfmpegDecoder::audio)
                .map_err(|e| VideoError::from_message(&format!("audio decoder: {e}"))),
            StreamKind::Unknown => Err(VideoError::UnsupportedFormat),
        }
    }
}
