// SPDX-License-Identifier: MPL-2.0
//! Test utilities for float comparisons and scripted media backends.
//!
//! This module re-exports the `approx` crate's assertion macros for float comparison,
//! and provides [`FakeContainer`] / [`FakePlayable`] so playback logic can be
//! exercised without `FFmpeg`.

// Re-export approx macros for convenient use in tests
pub use approx::assert_abs_diff_eq;

use crate::application::port::{FrameDecoder, MediaContainer, Playable, ReadOutcome, StreamInfo};
use crate::domain::error::VideoError;
use crate::domain::video::{Frame, Packet, Plane, StreamKind, TimeBase};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

pub const VIDEO_INDEX: usize = 0;
pub const AUDIO_INDEX: usize = 1;
pub const DATA_INDEX: usize = 2;

/// Shorthand for milliseconds.
pub fn ms(value: u64) -> Duration {
    Duration::from_millis(value)
}

// =============================================================================
// FakeContainer
// =============================================================================

/// Payload of a scripted packet: the frame number it decodes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FakePayload {
    pub frame: usize,
    pub corrupt: bool,
}

#[derive(Debug, Clone)]
enum Entry {
    Packet(Packet<FakePayload>),
    Malformed,
    Failure,
}

/// Counters shared between a container and the test that built it.
#[derive(Debug, Default)]
pub struct Probe {
    pub reads: Cell<usize>,
    pub seeks: RefCell<Vec<(usize, i64)>>,
}

/// In-memory container with a fixed packet script.
///
/// Video packets use a millisecond time base; packet `i` has pts
/// `i * frame_ms` and is a keyframe every `gop` packets.
#[derive(Debug, Clone)]
pub struct FakeContainer {
    streams: Vec<StreamInfo>,
    script: Vec<Entry>,
    position: usize,
    duration: Duration,
    fail_seeks: bool,
    failing_decoders: Vec<usize>,
    probe: Rc<Probe>,
}

impl FakeContainer {
    pub fn video(frames: usize, frame_ms: i64, gop: usize) -> Self {
        let mut info = StreamInfo::new(VIDEO_INDEX, StreamKind::Video, TimeBase::MILLISECONDS);
        info.avg_frame_rate = 1000.0 / frame_ms as f64;
        info.frame_count = frames as u64;
        info.width = 4;
        info.height = 4;

        let script = (0..frames)
            .map(|i| {
                Entry::Packet(
                    Packet::new(FakePayload { frame: i, corrupt: false }, VIDEO_INDEX)
                        .with_pts(Some(i as i64 * frame_ms))
                        .with_duration(frame_ms)
                        .with_keyframe(i % gop == 0),
                )
            })
            .collect();

        Self {
            streams: vec![info],
            script,
            position: 0,
            duration: Duration::from_millis(frames as u64 * frame_ms as u64),
            fail_seeks: false,
            failing_decoders: Vec::new(),
            probe: Rc::new(Probe::default()),
        }
    }

    /// Adds an audio stream with one packet after every video packet.
    pub fn with_audio(mut self) -> Self {
        self.streams
            .push(StreamInfo::new(AUDIO_INDEX, StreamKind::Audio, TimeBase::new(1, 48_000)));
        self.interleave(AUDIO_INDEX);
        self
    }

    /// Adds a data stream the session must ignore.
    pub fn with_data_stream(mut self) -> Self {
        self.streams
            .push(StreamInfo::new(DATA_INDEX, StreamKind::Unknown, TimeBase::MILLISECONDS));
        self.interleave(DATA_INDEX);
        self
    }

    /// Adds another video stream the session must not keep.
    pub fn with_extra_stream(mut self, info: StreamInfo) -> Self {
        self.streams.push(info);
        self
    }

    fn interleave(&mut self, stream_index: usize) {
        let script = std::mem::take(&mut self.script);
        for entry in script {
            let extra = match &entry {
                Entry::Packet(p) if p.stream_index() == VIDEO_INDEX => Some(
                    Packet::new(FakePayload { frame: usize::MAX, corrupt: false }, stream_index)
                        .with_pts(p.pts())
                        .with_keyframe(true),
                ),
                _ => None,
            };
            self.script.push(entry);
            if let Some(packet) = extra {
                self.script.push(Entry::Packet(packet));
            }
        }
    }

    pub fn with_malformed_at(mut self, position: usize) -> Self {
        self.script.insert(position, Entry::Malformed);
        self
    }

    pub fn with_failure_at(mut self, position: usize) -> Self {
        self.script.insert(position, Entry::Failure);
        self
    }

    pub fn with_corrupt_frame(mut self, frame: usize) -> Self {
        for entry in &mut self.script {
            if let Entry::Packet(p) = entry {
                if p.stream_index() == VIDEO_INDEX && p.data().frame == frame {
                    let corrupted = p.clone();
                    *p = Packet::new(FakePayload { frame, corrupt: true }, VIDEO_INDEX)
                        .with_pts(corrupted.pts())
                        .with_duration(corrupted.duration_ticks())
                        .with_keyframe(corrupted.is_keyframe());
                }
            }
        }
        self
    }

    pub fn undecodable_video(mut self) -> Self {
        for info in &mut self.streams {
            if info.kind == StreamKind::Video {
                info.decodable = false;
            }
        }
        self
    }

    pub fn failing_seeks(mut self) -> Self {
        self.fail_seeks = true;
        self
    }

    pub fn failing_decoder(mut self, stream_index: usize) -> Self {
        self.failing_decoders.push(stream_index);
        self
    }

    pub fn probe(&self) -> Rc<Probe> {
        Rc::clone(&self.probe)
    }
}

impl MediaContainer for FakeContainer {
    type Payload = FakePayload;
    type Decoder = FakeDecoder;

    fn open(path: &Path) -> Result<Self, VideoError> {
        Err(VideoError::IoError(format!("no such file: {}", path.display())))
    }

    fn streams(&self) -> Vec<StreamInfo> {
        self.streams.clone()
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn read_packet(&mut self) -> ReadOutcome<Self::Payload> {
        self.probe.reads.set(self.probe.reads.get() + 1);
        let Some(entry) = self.script.get(self.position).cloned() else {
            return ReadOutcome::EndOfInput;
        };
        self.position += 1;
        match entry {
            Entry::Packet(packet) => ReadOutcome::Packet(packet),
            Entry::Malformed => ReadOutcome::Malformed,
            Entry::Failure => ReadOutcome::Failed(VideoError::IoError("read error".to_string())),
        }
    }

    fn seek(&mut self, stream_index: usize, tick: i64) -> Result<(), VideoError> {
        self.probe.seeks.borrow_mut().push((stream_index, tick));
        if self.fail_seeks {
            return Err(VideoError::SeekFailed("scripted failure".to_string()));
        }
        self.position = self
            .script
            .iter()
            .rposition(|entry| match entry {
                Entry::Packet(p) => {
                    p.stream_index() == stream_index
                        && p.is_keyframe()
                        && p.timestamp_ticks() <= tick
                }
                _ => false,
            })
            .unwrap_or(0);
        Ok(())
    }

    fn open_decoder(&self, stream: &StreamInfo) -> Result<Self::Decoder, VideoError> {
        if self.failing_decoders.contains(&stream.index) {
            return Err(VideoError::UnsupportedCodec("FAKE".to_string()));
        }
        Ok(FakeDecoder::default())
    }
}

/// Decoder that turns each packet into a flat 4x4 picture.
///
/// The luma value is the frame number modulo 256.
#[derive(Debug, Default)]
pub struct FakeDecoder {
    pending: Option<(FakePayload, Option<i64>, bool)>,
    pub flushes: usize,
}

impl FrameDecoder for FakeDecoder {
    type Payload = FakePayload;

    fn send_packet(&mut self, packet: &Packet<Self::Payload>) -> Result<(), VideoError> {
        self.pending = Some((packet.data().clone(), packet.pts(), packet.is_keyframe()));
        Ok(())
    }

    fn receive_frame(&mut self) -> Result<Frame, VideoError> {
        let (payload, pts, keyframe) = self
            .pending
            .take()
            .ok_or_else(|| VideoError::DecodingFailed("no frame".to_string()))?;
        if payload.corrupt {
            return Err(VideoError::DecodingFailed("corrupt packet".to_string()));
        }
        let luma = (payload.frame % 256) as u8;
        let planes = [
            Plane::filled(4, 4, luma),
            Plane::filled(2, 2, 128),
            Plane::filled(2, 2, 128),
        ];
        Ok(Frame::new(4, 4, planes).with_pts(pts).with_keyframe(keyframe))
    }

    fn flush(&mut self) {
        self.pending = None;
        self.flushes += 1;
    }
}

// =============================================================================
// FakePlayable
// =============================================================================

/// Group member that records every call.
#[derive(Debug, Clone, Default)]
pub struct FakePlayable {
    pub duration: Duration,
    pub fps: f64,
    pub playing: bool,
    pub position: Duration,
    pub seeks: Vec<Duration>,
    pub updates: Vec<Duration>,
}

impl FakePlayable {
    pub fn shared(duration: Duration) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            duration,
            fps: 25.0,
            ..Self::default()
        }))
    }
}

impl Playable for FakePlayable {
    fn update(&mut self, target: Duration) {
        if self.playing {
            self.updates.push(target);
            self.position = target.min(self.duration);
        }
    }

    fn seek(&mut self, target: Duration) {
        self.seeks.push(target);
        self.position = target;
    }

    fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn duration(&self) -> Duration {
        self.duration
    }

    fn current_timestamp(&self) -> Duration {
        self.position
    }

    fn fps(&self) -> f64 {
        self.fps
    }
}
