// SPDX-License-Identifier: MPL-2.0
//! Demux and decode session over one container.
//!
//! A [`DecoderSession`] keeps at most one stream per [`StreamKind`], one
//! decode context and one packet queue per kept stream. It never decodes
//! ahead on its own: callers pull packets, inspect queues and decode one
//! packet at a time, which is what the seek and catch-up loops in
//! [`PlayableStream`](super::PlayableStream) are built from.

use crate::application::port::{FrameDecoder, MediaContainer, ReadOutcome, StreamInfo};
use crate::config::{PlaybackConfig, DEFAULT_FALLBACK_FPS, FPS_EPSILON};
use crate::domain::error::VideoError;
use crate::domain::video::{Frame, Packet, PacketQueue, PerKind, StreamKind, StreamMetadata};
use std::path::Path;
use std::time::Duration;

/// A kept stream and its decode context.
struct Track<D> {
    info: StreamInfo,
    decoder: D,
}

/// Container handle plus per-kind decode state.
///
/// `is_open()` is true exactly while a container is held. Closing drops the
/// container, every decode context and every queued packet.
pub struct DecoderSession<C: MediaContainer> {
    container: Option<C>,
    tracks: PerKind<Option<Track<C::Decoder>>>,
    queues: PerKind<PacketQueue<C::Payload>>,
    last_read_kind: StreamKind,
    end_of_stream: bool,
    metadata: StreamMetadata,
    fallback_fps: f64,
}

impl<C: MediaContainer> Default for DecoderSession<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: MediaContainer> DecoderSession<C> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_fallback_fps(DEFAULT_FALLBACK_FPS)
    }

    /// Creates a closed session using the configured frame-rate fallback.
    #[must_use]
    pub fn with_config(config: &PlaybackConfig) -> Self {
        Self::with_fallback_fps(config.fallback_fps())
    }

    fn with_fallback_fps(fallback_fps: f64) -> Self {
        Self {
            container: None,
            tracks: PerKind::default(),
            queues: PerKind::default(),
            last_read_kind: StreamKind::Unknown,
            end_of_stream: false,
            metadata: StreamMetadata::default(),
            fallback_fps,
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Opens `path`, replacing any previous container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be opened, holds no
    /// decodable stream, or a decode context cannot be created. The session
    /// is closed whenever an error is returned.
    pub fn open(&mut self, path: &Path) -> Result<(), VideoError> {
        self.close();
        let container = C::open(path).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "failed to open container");
        })?;
        self.attach(container)
    }

    /// Adopts an already opened container, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Same as [`DecoderSession::open`], minus the I/O part.
    pub fn open_container(&mut self, container: C) -> Result<(), VideoError> {
        self.close();
        self.attach(container)
    }

    fn attach(&mut self, container: C) -> Result<(), VideoError> {
        let mut tracks: PerKind<Option<Track<C::Decoder>>> = PerKind::default();

        for info in container.streams() {
            if !info.decodable {
                tracing::debug!(index = info.index, kind = %info.kind, "skipping stream without decoder");
                continue;
            }
            let Some(slot) = tracks.get_mut(info.kind) else {
                continue;
            };
            if slot.is_some() {
                continue;
            }
            let decoder = container.open_decoder(&info).inspect_err(|e| {
                tracing::warn!(index = info.index, error = %e, "failed to open decoder");
            })?;
            tracing::debug!(index = info.index, kind = %info.kind, time_base = %info.time_base, "stream kept");
            *slot = Some(Track { info, decoder });
        }

        if tracks.iter().all(|(_, track)| track.is_none()) {
            tracing::warn!("container has no decodable stream");
            return Err(VideoError::NoDecodableStream);
        }

        self.metadata = probe_metadata(
            tracks.video().as_ref().map(|track| &track.info),
            container.duration(),
            self.fallback_fps,
        );
        self.tracks = tracks;
        self.container = Some(container);
        Ok(())
    }

    /// Releases the container and all decode state. Safe to call twice.
    pub fn close(&mut self) {
        self.container = None;
        self.tracks = PerKind::default();
        self.queues = PerKind::default();
        self.last_read_kind = StreamKind::Unknown;
        self.end_of_stream = false;
        self.metadata = StreamMetadata::default();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.container.is_some()
    }

    #[must_use]
    pub fn end_of_stream(&self) -> bool {
        self.end_of_stream
    }

    #[must_use]
    pub fn has_stream(&self, kind: StreamKind) -> bool {
        self.tracks.get(kind).is_some_and(Option::is_some)
    }

    /// Description of the kept stream of `kind`.
    #[must_use]
    pub fn stream_info(&self, kind: StreamKind) -> Option<&StreamInfo> {
        self.tracks.get(kind)?.as_ref().map(|track| &track.info)
    }

    // =========================================================================
    // Reading and decoding
    // =========================================================================

    /// Pulls one packet of a kept stream into its kind's queue.
    ///
    /// Packets of other streams and malformed data are skipped. Returns the
    /// kind of the queued packet, or `None` once the end of input is reached
    /// (a failed read counts as the end of input).
    pub fn read_packet(&mut self) -> Option<StreamKind> {
        let container = self.container.as_mut()?;
        loop {
            match container.read_packet() {
                ReadOutcome::Packet(packet) => {
                    let Some(track) = kept_track(&self.tracks, packet.stream_index()) else {
                        continue;
                    };
                    let kind = track.info.kind;
                    let mut packet = packet.with_time_base(track.info.time_base);
                    packet.set_kind(kind);
                    let Some(queue) = self.queues.get_mut(kind) else {
                        continue;
                    };
                    if let Err(rejected) = queue.push_back(packet) {
                        tracing::warn!(index = rejected.stream_index(), "packet rejected by queue");
                        continue;
                    }
                    self.last_read_kind = kind;
                    return Some(kind);
                }
                ReadOutcome::Malformed => {
                    tracing::trace!("skipping malformed packet");
                }
                ReadOutcome::EndOfInput => {
                    self.end_of_stream = true;
                    return None;
                }
                ReadOutcome::Failed(e) => {
                    tracing::warn!(error = %e, "container read failed, treating as end of stream");
                    self.end_of_stream = true;
                    return None;
                }
            }
        }
    }

    /// Decodes the front packet of `kind`'s queue.
    ///
    /// Returns `None` when the kind has no stream, its queue is empty, or
    /// the packet fails to decode. The packet is consumed in every case
    /// except the first two.
    pub fn decode_next_packet(&mut self, kind: StreamKind) -> Option<Frame> {
        let track = self.tracks.get_mut(kind)?.as_mut()?;
        let packet = self.queues.get_mut(kind)?.pop_front()?;

        if let Err(e) = track.decoder.send_packet(&packet) {
            tracing::debug!(kind = %kind, error = %e, "decoder rejected packet");
            return None;
        }
        match track.decoder.receive_frame() {
            Ok(mut frame) => {
                frame.stamp(packet.time_base(), packet.duration_ticks());
                Some(frame)
            }
            Err(e) => {
                tracing::debug!(kind = %kind, error = %e, "no frame from packet");
                None
            }
        }
    }

    // =========================================================================
    // Seeking
    // =========================================================================

    /// Repositions on the nearest video keyframe at or before `timestamp`.
    ///
    /// On success the end-of-stream flag is cleared, every queue is emptied
    /// and decoders are flushed. On failure nothing changes.
    pub fn seek_to_keyframe(&mut self, timestamp: Duration) {
        let (Some(container), Some(track)) = (self.container.as_mut(), self.tracks.video().as_ref())
        else {
            return;
        };
        let tick = track.info.time_base.to_ticks(timestamp);

        if let Err(e) = container.seek(track.info.index, tick) {
            tracing::warn!(?timestamp, error = %e, "keyframe seek failed, keeping position");
            return;
        }

        self.end_of_stream = false;
        self.discard_all_packets();
        for (_, track) in self.tracks.iter_mut() {
            if let Some(track) = track {
                track.decoder.flush();
            }
        }
    }

    /// Repositions on the keyframe at or before frame `frame_number`.
    pub fn seek_to_frame(&mut self, frame_number: u64) {
        let timestamp = self.metadata.frame_number_to_timestamp(frame_number);
        self.seek_to_keyframe(timestamp);
    }

    // =========================================================================
    // Queue inspection and maintenance
    // =========================================================================

    #[must_use]
    pub fn peek_next_packet(&self, kind: StreamKind) -> Option<&Packet<C::Payload>> {
        self.queues.get(kind)?.front()
    }

    #[must_use]
    pub fn peek_last_packet(&self, kind: StreamKind) -> Option<&Packet<C::Payload>> {
        self.queues.get(kind)?.back()
    }

    /// Most recently read packet, if it is still queued.
    #[must_use]
    pub fn peek_last_read_packet(&self) -> Option<&Packet<C::Payload>> {
        self.peek_last_packet(self.last_read_kind)
    }

    #[must_use]
    pub fn last_read_packet_kind(&self) -> StreamKind {
        self.last_read_kind
    }

    #[must_use]
    pub fn queue_size(&self, kind: StreamKind) -> usize {
        self.queues.get(kind).map_or(0, PacketQueue::len)
    }

    /// Drops the front packet of `kind`'s queue.
    pub fn discard_next_packet(&mut self, kind: StreamKind) {
        if let Some(queue) = self.queues.get_mut(kind) {
            queue.pop_front();
        }
    }

    /// Drops the most recently read packet.
    pub fn discard_last_read_packet(&mut self) {
        if let Some(queue) = self.queues.get_mut(self.last_read_kind) {
            queue.pop_back();
        }
    }

    /// Drops every packet of `kind` except the most recent one.
    pub fn retain_last_packet(&mut self, kind: StreamKind) {
        if let Some(queue) = self.queues.get_mut(kind) {
            queue.retain_last();
        }
    }

    pub fn discard_packets_of(&mut self, kind: StreamKind) {
        if let Some(queue) = self.queues.get_mut(kind) {
            queue.clear();
        }
    }

    pub fn discard_all_packets(&mut self) {
        for (_, queue) in self.queues.iter_mut() {
            queue.clear();
        }
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    #[must_use]
    pub fn metadata(&self) -> &StreamMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.metadata.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.metadata.height
    }

    #[must_use]
    pub fn fps(&self) -> f64 {
        self.metadata.fps
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.metadata.frame_count
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.metadata.duration
    }

    #[must_use]
    pub fn frame_number_to_timestamp(&self, frame_number: u64) -> Duration {
        self.metadata.frame_number_to_timestamp(frame_number)
    }

    #[must_use]
    pub fn timestamp_to_frame_number(&self, timestamp: Duration) -> u64 {
        self.metadata.timestamp_to_frame_number(timestamp)
    }
}

fn kept_track<D>(tracks: &PerKind<Option<Track<D>>>, stream_index: usize) -> Option<&Track<D>> {
    tracks
        .iter()
        .find_map(|(_, track)| track.as_ref().filter(|t| t.info.index == stream_index))
}

/// Resolves frame rate and frame count with fallbacks.
///
/// Rate: declared average, then guessed, then one frame per time-base
/// tick, then `fallback_fps`. Count: declared, else `round(duration * fps)`.
fn probe_metadata(video: Option<&StreamInfo>, duration: Duration, fallback_fps: f64) -> StreamMetadata {
    let Some(info) = video else {
        return StreamMetadata {
            fps: fallback_fps,
            duration,
            ..StreamMetadata::default()
        };
    };

    let tick_rate = if info.time_base.is_valid() {
        1.0 / info.time_base.as_f64()
    } else {
        0.0
    };
    let fps = [info.avg_frame_rate, info.guessed_frame_rate, tick_rate]
        .into_iter()
        .find(|rate| *rate > FPS_EPSILON)
        .unwrap_or(fallback_fps);

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let frame_count = if info.frame_count > 0 {
        info.frame_count
    } else {
        (duration.as_secs_f64() * fps).round() as u64
    };

    StreamMetadata {
        width: info.width,
        height: info.height,
        fps,
        frame_count,
        duration,
    }
}
