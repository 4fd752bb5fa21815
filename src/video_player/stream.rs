// SPDX-License-Identifier: MPL-2.0
//! Playback semantics over one decoder session.
//!
//! A [`PlayableStream`] turns a [`DecoderSession`] into something a clock
//! can drive:
//!
//! - [`PlayableStream::update`] catches the displayed frame up to a moving
//!   target, dropping frames it has fallen behind on and idling when ahead
//! - [`PlayableStream::seek`] lands on the first frame at or after a target
//!   by decoding forward from the nearest keyframe
//!
//! Decoded pictures go to the stream's own [`DisplaySurface`].

use super::decoder::DecoderSession;
use super::packet_budget::PacketBudget;
use crate::application::port::{DisplaySurface, MediaContainer, Playable};
use crate::config::PlaybackConfig;
use crate::domain::error::VideoError;
use crate::domain::video::{Frame, StreamKind, StreamMetadata};
use std::path::Path;
use std::time::Duration;

const VIDEO: StreamKind = StreamKind::Video;

/// Outcome of one [`PlayableStream::poll_seek`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeekProgress {
    /// The scan ran out of budget; call again.
    Pending,
    /// The target frame (or the last reachable one) is displayed.
    Done,
}

enum Scan {
    Pending,
    Finished(Option<Frame>),
}

/// One decoder session, one display surface and a playback position.
pub struct PlayableStream<C: MediaContainer, S: DisplaySurface> {
    session: DecoderSession<C>,
    surface: S,
    last_displayed: Duration,
    shown: bool,
    playing: bool,
    pending_seek: Option<Duration>,
    budget: PacketBudget,
}

impl<C: MediaContainer, S: DisplaySurface> PlayableStream<C, S> {
    /// Creates a closed stream drawing into `surface`.
    pub fn new(surface: S) -> Self {
        Self {
            session: DecoderSession::new(),
            surface,
            last_displayed: Duration::ZERO,
            shown: false,
            playing: false,
            pending_seek: None,
            budget: PacketBudget::default(),
        }
    }

    /// Creates a closed stream using configured fallbacks and work budget.
    pub fn with_config(surface: S, config: &PlaybackConfig) -> Self {
        Self {
            session: DecoderSession::with_config(config),
            budget: config.packet_budget(),
            ..Self::new(surface)
        }
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Opens `path`, closing whatever was open before.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be opened; the stream is then
    /// closed.
    pub fn open(&mut self, path: &Path) -> Result<(), VideoError> {
        self.close();
        self.session.open(path)
    }

    /// Adopts an opened container, closing whatever was open before.
    ///
    /// # Errors
    ///
    /// Returns an error if the session rejects the container.
    pub fn open_container(&mut self, container: C) -> Result<(), VideoError> {
        self.close();
        self.session.open_container(container)
    }

    /// Stops playback, releases the session and blanks the surface.
    ///
    /// Closing a closed stream does nothing.
    pub fn close(&mut self) {
        if !self.session.is_open() {
            return;
        }
        self.clear_surface([0, 0, 0]);
        self.playing = false;
        self.pending_seek = None;
        self.last_displayed = Duration::ZERO;
        self.shown = false;
        self.session.close();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_open()
    }

    /// Starts or pauses playback. Ignored while closed.
    pub fn set_playing(&mut self, playing: bool) {
        self.playing = playing && self.session.is_open();
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    // =========================================================================
    // Continuous update
    // =========================================================================

    /// Advances the displayed frame toward `target`.
    ///
    /// Decodes at most one frame per call. Stale queued packets are dropped
    /// without decoding; nothing happens when the next packet is still in
    /// the future. Reaching the end of the stream stops playback. A pending
    /// seek is advanced first and consumes the call.
    pub fn update(&mut self, target: Duration) {
        if !self.session.is_open() || !self.playing {
            return;
        }

        if self.pending_seek.is_some() {
            self.poll_seek(self.budget.value());
            return;
        }

        let frame_time = self.session.metadata().frame_time();
        let mut reads = 0;

        loop {
            let Some(next) = self.session.peek_next_packet(VIDEO).map(|p| p.timestamp()) else {
                if self.session.end_of_stream() {
                    break;
                }
                if reads >= self.budget.value() {
                    return;
                }
                reads += 1;
                match self.session.read_packet() {
                    Some(StreamKind::Video) | None => {}
                    Some(_) => self.session.discard_last_read_packet(),
                }
                continue;
            };

            if next > target {
                return;
            }
            if next >= self.last_displayed && next + frame_time > target {
                break;
            }
            tracing::trace!(?next, ?target, "dropping late frame");
            self.session.discard_next_packet(VIDEO);
        }

        if self.session.queue_size(VIDEO) == 0 {
            tracing::debug!(position = ?self.last_displayed, "end of stream, stopping");
            self.playing = false;
            return;
        }

        if let Some(frame) = self.session.decode_next_packet(VIDEO) {
            self.present(&frame);
        }
    }

    // =========================================================================
    // Seeking
    // =========================================================================

    /// Displays the first decodable frame at or after `target`.
    ///
    /// Runs to completion. The play state is left unchanged.
    pub fn seek(&mut self, target: Duration) {
        self.begin_seek(target);
        self.poll_seek(usize::MAX);
    }

    /// Starts a seek that [`PlayableStream::poll_seek`] (or the next
    /// [`PlayableStream::update`] while playing) carries out.
    ///
    /// Seeking backward rewinds to the start of the stream first. Seeking
    /// to the frame already on screen does nothing.
    pub fn begin_seek(&mut self, target: Duration) {
        if !self.session.is_open() {
            return;
        }
        if self.shown && self.pending_seek.is_none() && target == self.last_displayed {
            tracing::trace!(?target, "frame already displayed");
            return;
        }
        self.start_seek(target, target < self.last_displayed);
    }

    fn start_seek(&mut self, target: Duration, rewind: bool) {
        if rewind {
            self.session.seek_to_keyframe(Duration::ZERO);
            self.last_displayed = Duration::ZERO;
            self.shown = false;
        }
        self.pending_seek = Some(target);
    }

    /// Reads at most `budget` packets toward the pending seek target.
    pub fn poll_seek(&mut self, budget: usize) -> SeekProgress {
        match self.scan(budget) {
            Scan::Pending => SeekProgress::Pending,
            Scan::Finished(frame) => {
                if let Some(frame) = frame {
                    let [y, u, v] = frame.planes();
                    self.surface.update_planes(y, u, v);
                }
                SeekProgress::Done
            }
        }
    }

    #[must_use]
    pub fn is_seeking(&self) -> bool {
        self.pending_seek.is_some()
    }

    /// Queues packets until the newest video packet reaches the target,
    /// keeping only the latest keyframe's group of pictures, then decodes
    /// the whole queue.
    fn scan(&mut self, budget: usize) -> Scan {
        let Some(target) = self.pending_seek else {
            return Scan::Finished(None);
        };
        let mut reads = 0;

        loop {
            if self.session.end_of_stream() {
                break;
            }
            let reached = self
                .session
                .peek_last_packet(VIDEO)
                .is_some_and(|p| p.timestamp() >= target);
            if reached {
                break;
            }
            if reads >= budget {
                return Scan::Pending;
            }
            reads += 1;
            match self.session.read_packet() {
                None => break,
                Some(StreamKind::Video) => {
                    let keyframe = self.session.peek_last_packet(VIDEO).is_some_and(|p| p.is_keyframe());
                    if keyframe {
                        self.session.retain_last_packet(VIDEO);
                    }
                }
                Some(_) => self.session.discard_last_read_packet(),
            }
        }

        self.pending_seek = None;
        Scan::Finished(self.drain_video_queue())
    }

    /// Decodes every queued video packet, returning the last picture.
    fn drain_video_queue(&mut self) -> Option<Frame> {
        let mut last = None;
        while self.session.queue_size(VIDEO) > 0 {
            if let Some(frame) = self.session.decode_next_packet(VIDEO) {
                self.last_displayed = frame.timestamp();
                self.shown = true;
                last = Some(frame);
            }
        }
        last
    }

    fn present(&mut self, frame: &Frame) {
        let [y, u, v] = frame.planes();
        self.surface.update_planes(y, u, v);
        self.last_displayed = frame.timestamp();
        self.shown = true;
    }

    // =========================================================================
    // Surfaces
    // =========================================================================

    /// Pushes the frame at `at` (default: the middle) into `sink`, then
    /// returns to the previously displayed position.
    ///
    /// Returns false when nothing could be decoded.
    pub fn thumbnail(&mut self, at: Option<Duration>, sink: &mut impl DisplaySurface) -> bool {
        if !self.session.is_open() {
            return false;
        }
        let resume = self.last_displayed;
        let duration = self.session.duration();
        let at = at.unwrap_or(duration / 2).min(duration);

        self.pending_seek = None;
        self.start_seek(at, at <= self.last_displayed);
        let grabbed = match self.scan(usize::MAX) {
            Scan::Finished(Some(frame)) => {
                let [y, u, v] = frame.planes();
                sink.update_planes(y, u, v);
                true
            }
            Scan::Finished(None) | Scan::Pending => false,
        };

        self.seek(resume);
        grabbed
    }

    /// Paints the surface with one colour at the stream's resolution.
    pub fn clear_surface(&mut self, rgb: [u8; 3]) {
        let (width, height) = (self.session.width(), self.session.height());
        if width == 0 || height == 0 {
            return;
        }
        let blank = Frame::solid(width, height, rgb);
        let [y, u, v] = blank.planes();
        self.surface.update_planes(y, u, v);
    }

    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // =========================================================================
    // Position and metadata
    // =========================================================================

    /// Timestamp of the last displayed frame.
    #[must_use]
    pub fn current_timestamp(&self) -> Duration {
        self.last_displayed
    }

    #[must_use]
    pub fn current_frame_number(&self) -> u64 {
        self.session.timestamp_to_frame_number(self.last_displayed)
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.session.duration()
    }

    #[must_use]
    pub fn fps(&self) -> f64 {
        self.session.fps()
    }

    /// Nominal duration of one frame.
    #[must_use]
    pub fn frame_time(&self) -> Duration {
        self.session.metadata().frame_time()
    }

    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.session.frame_count()
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.session.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.session.height()
    }

    #[must_use]
    pub fn metadata(&self) -> &StreamMetadata {
        self.session.metadata()
    }

    #[must_use]
    pub fn session(&self) -> &DecoderSession<C> {
        &self.session
    }

    pub fn set_packet_budget(&mut self, budget: PacketBudget) {
        self.budget = budget;
    }

    #[must_use]
    pub fn packet_budget(&self) -> PacketBudget {
        self.budget
    }
}

impl<C: MediaContainer, S: DisplaySurface> Playable for PlayableStream<C, S> {
    fn update(&mut self, target: Duration) {
        PlayableStream::update(self, target);
    }

    fn seek(&mut self, target: Duration) {
        PlayableStream::seek(self, target);
    }

    fn set_playing(&mut self, playing: bool) {
        PlayableStream::set_playing(self, playing);
    }

    fn is_playing(&self) -> bool {
        PlayableStream::is_playing(self)
    }

    fn duration(&self) -> Duration {
        PlayableStream::duration(self)
    }

    fn current_timestamp(&self) -> Duration {
        PlayableStream::current_timestamp(self)
    }

    fn fps(&self) -> f64 {
        PlayableStream::fps(self)
    }
}
