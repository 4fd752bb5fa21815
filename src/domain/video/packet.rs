// SPDX-License-Identifier: MPL-2.0
//! Compressed packets and the per-stream packet queue.

use super::newtypes::TimeBase;
use super::stream_kind::StreamKind;
use std::collections::VecDeque;
use std::time::Duration;

/// One compressed unit of one stream.
///
/// `D` is the backend payload (an FFmpeg packet in production, plain data
/// in tests). Timestamps are kept in ticks of [`Packet::time_base`] and
/// converted on demand.
#[derive(Debug, Clone)]
pub struct Packet<D> {
    data: D,
    stream_index: usize,
    kind: StreamKind,
    pts: Option<i64>,
    dts: Option<i64>,
    duration: i64,
    time_base: TimeBase,
    keyframe: bool,
}

impl<D> Packet<D> {
    /// Wraps a payload read from `stream_index`.
    pub fn new(data: D, stream_index: usize) -> Self {
        Self {
            data,
            stream_index,
            kind: StreamKind::Unknown,
            pts: None,
            dts: None,
            duration: 0,
            time_base: TimeBase::default(),
            keyframe: false,
        }
    }

    #[must_use]
    pub fn with_pts(mut self, pts: Option<i64>) -> Self {
        self.pts = pts;
        self
    }

    #[must_use]
    pub fn with_dts(mut self, dts: Option<i64>) -> Self {
        self.dts = dts;
        self
    }

    /// Sets the packet duration in time-base ticks.
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

    #[must_use]
    pub fn with_kind(mut self, kind: StreamKind) -> Self {
        self.kind = kind;
        self
    }

    pub(crate) fn set_kind(&mut self, kind: StreamKind) {
        self.kind = kind;
    }

    pub fn data(&self) -> &D {
        &self.data
    }

    pub fn into_data(self) -> D {
        self.data
    }

    #[must_use]
    pub fn stream_index(&self) -> usize {
        self.stream_index
    }

    #[must_use]
    pub fn kind(&self) -> StreamKind {
        self.kind
    }

    #[must_use]
    pub fn pts(&self) -> Option<i64> {
        self.pts
    }

    #[must_use]
    pub fn dts(&self) -> Option<i64> {
        self.dts
    }

    #[must_use]
    pub fn duration_ticks(&self) -> i64 {
        self.duration
    }

    #[must_use]
    pub fn time_base(&self) -> TimeBase {
        self.time_base
    }

    #[must_use]
    pub fn is_keyframe(&self) -> bool {
        self.keyframe
    }

    /// Best known timestamp in ticks: pts, else dts, else zero.
    #[must_use]
    pub fn timestamp_ticks(&self) -> i64 {
        self.pts.or(self.dts).unwrap_or(0)
    }

    /// Presentation time since container start.
    #[must_use]
    pub fn timestamp(&self) -> Duration {
        self.time_base.to_duration(self.timestamp_ticks())
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.time_base.to_duration(self.duration)
    }
}

/// FIFO of packets belonging to a single stream.
///
/// The first pushed packet fixes the queue's stream index for the rest of
/// its life, [`PacketQueue::clear`] included. A packet from any other index
/// is handed back unchanged.
#[derive(Debug, Clone)]
pub struct PacketQueue<D> {
    stream_index: Option<usize>,
    packets: VecDeque<Packet<D>>,
}

impl<D> Default for PacketQueue<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> PacketQueue<D> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stream_index: None,
            packets: VecDeque::new(),
        }
    }

    /// Returns the bound stream index, if a packet was ever pushed.
    #[must_use]
    pub fn stream_index(&self) -> Option<usize> {
        self.stream_index
    }

    fn accepts(&mut self, packet: &Packet<D>) -> bool {
        match self.stream_index {
            Some(index) => index == packet.stream_index(),
            None => {
                self.stream_index = Some(packet.stream_index());
                true
            }
        }
    }

    /// Appends a packet.
    ///
    /// # Errors
    ///
    /// Returns the packet if its stream index differs from the queue's.
    pub fn push_back(&mut self, packet: Packet<D>) -> Result<(), Packet<D>> {
        if !self.accepts(&packet) {
            return Err(packet);
        }
        self.packets.push_back(packet);
        Ok(())
    }

    /// Prepends a packet.
    ///
    /// # Errors
    ///
    /// Returns the packet if its stream index differs from the queue's.
    pub fn push_front(&mut self, packet: Packet<D>) -> Result<(), Packet<D>> {
        if !self.accepts(&packet) {
            return Err(packet);
        }
        self.packets.push_front(packet);
        Ok(())
    }

    pub fn pop_front(&mut self) -> Option<Packet<D>> {
        self.packets.pop_front()
    }

    pub fn pop_back(&mut self) -> Option<Packet<D>> {
        self.packets.pop_back()
    }

    #[must_use]
    pub fn front(&self) -> Option<&Packet<D>> {
        self.packets.front()
    }

    #[must_use]
    pub fn back(&self) -> Option<&Packet<D>> {
        self.packets.back()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Packet<D>> {
        self.packets.get(index)
    }

    /// Drops every packet queued before the last one.
    pub fn retain_last(&mut self) {
        let excess = self.packets.len().saturating_sub(1);
        self.packets.drain(..excess);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn clear(&mut self) {
        self.packets.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Packet<D>> {
        self.packets.iter()
    }
}
