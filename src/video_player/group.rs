// SPDX-License-Identifier: MPL-2.0
//! Group playback synchronizer.
//!
//! A [`GroupSynchronizer`] drives several [`Playable`] members from one
//! group clock. Each member sits at an offset on the group timeline and is
//! active inside its window `[offset, offset + duration]`:
//!
//! ```text
//! group  0s ───────────────────────────────────────────▶ duration
//! #1        [offset 0 ══════════ 8s]
//! #2                    [offset 5s ══════════════ 13s]
//! ```
//!
//! The group timestamp always stays within `[0, duration]`. Members outside
//! their window are kept paused whatever the group's play state.

use super::clock::{Clock, SystemClock};
use crate::application::port::Playable;
use crate::config::PlaybackConfig;
use crate::domain::video::{MemberId, PlaybackSpeed, PlaybackState};
use std::time::{Duration, Instant};

/// One member of a group and its place on the group timeline.
pub struct GroupMember {
    id: MemberId,
    stream: Box<dyn Playable>,
    offset: Duration,
}

impl GroupMember {
    #[must_use]
    pub fn id(&self) -> MemberId {
        self.id
    }

    #[must_use]
    pub fn offset(&self) -> Duration {
        self.offset
    }

    #[must_use]
    pub fn stream(&self) -> &dyn Playable {
        self.stream.as_ref()
    }

    pub fn stream_mut(&mut self) -> &mut dyn Playable {
        self.stream.as_mut()
    }

    /// Group time at which this member ends.
    #[must_use]
    pub fn end(&self) -> Duration {
        self.offset + self.stream.duration()
    }

    /// Whether group time `timestamp` falls inside this member's window.
    #[must_use]
    pub fn contains(&self, timestamp: Duration) -> bool {
        (self.offset..=self.end()).contains(&timestamp)
    }

    /// Moves the member to its local time for group time `timestamp`.
    ///
    /// Before the window the member rests on its first frame, after it on
    /// its last; in both cases it is paused. Inside the window it resumes
    /// when `resume` is set.
    fn align(&mut self, timestamp: Duration, resume: bool) {
        let duration = self.stream.duration();
        match timestamp.checked_sub(self.offset) {
            None => {
                self.stream.seek(Duration::ZERO);
                self.stream.set_playing(false);
            }
            Some(local) if local <= duration => {
                self.stream.seek(local);
                if resume {
                    self.stream.set_playing(true);
                }
            }
            Some(_) => {
                self.stream.seek(duration);
                self.stream.set_playing(false);
            }
        }
    }
}

impl std::fmt::Debug for GroupMember {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupMember")
            .field("id", &self.id)
            .field("offset", &self.offset)
            .field("duration", &self.stream.duration())
            .field("playing", &self.stream.is_playing())
            .finish()
    }
}

/// Plays a set of members against one shared timeline.
///
/// Members are updated in insertion order and all see the same group
/// timestamp on a given tick.
pub struct GroupSynchronizer {
    members: Vec<GroupMember>,
    timestamp: Duration,
    speed: PlaybackSpeed,
    state: PlaybackState,
    looping: bool,
    last_sample: Instant,
    clock: Box<dyn Clock>,
}

impl GroupSynchronizer {
    /// Creates an empty, stopped group on the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }

    /// Creates an empty, stopped group sampling `clock`.
    pub fn with_clock(clock: impl Clock + 'static) -> Self {
        let last_sample = clock.now();
        Self {
            members: Vec::new(),
            timestamp: Duration::ZERO,
            speed: PlaybackSpeed::default(),
            state: PlaybackState::default(),
            looping: false,
            last_sample,
            clock: Box::new(clock),
        }
    }

    /// Creates a group with configured speed and looping.
    #[must_use]
    pub fn from_config(config: &PlaybackConfig) -> Self {
        let mut group = Self::new();
        group.speed = config.speed();
        group.looping = config.looping();
        group
    }

    // =========================================================================
    // Clock
    // =========================================================================

    /// Advances the group clock by the wall time since the last sample and
    /// drives every member in its window.
    ///
    /// Crossing the end either loops back to zero or stops on the last
    /// frame.
    pub fn update(&mut self) {
        if !self.state.is_playing() || self.members.is_empty() {
            return;
        }

        let now = self.clock.now();
        let elapsed = now.saturating_duration_since(self.last_sample);
        self.last_sample = now;
        let advanced = self.timestamp + self.speed.scale(elapsed);

        let duration = self.duration();
        let finished = advanced > duration;
        if finished && self.looping {
            tracing::debug!(?duration, "group reached end, looping");
            self.seek(Duration::ZERO);
            self.set_playing(true);
            return;
        }
        self.timestamp = advanced.min(duration);

        let timestamp = self.timestamp;
        for member in &mut self.members {
            let active = member.contains(timestamp);
            member.stream.set_playing(active);
            if active {
                member.stream.update(timestamp - member.offset);
            }
        }

        if finished {
            tracing::debug!(?duration, "group reached end, stopping");
            self.set_playing(false);
        }
    }

    // =========================================================================
    // Transport
    // =========================================================================

    /// Plays or pauses the group.
    ///
    /// Only members whose window holds the group timestamp follow; the rest
    /// are paused.
    pub fn set_playing(&mut self, playing: bool) {
        let timestamp = self.timestamp;
        for member in &mut self.members {
            member.stream.set_playing(playing && member.contains(timestamp));
        }
        if playing && !self.state.is_playing() {
            self.last_sample = self.clock.now();
        }
        self.state = PlaybackState::from_playing(playing);
    }

    /// Sets the rate at which the group clock advances.
    pub fn set_speed(&mut self, speed: f64) {
        self.speed = PlaybackSpeed::new(speed);
    }

    /// Moves the speed to the next preset up or down.
    pub fn step_speed(&mut self, faster: bool) {
        self.speed = if faster {
            self.speed.increase()
        } else {
            self.speed.decrease()
        };
    }

    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    /// Moves the whole group to `target`, clamped to `[0, duration]`.
    pub fn seek(&mut self, target: Duration) {
        let duration = self.duration();
        let target = target.min(duration);
        let resume = self.state.is_playing();

        for member in &mut self.members {
            member.align(target, resume);
        }
        self.timestamp = target;

        if target == duration && !self.looping {
            self.set_playing(false);
        }
    }

    // =========================================================================
    // Membership
    // =========================================================================

    /// Adds `stream` at `offset` on the group timeline.
    ///
    /// Returns false, leaving the group unchanged, if `id` is taken. The new
    /// member is positioned at the group timestamp and plays only if the
    /// group plays and its window holds that timestamp.
    pub fn insert(&mut self, id: MemberId, stream: impl Playable + 'static, offset: Duration) -> bool {
        if self.contains(id) {
            tracing::warn!(%id, "member already in group");
            return false;
        }
        let mut member = GroupMember {
            id,
            stream: Box::new(stream),
            offset,
        };
        member.stream.set_playing(false);
        let active = member.contains(self.timestamp);
        member.align(self.timestamp, self.state.is_playing() && active);

        tracing::debug!(%id, ?offset, duration = ?member.stream.duration(), "member inserted");
        self.members.push(member);
        true
    }

    /// Removes and drops the member `id`.
    ///
    /// The group timestamp is clamped to the new duration; an emptied group
    /// rewinds to zero and stops.
    pub fn erase(&mut self, id: MemberId) -> bool {
        let Some(position) = self.members.iter().position(|m| m.id == id) else {
            return false;
        };
        self.members.remove(position);
        tracing::debug!(%id, "member erased");

        if self.members.is_empty() {
            self.timestamp = Duration::ZERO;
            self.state = PlaybackState::Stopped;
        } else {
            self.timestamp = self.timestamp.min(self.duration());
        }
        true
    }

    /// Drops every member and rewinds the group.
    pub fn clear(&mut self) {
        self.members.clear();
        self.timestamp = Duration::ZERO;
        self.state = PlaybackState::Stopped;
    }

    #[must_use]
    pub fn find(&self, id: MemberId) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn find_mut(&mut self, id: MemberId) -> Option<&mut GroupMember> {
        self.members.iter_mut().find(|m| m.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: MemberId) -> bool {
        self.find(id).is_some()
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &GroupMember> {
        self.members.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    // =========================================================================
    // State
    // =========================================================================

    /// End of the latest-ending member; zero for an empty group.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.members
            .iter()
            .map(GroupMember::end)
            .max()
            .unwrap_or(Duration::ZERO)
    }

    #[must_use]
    pub fn current_timestamp(&self) -> Duration {
        self.timestamp
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.looping
    }

    #[must_use]
    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// Highest nominal frame rate among members.
    #[must_use]
    pub fn max_framerate(&self) -> f64 {
        self.members
            .iter()
            .map(|m| m.stream.fps())
            .fold(0.0, f64::max)
    }
}

impl Default for GroupSynchronizer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GroupSynchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupSynchronizer")
            .field("members", &self.members)
            .field("timestamp", &self.timestamp)
            .field("speed", &self.speed)
            .field("state", &self.state)
            .field("looping", &self.looping)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{assert_abs_diff_eq, FakePlayable};
    use crate::video_player::ManualClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn secs(value: u64) -> Duration {
        Duration::from_secs(value)
    }

    fn group() -> (GroupSynchronizer, ManualClock) {
        let clock = ManualClock::new();
        (GroupSynchronizer::with_clock(clock.clone()), clock)
    }

    fn add(group: &mut GroupSynchronizer, id: u64, duration: Duration, offset: Duration) -> Rc<RefCell<FakePlayable>> {
        let member = FakePlayable::shared(duration);
        assert!(group.insert(MemberId::new(id), Rc::clone(&member), offset));
        member
    }

    fn assert_clamped(group: &GroupSynchronizer) {
        assert!(group.current_timestamp() <= group.duration());
    }

    // Scenario tests

    #[test]
    fn seek_past_end_clamps_group_and_member() {
        let (mut group, _) = group();
        let member = add(&mut group, 1, secs(10), Duration::ZERO);

        group.seek(secs(12));

        assert_eq!(group.current_timestamp(), secs(10));
        assert_eq!(member.borrow().seeks.last(), Some(&secs(10)));
    }

    #[test]
    fn seek_before_window_pauses_member() {
        let (mut group, _) = group();
        let first = add(&mut group, 1, secs(8), Duration::ZERO);
        let second = add(&mut group, 2, secs(8), secs(5));
        assert_eq!(group.duration(), secs(13));

        group.set_playing(true);
        group.seek(secs(2));

        assert!(first.borrow().playing);
        assert_eq!(first.borrow().position, secs(2));
        assert!(!second.borrow().playing);
        assert_eq!(second.borrow().position, Duration::ZERO);
    }

    #[test]
    fn looping_group_wraps_to_start() {
        let (mut group, clock) = group();
        let member = add(&mut group, 1, secs(4), Duration::ZERO);
        group.set_looping(true);
        group.set_playing(true);

        clock.advance(secs(3));
        group.update();
        assert_eq!(group.current_timestamp(), secs(3));

        clock.advance(secs(2));
        group.update();

        assert_eq!(group.current_timestamp(), Duration::ZERO);
        assert!(group.is_playing());
        assert!(member.borrow().playing);
        assert_eq!(member.borrow().seeks.last(), Some(&Duration::ZERO));
    }

    #[test]
    fn non_looping_group_stops_at_end() {
        let (mut group, clock) = group();
        let member = add(&mut group, 1, secs(4), Duration::ZERO);
        group.set_playing(true);

        clock.advance(secs(5));
        group.update();

        assert_eq!(group.current_timestamp(), secs(4));
        assert!(!group.is_playing());
        assert!(!member.borrow().playing);
        assert_eq!(member.borrow().updates.last(), Some(&secs(4)));
    }

    #[test]
    fn inserted_member_outside_window_stays_paused() {
        let (mut group, _) = group();
        add(&mut group, 1, secs(5), Duration::ZERO);
        group.seek(secs(1));
        group.set_playing(true);

        let late = add(&mut group, 2, secs(6), secs(3));

        assert_eq!(group.duration(), secs(9));
        assert!(!late.borrow().playing);
        assert!(group.is_playing());
    }

    // Update tests

    #[test]
    fn update_drives_members_with_local_time() {
        let (mut group, clock) = group();
        let first = add(&mut group, 1, secs(10), Duration::ZERO);
        let second = add(&mut group, 2, secs(10), secs(2));
        group.set_playing(true);

        clock.advance(secs(3));
        group.update();

        assert_eq!(first.borrow().updates.last(), Some(&secs(3)));
        assert_eq!(second.borrow().updates.last(), Some(&secs(1)));
    }

    #[test]
    fn update_starts_member_when_window_opens() {
        let (mut group, clock) = group();
        add(&mut group, 1, secs(10), Duration::ZERO);
        let late = add(&mut group, 2, secs(4), secs(2));
        group.set_playing(true);
        assert!(!late.borrow().playing);

        clock.advance(secs(1));
        group.update();
        assert!(!late.borrow().playing);
        assert!(late.borrow().updates.is_empty());

        clock.advance(secs(2));
        group.update();
        assert!(late.borrow().playing);

        clock.advance(secs(4));
        group.update();
        assert!(!late.borrow().playing);
    }

    #[test]
    fn update_applies_speed() {
        let (mut group, clock) = group();
        add(&mut group, 1, secs(10), Duration::ZERO);
        group.set_speed(2.0);
        group.set_playing(true);

        clock.advance(Duration::from_millis(1500));
        group.update();

        assert_eq!(group.current_timestamp(), secs(3));
    }

    #[test]
    fn update_is_noop_when_paused_or_empty() {
        let (mut group, clock) = group();
        group.set_playing(true);
        clock.advance(secs(1));
        group.update();
        assert_eq!(group.current_timestamp(), Duration::ZERO);

        let member = add(&mut group, 1, secs(10), Duration::ZERO);
        group.set_playing(false);
        clock.advance(secs(1));
        group.update();
        assert_eq!(group.current_timestamp(), Duration::ZERO);
        assert!(member.borrow().updates.is_empty());
    }

    #[test]
    fn resume_ignores_time_spent_paused() {
        let (mut group, clock) = group();
        add(&mut group, 1, secs(10), Duration::ZERO);
        group.set_playing(true);
        clock.advance(secs(1));
        group.update();

        group.set_playing(false);
        clock.advance(secs(5));
        group.set_playing(true);
        clock.advance(secs(1));
        group.update();

        assert_eq!(group.current_timestamp(), secs(2));
    }

    // Transport tests

    #[test]
    fn set_playing_only_reaches_members_in_window() {
        let (mut group, _) = group();
        let early = add(&mut group, 1, secs(2), Duration::ZERO);
        let late = add(&mut group, 2, secs(4), secs(6));
        group.seek(secs(1));

        group.set_playing(true);
        assert!(early.borrow().playing);
        assert!(!late.borrow().playing);

        group.set_playing(false);
        assert!(!early.borrow().playing);
    }

    #[test]
    fn seek_after_window_parks_member_on_last_frame() {
        let (mut group, _) = group();
        let short = add(&mut group, 1, secs(3), Duration::ZERO);
        add(&mut group, 2, secs(10), Duration::ZERO);
        group.set_playing(true);

        group.seek(secs(5));

        assert_eq!(short.borrow().position, secs(3));
        assert!(!short.borrow().playing);
        assert!(group.is_playing());
    }

    #[test]
    fn seek_to_end_stops_unless_looping() {
        let (mut group, _) = group();
        add(&mut group, 1, secs(4), Duration::ZERO);
        group.set_playing(true);
        group.seek(secs(4));
        assert!(!group.is_playing());

        group.set_looping(true);
        group.set_playing(true);
        group.seek(secs(4));
        assert!(group.is_playing());
    }

    #[test]
    fn seek_on_empty_group_stops_playback() {
        let (mut group, _) = group();
        group.set_playing(true);

        group.seek(Duration::ZERO);

        assert!(!group.is_playing());
        assert_eq!(group.current_timestamp(), Duration::ZERO);
    }

    #[test]
    fn step_speed_walks_presets() {
        let (mut group, _) = group();
        group.step_speed(true);
        assert!(group.speed().value() > 1.0);
        group.step_speed(false);
        assert_abs_diff_eq!(group.speed().value(), 1.0);

        group.set_speed(0.1);
        group.step_speed(false);
        assert!(group.speed().is_min());
    }

    #[test]
    fn speed_is_clamped() {
        let (mut group, _) = group();
        group.set_speed(100.0);
        assert!(group.speed().is_max());
        group.set_speed(f64::NAN);
        assert_abs_diff_eq!(group.speed().value(), 1.0);
    }

    // Membership tests

    #[test]
    fn duplicate_insert_is_rejected() {
        let (mut group, _) = group();
        add(&mut group, 1, secs(4), Duration::ZERO);
        assert!(!group.insert(MemberId::new(1), FakePlayable::shared(secs(20)), Duration::ZERO));
        assert_eq!(group.len(), 1);
        assert_eq!(group.duration(), secs(4));
    }

    #[test]
    fn insert_positions_member_at_local_time() {
        let (mut group, _) = group();
        add(&mut group, 1, secs(10), Duration::ZERO);
        group.seek(secs(6));
        group.set_playing(true);

        let member = add(&mut group, 2, secs(10), secs(2));

        assert_eq!(member.borrow().seeks.as_slice(), &[secs(4)]);
        assert!(member.borrow().playing);
    }

    #[test]
    fn erase_clamps_timestamp() {
        let (mut group, _) = group();
        add(&mut group, 1, secs(4), Duration::ZERO);
        add(&mut group, 2, secs(10), Duration::ZERO);
        group.seek(secs(8));

        assert!(group.erase(MemberId::new(2)));
        assert_eq!(group.current_timestamp(), secs(4));
        assert!(!group.erase(MemberId::new(2)));

        assert!(group.erase(MemberId::new(1)));
        assert_eq!(group.current_timestamp(), Duration::ZERO);
        assert!(!group.is_playing());
        assert!(group.is_empty());
    }

    #[test]
    fn erase_drops_owned_member() {
        let (mut group, _) = group();
        let member = add(&mut group, 1, secs(4), Duration::ZERO);
        assert_eq!(Rc::strong_count(&member), 2);
        group.erase(MemberId::new(1));
        assert_eq!(Rc::strong_count(&member), 1);
    }

    #[test]
    fn clear_resets_timestamp() {
        let (mut group, _) = group();
        add(&mut group, 1, secs(4), Duration::ZERO);
        group.seek(secs(3));
        group.set_playing(true);

        group.clear();

        assert!(group.is_empty());
        assert_eq!(group.current_timestamp(), Duration::ZERO);
        assert_eq!(group.duration(), Duration::ZERO);
        assert!(!group.is_playing());
    }

    #[test]
    fn find_and_iterate_in_insertion_order() {
        let (mut group, _) = group();
        add(&mut group, 7, secs(4), secs(1));
        add(&mut group, 3, secs(2), Duration::ZERO);

        let ids: Vec<_> = group.iter().map(GroupMember::id).collect();
        assert_eq!(ids, vec![MemberId::new(7), MemberId::new(3)]);
        assert_eq!(group.find(MemberId::new(7)).map(GroupMember::offset), Some(secs(1)));
        assert!(group.find(MemberId::new(9)).is_none());

        let member = group.find_mut(MemberId::new(3)).expect("member 3");
        member.stream_mut().set_playing(true);
        assert!(member.stream().is_playing());
    }

    #[test]
    fn max_framerate_picks_fastest_member() {
        let (mut group, _) = group();
        assert_abs_diff_eq!(group.max_framerate(), 0.0);
        let slow = add(&mut group, 1, secs(4), Duration::ZERO);
        slow.borrow_mut().fps = 24.0;
        let fast = add(&mut group, 2, secs(4), Duration::ZERO);
        fast.borrow_mut().fps = 60.0;
        assert_abs_diff_eq!(group.max_framerate(), 60.0);
    }

    #[test]
    fn timestamp_stays_clamped_across_operations() {
        let (mut group, clock) = group();
        add(&mut group, 1, secs(3), secs(1));
        group.set_playing(true);
        for step in 0..10 {
            clock.advance(Duration::from_millis(700));
            group.update();
            assert_clamped(&group);
            if step == 4 {
                group.seek(secs(60));
                assert_clamped(&group);
                group.set_playing(true);
            }
        }
        add(&mut group, 2, secs(8), Duration::ZERO);
        group.seek(secs(7));
        group.erase(MemberId::new(2));
        assert_clamped(&group);
    }

    #[test]
    fn from_config_applies_playback_settings() {
        let config = PlaybackConfig {
            speed: Some(2.0),
            looping: Some(true),
            ..PlaybackConfig::default()
        };
        let group = GroupSynchronizer::from_config(&config);
        assert_abs_diff_eq!(group.speed().value(), 2.0);
        assert!(group.is_looping());
    }
}
