// SPDX-License-Identifier: MPL-2.0
//! Playable member port.
//!
//! [`Playable`] is everything a playback group needs from one of its
//! members. Times are local to the member: zero is the member's own start.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Port for a stream that can be driven by a group clock.
///
/// Implementations must never fail across these calls: an exhausted or
/// broken stream simply stops playing or produces nothing.
pub trait Playable {
    /// Advances decoding toward `target`.
    fn update(&mut self, target: Duration);

    /// Repositions so the displayed frame is at or after `target`.
    fn seek(&mut self, target: Duration);

    fn set_playing(&mut self, playing: bool);

    fn is_playing(&self) -> bool;

    /// Member length, zero when unknown or closed.
    fn duration(&self) -> Duration;

    /// Timestamp of the last displayed frame.
    fn current_timestamp(&self) -> Duration;

    /// Nominal frames per second, zero when closed.
    fn fps(&self) -> f64;
}

impl<P: Playable + ?Sized> Playable for Box<P> {
    fn update(&mut self, target: Duration) {
        (**self).update(target);
    }

    fn seek(&mut self, target: Duration) {
        (**self).seek(target);
    }

    fn set_playing(&mut self, playing: bool) {
        (**self).set_playing(playing);
    }

    fn is_playing(&self) -> bool {
        (**self).is_playing()
    }

    fn duration(&self) -> Duration {
        (**self).duration()
    }

    fn current_timestamp(&self) -> Duration {
        (**self).current_timestamp()
    }

    fn fps(&self) -> f64 {
        (**self).fps()
    }
}

/// Shared handle for streams owned outside the group.
///
/// The group only borrows for the duration of each call, so the owner may
/// inspect the stream between ticks.
impl<P: Playable + ?Sized> Playable for Rc<RefCell<P>> {
    fn update(&mut self, target: Duration) {
        self.borrow_mut().update(target);
    }

    fn seek(&mut self, target: Duration) {
        self.borrow_mut().seek(target);
    }

    fn set_playing(&mut self, playing: bool) {
        self.borrow_mut().set_playing(playing);
    }

    fn is_playing(&self) -> bool {
        self.borrow().is_playing()
    }

    fn duration(&self) -> Duration {
        self.borrow().duration()
    }

    fn current_timestamp(&self) -> Duration {
        self.borrow().current_timestamp()
    }

    fn fps(&self) -> f64 {
        self.borrow().fps()
    }
}
