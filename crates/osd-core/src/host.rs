//! The [`Host`] trait: everything the menu engine borrows from the
//! application it runs inside.

use std::time::Duration;

use crate::messages::Action;
use crate::timer::TimerId;

/// Font size a host reports before the menu overrides it.
pub const DEFAULT_FONT_SIZE: f64 = 55.0;

/// Services provided by the hosting application (media player, terminal,
/// test harness).
///
/// All calls are synchronous and must not block. Timer expiries and key
/// presses are reported back to the menu as [`Msg`](crate::Msg) values
/// by whatever loop drives the host.
pub trait Host {
    /// Monotonic time since an arbitrary, fixed origin.
    fn now(&self) -> Duration;

    /// Put `text` on the shared on-screen text surface for `duration`.
    /// The next call, or a competing writer, replaces it.
    fn show_text(&mut self, text: &str, duration: Duration);

    /// Remove whatever this caller put on the text surface.
    fn clear_text(&mut self);

    /// The global on-screen font size.
    fn font_size(&self) -> f64;

    /// Override the global on-screen font size.
    fn set_font_size(&mut self, size: f64);

    /// Route presses of the physical key `key` to `action`. When
    /// `repeatable` is false, auto-repeat of a held key is suppressed.
    fn bind_key(&mut self, key: &str, action: Action, repeatable: bool);

    /// Undo a previous [`bind_key`](Self::bind_key).
    fn unbind_key(&mut self, key: &str);

    /// Arm a one-shot timer.
    fn schedule_once(&mut self, delay: Duration) -> TimerId;

    /// Arm a timer that fires every `interval` until cancelled.
    fn schedule_repeating(&mut self, interval: Duration) -> TimerId;

    /// Cancel a pending timer. Unknown or already-fired ids are ignored.
    fn cancel_timer(&mut self, id: TimerId);
}

impl<H: Host + ?Sized> Host for &mut H {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn show_text(&mut self, text: &str, duration: Duration) {
        (**self).show_text(text, duration)
    }

    fn clear_text(&mut self) {
        (**self).clear_text()
    }

    fn font_size(&self) -> f64 {
        (**self).font_size()
    }

    fn set_font_size(&mut self, size: f64) {
        (**self).set_font_size(size)
    }

    fn bind_key(&mut self, key: &str, action: Action, repeatable: bool) {
        (**self).bind_key(key, action, repeatable)
    }

    fn unbind_key(&mut self, key: &str) {
        (**self).unbind_key(key)
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerId {
        (**self).schedule_once(delay)
    }

    fn schedule_repeating(&mut self, interval: Duration) -> TimerId {
        (**self).schedule_repeating(interval)
    }

    fn cancel_timer(&mut self, id: TimerId) {
        (**self).cancel_timer(id)
    }
}
