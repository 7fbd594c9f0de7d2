//! [`SimHost`]: an in-memory host with a manual clock.
//!
//! Used by the test suites and by headless consumers. Nothing advances on
//! its own: the driver moves the clock and pulls expired timers with
//! [`SimHost::pop_due`], feeding each one to the menu as
//! [`Msg::Timer`](crate::Msg::Timer).

use std::collections::{BTreeMap, HashMap};
use std::time::Duration;

use crate::host::{DEFAULT_FONT_SIZE, Host};
use crate::messages::{Action, Msg};
use crate::timer::{TimerId, TimerQueue};

/// A key registered through [`Host::bind_key`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub action: Action,
    pub repeatable: bool,
}

#[derive(Clone, Debug)]
struct Shown {
    text: String,
    until: Duration,
}

/// A simulated host.
#[derive(Debug)]
pub struct SimHost {
    now: Duration,
    font_size: f64,
    shown: Option<Shown>,
    /// Every text ever shown, oldest first.
    history: Vec<String>,
    bindings: BTreeMap<String, Binding>,
    timers: TimerQueue<TimerId>,
    intervals: HashMap<TimerId, Duration>,
    next_id: u64,
}

impl SimHost {
    /// A host at time zero with the default font size and nothing bound.
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            font_size: DEFAULT_FONT_SIZE,
            shown: None,
            history: Vec::new(),
            bindings: BTreeMap::new(),
            timers: TimerQueue::new(),
            intervals: HashMap::new(),
            next_id: 0,
        }
    }

    // -- clock --

    /// Move the clock forward without firing anything.
    ///
    /// Pending timers whose deadline is passed stay queued until pulled
    /// with [`pop_due`](Self::pop_due).
    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Pull the earliest timer due at or before `until`, moving the clock to
    /// its deadline. Repeating timers are re-armed one interval later.
    pub fn pop_due(&mut self, until: Duration) -> Option<TimerId> {
        let (id, deadline) = self.timers.pop_due(until)?;
        self.now = self.now.max(deadline);
        if let Some(&interval) = self.intervals.get(&id) {
            self.timers.push(id, deadline + interval);
        }
        Some(id)
    }

    /// Advance the clock by `by`, returning every timer that fired on the
    /// way as a [`Msg::Timer`], in firing order.
    ///
    /// The returned messages are computed before any of them is handled,
    /// so timers armed or cancelled in response are not reflected. Drivers
    /// that need exact interleaving should loop on
    /// [`pop_due`](Self::pop_due) instead.
    pub fn advance_collect(&mut self, by: Duration) -> Vec<Msg> {
        let until = self.now + by;
        let mut fired = Vec::new();
        while let Some(id) = self.pop_due(until) {
            fired.push(Msg::Timer(id));
        }
        self.now = until;
        fired
    }

    /// Set the clock to an absolute time. Moving backwards is ignored.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    // -- input --

    /// Press `key` once. Returns the bound action, if any.
    pub fn press(&self, key: &str) -> Option<Msg> {
        self.bindings.get(key).map(|b| Msg::Action(b.action))
    }

    /// An auto-repeat event for a held `key`. Returns `None` if the key is
    /// unbound or its binding does not repeat.
    pub fn repeat(&self, key: &str) -> Option<Msg> {
        self.bindings
            .get(key)
            .filter(|b| b.repeatable)
            .map(|b| Msg::Action(b.action))
    }

    // -- inspection --

    /// The text currently visible, if it has not expired.
    pub fn text(&self) -> Option<&str> {
        self.shown
            .as_ref()
            .filter(|s| self.now < s.until)
            .map(|s| s.text.as_str())
    }

    /// Every text shown so far, oldest first.
    pub fn text_history(&self) -> &[String] {
        &self.history
    }

    /// The registered keys.
    pub fn bindings(&self) -> &BTreeMap<String, Binding> {
        &self.bindings
    }

    /// Number of armed timers.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// The earliest armed deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    fn next_timer_id(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }
}

impl Default for SimHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for SimHost {
    fn now(&self) -> Duration {
        self.now
    }

    fn show_text(&mut self, text: &str, duration: Duration) {
        self.history.push(text.to_string());
        self.shown = Some(Shown {
            text: text.to_string(),
            until: self.now + duration,
        });
    }

    fn clear_text(&mut self) {
        self.shown = None;
    }

    fn font_size(&self) -> f64 {
        self.font_size
    }

    fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    fn bind_key(&mut self, key: &str, action: Action, repeatable: bool) {
        self.bindings
            .insert(key.to_string(), Binding { action, repeatable });
    }

    fn unbind_key(&mut self, key: &str) {
        self.bindings.remove(key);
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerId {
        let id = self.next_timer_id();
        self.timers.push(id, self.now + delay);
        id
    }

    fn schedule_repeating(&mut self, interval: Duration) -> TimerId {
        let id = self.next_timer_id();
        self.intervals.insert(id, interval);
        self.timers.push(id, self.now + interval);
        id
    }

    fn cancel_timer(&mut self, id: TimerId) {
        log::trace!("cancel {id:?}");
        self.intervals.remove(&id);
        self.timers.retain(|t| *t != id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn one_shot_fires_once() {
        let mut host = SimHost::new();
        let id = host.schedule_once(ms(500));

        assert_eq!(host.pop_due(ms(499)), None);
        assert_eq!(host.pop_due(ms(500)), Some(id));
        assert_eq!(host.now(), ms(500));
        assert_eq!(host.pop_due(ms(10_000)), None);
    }

    #[test]
    fn repeating_rearms_until_cancelled() {
        let mut host = SimHost::new();
        let id = host.schedule_repeating(ms(100));

        let fired = host.advance_collect(ms(350));
        assert_eq!(fired, vec![Msg::Timer(id); 3]);
        assert_eq!(host.now(), ms(350));

        host.cancel_timer(id);
        assert!(host.advance_collect(ms(1000)).is_empty());
        assert_eq!(host.pending_timers(), 0);
    }

    #[test]
    fn text_expires() {
        let mut host = SimHost::new();
        host.show_text("hello", ms(200));
        assert_eq!(host.text(), Some("hello"));
        host.advance(ms(200));
        assert_eq!(host.text(), None);
        assert_eq!(host.text_history(), ["hello".to_string()]);
    }

    #[test]
    fn press_and_repeat_follow_bindings() {
        let mut host = SimHost::new();
        host.bind_key("UP", Action::Up, true);
        host.bind_key("ENTER", Action::Open, false);

        assert_eq!(host.press("UP"), Some(Msg::Action(Action::Up)));
        assert_eq!(host.repeat("UP"), Some(Msg::Action(Action::Up)));
        assert_eq!(host.press("ENTER"), Some(Msg::Action(Action::Open)));
        assert_eq!(host.repeat("ENTER"), None);
        assert_eq!(host.press("x"), None);

        host.unbind_key("UP");
        assert_eq!(host.press("UP"), None);
    }
}
