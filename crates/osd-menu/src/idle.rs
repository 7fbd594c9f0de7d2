//! Idle tracking for automatic menu dismissal.

use std::time::Duration;

/// Tracks the last user activity and decides when an idle menu should
/// close.
///
/// Two kinds of suspension exist. A soft disable lasts until the next
/// [`touch`](Self::touch), which callers issue after every handled action;
/// it keeps the clock from expiring while a consumer callback runs. A hard
/// disable survives touches and is lifted only by
/// [`force_enable`](Self::force_enable); message overlays use it because
/// their own timer governs dismissal.
#[derive(Debug, Clone, Default)]
pub struct IdleTimer {
    last_activity: Duration,
    soft_disabled: bool,
    hard_disabled: bool,
}

impl IdleTimer {
    /// A timer whose last activity is `now`.
    pub fn new(now: Duration) -> Self {
        Self {
            last_activity: now,
            soft_disabled: false,
            hard_disabled: false,
        }
    }

    /// Record activity at `now` and lift a soft disable. Ignored while hard
    /// disabled.
    pub fn touch(&mut self, now: Duration) {
        if self.hard_disabled {
            return;
        }
        self.soft_disabled = false;
        self.last_activity = now;
    }

    pub fn soft_disable(&mut self) {
        self.soft_disabled = true;
    }

    pub fn hard_disable(&mut self) {
        self.hard_disabled = true;
    }

    /// Lift both kinds of disable and restart the idle clock at `now`.
    pub fn force_enable(&mut self, now: Duration) {
        self.hard_disabled = false;
        self.soft_disabled = false;
        self.last_activity = now;
    }

    pub fn is_disabled(&self) -> bool {
        self.soft_disabled || self.hard_disabled
    }

    pub fn is_hard_disabled(&self) -> bool {
        self.hard_disabled
    }

    /// Whether more than `delay` has passed since the last activity. A zero
    /// `delay` turns auto-close off.
    pub fn check_expired(&self, delay: Duration, now: Duration) -> bool {
        if delay.is_zero() || self.is_disabled() {
            return false;
        }
        now.saturating_sub(self.last_activity) > delay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    #[test]
    fn expires_after_delay() {
        let t = IdleTimer::new(secs(10));
        assert!(!t.check_expired(secs(5), secs(15)));
        assert!(t.check_expired(secs(5), secs(16)));
    }

    #[test]
    fn zero_delay_never_expires() {
        let t = IdleTimer::new(Duration::ZERO);
        assert!(!t.check_expired(Duration::ZERO, secs(1_000_000)));
    }

    #[test]
    fn touch_restarts_clock() {
        let mut t = IdleTimer::new(Duration::ZERO);
        t.touch(secs(4));
        assert!(!t.check_expired(secs(5), secs(8)));
    }

    #[test]
    fn soft_disable_lifted_by_touch() {
        let mut t = IdleTimer::new(Duration::ZERO);
        t.soft_disable();
        assert!(!t.check_expired(secs(1), secs(100)));
        t.touch(secs(100));
        assert!(!t.is_disabled());
        assert!(t.check_expired(secs(1), secs(102)));
    }

    #[test]
    fn hard_disable_survives_touch() {
        let mut t = IdleTimer::new(Duration::ZERO);
        t.hard_disable();
        t.touch(secs(50));
        assert!(t.is_hard_disabled());
        assert!(!t.check_expired(secs(1), secs(100)));

        t.force_enable(secs(100));
        assert!(!t.check_expired(secs(1), secs(101)));
        assert!(t.check_expired(secs(1), secs(102)));
    }
}
