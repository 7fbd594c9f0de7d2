//! Non-repeating random traversal over `0..count`.
//!
//! The cycle stores a permutation and no cursor. Every query locates the
//! caller's current value in the permutation and steps from there, so the
//! caller may move anywhere between jumps (manual navigation, undo) and the
//! next jump still starts from where it actually is.

use rand::rngs::ThreadRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::NavError;

/// A random permutation of `0..count`, walked as a ring.
#[derive(Debug, Clone)]
pub struct ShuffleCycle<R: Rng = ThreadRng> {
    rng: R,
    order: Vec<usize>,
}

impl ShuffleCycle<ThreadRng> {
    /// An empty cycle backed by the thread-local generator.
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl Default for ShuffleCycle<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> ShuffleCycle<R> {
    /// An empty cycle backed by `rng`. Call [`set_count`](Self::set_count)
    /// before querying.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            order: Vec::new(),
        }
    }

    /// Rebuild the permutation over `0..count`, discarding the old one.
    ///
    /// Must be called again whenever the size of the underlying collection
    /// changes; content changes alone do not require it.
    pub fn set_count(&mut self, count: usize) -> Result<(), NavError> {
        if count == 0 {
            return Err(NavError::InvalidCount);
        }
        self.order.clear();
        self.order.extend(0..count);
        self.order.shuffle(&mut self.rng);
        log::debug!("shuffle cycle rebuilt over {count} values");
        Ok(())
    }

    /// Re-randomize the permutation without changing its size.
    pub fn reshuffle(&mut self) {
        self.order.shuffle(&mut self.rng);
    }

    /// Size of the permutation; `0` before the first `set_count`.
    pub fn count(&self) -> usize {
        self.order.len()
    }

    /// The current permutation.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// The value following `current` in the cycle.
    pub fn next(&self, current: usize) -> Result<usize, NavError> {
        let n = self.order.len();
        let p = self.position(current)?;
        Ok(self.order[(p + 1) % n])
    }

    /// The value preceding `current` in the cycle.
    pub fn previous(&self, current: usize) -> Result<usize, NavError> {
        let n = self.order.len();
        let p = self.position(current)?;
        Ok(self.order[(p + n - 1) % n])
    }

    /// Like [`next`](Self::next), but first rebuilds the cycle when `count`
    /// differs from the current size, and retries once after a rebuild if
    /// `current` cannot be located.
    pub fn next_or_rebuild(&mut self, current: usize, count: usize) -> Result<usize, NavError> {
        self.step_or_rebuild(current, count, Self::next)
    }

    /// Like [`previous`](Self::previous), rebuilding as
    /// [`next_or_rebuild`](Self::next_or_rebuild) does.
    pub fn previous_or_rebuild(
        &mut self,
        current: usize,
        count: usize,
    ) -> Result<usize, NavError> {
        self.step_or_rebuild(current, count, Self::previous)
    }

    // -- private helpers --

    fn step_or_rebuild(
        &mut self,
        current: usize,
        count: usize,
        step: fn(&Self, usize) -> Result<usize, NavError>,
    ) -> Result<usize, NavError> {
        if count != self.order.len() {
            self.set_count(count)?;
        }
        match step(self, current) {
            Err(NavError::OutOfRange { .. }) if current < count => {
                log::warn!("shuffle cycle lost value {current}; rebuilding");
                self.set_count(count)?;
                step(self, current)
            }
            other => other,
        }
    }

    fn position(&self, value: usize) -> Result<usize, NavError> {
        let out_of_range = NavError::OutOfRange {
            value,
            count: self.order.len(),
        };
        if value >= self.order.len() {
            return Err(out_of_range);
        }
        self.order
            .iter()
            .position(|&v| v == value)
            .ok_or(out_of_range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(count: usize, seed: u64) -> ShuffleCycle<StdRng> {
        let mut c = ShuffleCycle::with_rng(StdRng::seed_from_u64(seed));
        c.set_count(count).unwrap();
        c
    }

    #[test]
    fn order_is_a_permutation() {
        let c = seeded(50, 7);
        let mut sorted = c.order().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn following_next_visits_everything_once() {
        for n in 1..=40 {
            let c = seeded(n, n as u64);
            for start in 0..n {
                let mut seen = vec![false; n];
                let mut v = start;
                for _ in 0..n {
                    assert!(!seen[v], "n={n}: {v} visited twice");
                    seen[v] = true;
                    v = c.next(v).unwrap();
                }
                assert_eq!(v, start, "n={n}: cycle did not close");
                assert!(seen.iter().all(|&s| s));
            }
        }
    }

    #[test]
    fn previous_inverts_next() {
        let c = seeded(25, 3);
        for v in 0..25 {
            assert_eq!(c.previous(c.next(v).unwrap()).unwrap(), v);
            assert_eq!(c.next(c.previous(v).unwrap()).unwrap(), v);
        }
    }

    #[test]
    fn single_element_cycles_to_itself() {
        let c = seeded(1, 0);
        assert_eq!(c.next(0), Ok(0));
        assert_eq!(c.previous(0), Ok(0));
    }

    #[test]
    fn out_of_range_values_fail() {
        let c = seeded(5, 1);
        assert_eq!(c.next(5), Err(NavError::OutOfRange { value: 5, count: 5 }));
        assert_eq!(
            c.previous(usize::MAX),
            Err(NavError::OutOfRange {
                value: usize::MAX,
                count: 5
            })
        );
    }

    #[test]
    fn unbuilt_cycle_fails() {
        let c = ShuffleCycle::with_rng(StdRng::seed_from_u64(0));
        assert_eq!(c.next(0), Err(NavError::OutOfRange { value: 0, count: 0 }));
    }

    #[test]
    fn zero_count_rejected() {
        let mut c = ShuffleCycle::with_rng(StdRng::seed_from_u64(0));
        assert_eq!(c.set_count(0), Err(NavError::InvalidCount));
    }

    #[test]
    fn reshuffle_keeps_size_and_cycle_property() {
        let mut c = seeded(30, 11);
        c.reshuffle();
        assert_eq!(c.count(), 30);
        let mut v = 0;
        let mut steps = 0;
        loop {
            v = c.next(v).unwrap();
            steps += 1;
            if v == 0 {
                break;
            }
        }
        assert_eq!(steps, 30);
    }

    #[test]
    fn or_rebuild_follows_count_changes() {
        let mut c = seeded(4, 5);
        let next = c.next_or_rebuild(7, 10).unwrap();
        assert_eq!(c.count(), 10);
        assert!(next < 10);
        assert_eq!(c.previous_or_rebuild(next, 10), Ok(7));
    }

    #[test]
    fn or_rebuild_still_rejects_values_past_count() {
        let mut c = seeded(4, 5);
        assert_eq!(
            c.next_or_rebuild(4, 4),
            Err(NavError::OutOfRange { value: 4, count: 4 })
        );
    }
}
