//! Pending-timer queue shared by host implementations.
//!
//! Timers are stored in a min-heap keyed by `(deadline, insertion_order)`.
//! Earlier deadlines fire first; ties fire in the order they were armed.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;

/// Handle to a timer scheduled through a [`Host`](crate::Host).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug)]
struct Entry<E> {
    event: E,
    deadline: Duration,
    /// Monotonically increasing counter used to break ties.
    seq: u64,
}

impl<E> PartialEq for Entry<E> {
    fn eq(&self, other: &Self) -> bool {
        self.deadline == other.deadline && self.seq == other.seq
    }
}

impl<E> Eq for Entry<E> {}

impl<E> PartialOrd for Entry<E> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<E> Ord for Entry<E> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.deadline
            .cmp(&other.deadline)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// A deadline-ordered queue of pending timer events.
#[derive(Debug)]
pub struct TimerQueue<E> {
    heap: BinaryHeap<Reverse<Entry<E>>>,
    seq: u64,
}

impl<E> TimerQueue<E> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    /// Arm `event` to fire at `deadline`.
    pub fn push(&mut self, event: E, deadline: Duration) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Reverse(Entry {
            event,
            deadline,
            seq,
        }));
    }

    /// The earliest pending deadline.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.heap.peek().map(|Reverse(entry)| entry.deadline)
    }

    /// Pop the earliest event if its deadline is at or before `until`,
    /// also returning the deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(E, Duration)> {
        if self.next_deadline()? > until {
            return None;
        }
        self.heap
            .pop()
            .map(|Reverse(entry)| (entry.event, entry.deadline))
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Remove all events that do **not** satisfy the predicate.
    pub fn retain(&mut self, predicate: impl Fn(&E) -> bool) {
        let old_heap = std::mem::take(&mut self.heap);
        self.heap = old_heap
            .into_iter()
            .filter(|Reverse(entry)| predicate(&entry.event))
            .collect();
    }
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn pops_in_deadline_order() {
        let mut q = TimerQueue::new();
        q.push("c", ms(300));
        q.push("a", ms(100));
        q.push("b", ms(200));

        assert_eq!(q.pop_due(ms(1000)), Some(("a", ms(100))));
        assert_eq!(q.pop_due(ms(1000)), Some(("b", ms(200))));
        assert_eq!(q.pop_due(ms(1000)), Some(("c", ms(300))));
        assert_eq!(q.pop_due(ms(1000)), None);
    }

    #[test]
    fn ties_fire_in_arming_order() {
        let mut q = TimerQueue::new();
        q.push("first", ms(50));
        q.push("second", ms(50));

        assert_eq!(q.pop_due(ms(50)).map(|(e, _)| e), Some("first"));
        assert_eq!(q.pop_due(ms(50)).map(|(e, _)| e), Some("second"));
    }

    #[test]
    fn not_due_stays_queued() {
        let mut q = TimerQueue::new();
        q.push(1, ms(500));
        assert_eq!(q.pop_due(ms(499)), None);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_deadline(), Some(ms(500)));
    }

    #[test]
    fn retain_cancels() {
        let mut q = TimerQueue::new();
        q.push(TimerId(1), ms(10));
        q.push(TimerId(2), ms(20));
        q.push(TimerId(3), ms(30));

        q.retain(|id| *id != TimerId(2));
        assert_eq!(q.len(), 2);
        assert_eq!(q.pop_due(ms(100)).map(|(e, _)| e), Some(TimerId(1)));
        assert_eq!(q.pop_due(ms(100)).map(|(e, _)| e), Some(TimerId(3)));
        assert!(q.is_empty());
    }
}
