//! Bounded undo history.

use std::collections::VecDeque;

use crate::NavError;

/// A last-in-first-out stack that forgets its oldest entries once it holds
/// more than its capacity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryStack<T> {
    entries: VecDeque<T>,
    /// `None` means unbounded.
    max_size: Option<usize>,
}

impl<T> HistoryStack<T> {
    /// A stack from a signed capacity: negative means unbounded, zero is
    /// rejected.
    pub fn with_capacity(max_size: i64) -> Result<Self, NavError> {
        match max_size {
            0 => Err(NavError::InvalidCapacity(0)),
            n if n < 0 => Ok(Self::unbounded()),
            n => Ok(Self {
                entries: VecDeque::new(),
                max_size: Some(usize::try_from(n).unwrap_or(usize::MAX)),
            }),
        }
    }

    /// A stack holding at most `max_size` entries.
    pub fn bounded(max_size: usize) -> Result<Self, NavError> {
        if max_size == 0 {
            return Err(NavError::InvalidCapacity(0));
        }
        Ok(Self {
            entries: VecDeque::with_capacity(max_size.min(64)),
            max_size: Some(max_size),
        })
    }

    /// A stack that never evicts.
    pub fn unbounded() -> Self {
        Self {
            entries: VecDeque::new(),
            max_size: None,
        }
    }

    /// Push onto the top, evicting the bottom entry if over capacity.
    pub fn push(&mut self, entry: T) {
        self.entries.push_back(entry);
        if let Some(max) = self.max_size {
            while self.entries.len() > max {
                self.entries.pop_front();
            }
        }
    }

    /// Remove and return the top entry.
    pub fn pop(&mut self) -> Option<T> {
        self.entries.pop_back()
    }

    /// The top entry.
    pub fn peek(&self) -> Option<&T> {
        self.entries.back()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The capacity, or `None` when unbounded.
    pub fn max_size(&self) -> Option<usize> {
        self.max_size
    }

    /// Entries from top (most recent) to bottom.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().rev()
    }
}

impl<T> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::unbounded()
    }
}
