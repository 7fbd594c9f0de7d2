//! Navigation helpers used by menu consumers.
//!
//! - [`ShuffleCycle`]: a random permutation of `0..n` answering
//!   "what comes after / before value `v`", so repeated random jumps visit
//!   every entry once before repeating.
//! - [`HistoryStack`]: a bounded LIFO stack for undo.

pub mod history;
pub mod shuffle;

pub use history::HistoryStack;
pub use shuffle::ShuffleCycle;

/// Errors raised by the navigation helpers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavError {
    /// A value outside `0..count`, or a cycle that was never built.
    #[error("value {value} is out of range for a cycle of {count}")]
    OutOfRange { value: usize, count: usize },
    /// A history capacity of zero.
    #[error("invalid history capacity {0} (use a negative value for unbounded)")]
    InvalidCapacity(i64),
    /// A shuffle cycle over an empty range.
    #[error("a shuffle cycle needs at least one element")]
    InvalidCount,
}
