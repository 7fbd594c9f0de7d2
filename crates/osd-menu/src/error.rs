//! Error types for menu construction and dispatch.

use osd_core::{Action, ParseActionError};

/// Construction-time failures. A controller that fails with one of these is
/// never handed out.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MenuError {
    /// A key rebinding names an action that does not exist.
    #[error("unknown action \u{201c}{0}\u{201d} in key rebindings")]
    InvalidAction(String),
    /// A key rebinding supplies an empty key identifier.
    #[error("invalid key {key:?} bound to {action}")]
    InvalidKey { action: Action, key: String },
    /// Two actions share a physical key once all rebindings are applied.
    #[error("key \u{201c}{key}\u{201d} is bound to both {first} and {second}")]
    DuplicateBinding {
        key: String,
        first: Action,
        second: Action,
    },
    /// A configuration value is outside its accepted range.
    #[error("invalid menu option `{field}`: {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}

/// Failures while routing an action. Consumer callback errors are passed
/// through untouched.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError<E> {
    #[error(transparent)]
    UnknownAction(#[from] ParseActionError),
    #[error("menu callback failed")]
    Handler(#[source] E),
}
