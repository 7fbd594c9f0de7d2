//! Input events: [`Action`] and [`Msg`].

use std::fmt;
use std::str::FromStr;

use crate::timer::TimerId;

// ---------------------------------------------------------------------------
// Action
// ---------------------------------------------------------------------------

/// A logical menu command, decoupled from the physical key producing it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Action {
    Up,
    Down,
    FastUp,
    FastDown,
    Left,
    Right,
    Open,
    Undo,
    Help,
    Close,
}

impl Action {
    /// Every action, in navigation-first order.
    pub const ALL: [Action; 10] = [
        Action::Up,
        Action::Down,
        Action::FastUp,
        Action::FastDown,
        Action::Left,
        Action::Right,
        Action::Open,
        Action::Undo,
        Action::Help,
        Action::Close,
    ];

    /// The canonical configuration name (`fast_up`, `close`, ...).
    pub const fn name(self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::FastUp => "fast_up",
            Action::FastDown => "fast_down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Open => "open",
            Action::Undo => "undo",
            Action::Help => "help",
            Action::Close => "close",
        }
    }

    /// Whether holding the key should keep re-triggering the action.
    ///
    /// Only the scrolling actions repeat; everything with side effects
    /// fires once per key press.
    pub const fn repeatable(self) -> bool {
        matches!(
            self,
            Action::Up | Action::Down | Action::FastUp | Action::FastDown
        )
    }

    /// Whether the action is routed to a consumer callback.
    pub const fn has_callback(self) -> bool {
        matches!(
            self,
            Action::Left | Action::Right | Action::Open | Action::Undo
        )
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string does not name an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown menu action \u{201c}{0}\u{201d}")]
pub struct ParseActionError(pub String);

impl FromStr for Action {
    type Err = ParseActionError;

    /// Case-insensitive; `_`, `-` and spaces are ignored, so `FastUp`,
    /// `fast_up` and `fast-up` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let folded: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .flat_map(char::to_lowercase)
            .collect();
        Action::ALL
            .into_iter()
            .find(|a| a.name().replace('_', "") == folded)
            .ok_or_else(|| ParseActionError(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Msg
// ---------------------------------------------------------------------------

/// An event delivered by the host to the menu.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Msg {
    /// A bound key was pressed (or auto-repeated).
    Action(Action),
    /// A timer scheduled through the host expired.
    Timer(TimerId),
}

impl From<Action> for Msg {
    fn from(action: Action) -> Self {
        Msg::Action(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_spellings() {
        assert_eq!("FastUp".parse(), Ok(Action::FastUp));
        assert_eq!("fast_down".parse(), Ok(Action::FastDown));
        assert_eq!(" fast-up ".parse(), Ok(Action::FastUp));
        assert_eq!("CLOSE".parse(), Ok(Action::Close));
    }

    #[test]
    fn parse_rejects_unknown() {
        let err = "jump".parse::<Action>().unwrap_err();
        assert_eq!(err, ParseActionError("jump".into()));
    }

    #[test]
    fn names_round_trip() {
        for a in Action::ALL {
            assert_eq!(a.name().parse(), Ok(a));
        }
    }

    #[test]
    fn only_scrolling_repeats() {
        let repeating: Vec<_> = Action::ALL.into_iter().filter(|a| a.repeatable()).collect();
        assert_eq!(
            repeating,
            [Action::Up, Action::Down, Action::FastUp, Action::FastDown]
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_snake_case() {
        let json = serde_json::to_string(&Action::FastUp).unwrap();
        assert_eq!(json, "\"fast_up\"");
        let back: Action = serde_json::from_str("\"undo\"").unwrap();
        assert_eq!(back, Action::Undo);
    }
}
