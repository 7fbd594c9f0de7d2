//! **osd-core** — host boundary for the on-screen menu engine.
//!
//! The menu engine never talks to a media player, terminal or window
//! directly. Everything it needs from its surroundings goes through the
//! [`Host`] trait: a text display surface, a global font size, key
//! registration and cancelable timers. Events flow back as [`Msg`] values.

pub mod host;
pub mod messages;
pub mod sim;
pub mod timer;

pub use host::{DEFAULT_FONT_SIZE, Host};
pub use messages::{Action, Msg, ParseActionError};
pub use sim::SimHost;
pub use timer::{TimerId, TimerQueue};
