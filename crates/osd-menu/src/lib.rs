//! Interactive on-screen selection menu.
//!
//! A [`MenuController`] owns a [`MenuState`] (options, selection, scroll
//! window), a validated [`KeyBindingTable`] and an [`IdleTimer`], and drives
//! them from host events. Consumers plug in through [`MenuHandler`].

mod config;
mod controller;
mod error;
mod idle;
mod keys;
mod state;

pub use config::MenuConfig;
pub use controller::{MenuAction, MenuController, MenuHandler, MenuStatus};
pub use error::{DispatchError, MenuError};
pub use idle::IdleTimer;
pub use keys::{KeyBindingTable, default_bindings};
pub use state::{FAST_STEP, MenuItem, MenuState, SELECTED_MARKER, TRUNCATED, UNSELECTED_MARKER};
