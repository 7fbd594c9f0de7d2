//! Menu configuration and its validation.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::error::MenuError;

/// Configuration for a [`MenuController`](crate::MenuController).
///
/// Every field has a default; with the `serde` feature a config file only
/// needs to list what it changes.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, deny_unknown_fields))]
pub struct MenuConfig {
    /// First line of the menu.
    pub title: String,
    /// Option rows shown at once. At least 3.
    pub max_visible_lines: usize,
    /// Font size applied while the menu is open. At least 1.
    pub font_size: f64,
    /// Idle seconds before the menu closes itself; `0` disables.
    pub auto_close_delay_secs: f64,
    /// Period of the redraw tick, in milliseconds.
    pub redraw_interval_ms: u64,
    /// How long the key listing stays up after Help.
    pub help_duration_ms: u64,
    /// Per-action key overrides, keyed by action name.
    pub key_rebindings: BTreeMap<String, Vec<String>>,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            max_visible_lines: 15,
            font_size: 25.0,
            auto_close_delay_secs: 5.0,
            redraw_interval_ms: 1000,
            help_duration_ms: 5000,
            key_rebindings: BTreeMap::new(),
        }
    }
}

/// Checked, unit-converted form of [`MenuConfig`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Settings {
    pub max_visible_lines: usize,
    pub font_size: f64,
    pub auto_close_delay: Duration,
    pub redraw_interval: Duration,
    pub help_duration: Duration,
}

impl MenuConfig {
    pub(crate) fn validate(&self) -> Result<Settings, MenuError> {
        if self.max_visible_lines < 3 {
            return Err(invalid(
                "max_visible_lines",
                format!("must be at least 3, got {}", self.max_visible_lines),
            ));
        }
        if !self.font_size.is_finite() || self.font_size < 1.0 {
            return Err(invalid(
                "font_size",
                format!("must be at least 1, got {}", self.font_size),
            ));
        }
        let auto_close_delay = Duration::try_from_secs_f64(self.auto_close_delay_secs)
            .map_err(|e| invalid("auto_close_delay_secs", e.to_string()))?;
        if self.redraw_interval_ms == 0 {
            return Err(invalid("redraw_interval_ms", "must be positive".into()));
        }
        Ok(Settings {
            max_visible_lines: self.max_visible_lines,
            font_size: self.font_size,
            auto_close_delay,
            redraw_interval: Duration::from_millis(self.redraw_interval_ms),
            help_duration: Duration::from_millis(self.help_duration_ms),
        })
    }
}

fn invalid(field: &'static str, reason: String) -> MenuError {
    MenuError::InvalidConfig { field, reason }
}
