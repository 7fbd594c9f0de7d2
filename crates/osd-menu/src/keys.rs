//! Validated mapping from [`Action`]s to physical key identifiers.

use std::collections::{BTreeMap, HashMap};

use osd_core::Action;

use crate::error::MenuError;

/// The built-in bindings, using the host's key names.
pub fn default_bindings() -> BTreeMap<Action, Vec<String>> {
    let table: [(Action, &[&str]); 10] = [
        (Action::Up, &["UP", "WHEEL_UP"]),
        (Action::Down, &["DOWN", "WHEEL_DOWN"]),
        (Action::FastUp, &["Shift+UP", "PGUP"]),
        (Action::FastDown, &["Shift+DOWN", "PGDWN"]),
        (Action::Left, &["LEFT"]),
        (Action::Right, &["RIGHT"]),
        (Action::Open, &["ENTER"]),
        (Action::Undo, &["BS"]),
        (Action::Help, &["?"]),
        (Action::Close, &["ESC"]),
    ];
    table
        .into_iter()
        .map(|(action, keys)| (action, keys.iter().map(|k| k.to_string()).collect()))
        .collect()
}

/// Keys compare case-insensitively with surrounding whitespace ignored.
fn normalize(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Action-to-keys table with no key shared between two actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBindingTable {
    bindings: BTreeMap<Action, Vec<String>>,
    by_key: HashMap<String, Action>,
}

impl KeyBindingTable {
    /// The default bindings with `overrides` applied.
    pub fn from_overrides(overrides: &BTreeMap<String, Vec<String>>) -> Result<Self, MenuError> {
        Self::new(default_bindings(), overrides)
    }

    /// Build a table from `defaults`, then replace the key set of every
    /// action named in `overrides`.
    ///
    /// Fails if an override names an action absent from `defaults`, supplies
    /// a blank key, or if any key ends up under two actions.
    pub fn new(
        defaults: BTreeMap<Action, Vec<String>>,
        overrides: &BTreeMap<String, Vec<String>>,
    ) -> Result<Self, MenuError> {
        let mut bindings = defaults;
        for (name, keys) in overrides {
            let action = name
                .parse::<Action>()
                .ok()
                .filter(|a| bindings.contains_key(a))
                .ok_or_else(|| MenuError::InvalidAction(name.clone()))?;
            if let Some(bad) = keys.iter().find(|k| k.trim().is_empty()) {
                return Err(MenuError::InvalidKey {
                    action,
                    key: bad.clone(),
                });
            }
            log::debug!("rebinding {action} to {keys:?}");
            bindings.insert(action, keys.iter().map(|k| k.trim().to_string()).collect());
        }

        let mut by_key: HashMap<String, Action> = HashMap::new();
        for (&action, keys) in &mut bindings {
            let mut seen = Vec::new();
            keys.retain(|k| {
                let n = normalize(k);
                if seen.contains(&n) {
                    false
                } else {
                    seen.push(n);
                    true
                }
            });
            for (key, n) in keys.iter().zip(seen) {
                if let Some(&first) = by_key.get(&n) {
                    return Err(MenuError::DuplicateBinding {
                        key: key.clone(),
                        first,
                        second: action,
                    });
                }
                by_key.insert(n, action);
            }
        }

        Ok(Self { bindings, by_key })
    }

    /// Keys bound to `action`, as configured.
    pub fn keys_for(&self, action: Action) -> &[String] {
        self.bindings.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The action bound to `key`, compared case-insensitively.
    pub fn action_for(&self, key: &str) -> Option<Action> {
        self.by_key.get(&normalize(key)).copied()
    }

    /// Whether a held key keeps re-triggering `action`.
    pub fn is_repeatable(&self, action: Action) -> bool {
        action.repeatable()
    }

    /// Every `(action, keys)` pair, actions in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Action, &[String])> {
        self.bindings.iter().map(|(&a, keys)| (a, keys.as_slice()))
    }

    /// A listing of every bound action and its keys, one per line, sorted
    /// case-insensitively.
    pub fn help_text(&self) -> String {
        let mut lines: Vec<String> = self
            .iter()
            .filter(|(_, keys)| !keys.is_empty())
            .map(|(action, keys)| {
                let mut keys = keys.to_vec();
                keys.sort_by_key(|k| k.to_lowercase());
                format!("{action}: {}", keys.join(", "))
            })
            .collect();
        lines.sort_by_key(|l| l.to_lowercase());
        lines.join("\n")
    }
}

impl Default for KeyBindingTable {
    fn default() -> Self {
        let bindings = default_bindings();
        let by_key = bindings
            .iter()
            .flat_map(|(&a, keys)| keys.iter().map(move |k| (normalize(k), a)))
            .collect();
        Self { bindings, by_key }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overrides(pairs: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
        pairs
            .iter()
            .map(|(a, keys)| (a.to_string(), keys.iter().map(|k| k.to_string()).collect()))
            .collect()
    }

    #[test]
    fn defaults_are_valid() {
        let table = KeyBindingTable::from_overrides(&BTreeMap::new()).unwrap();
        assert_eq!(table, KeyBindingTable::default());
        assert_eq!(table.action_for("enter"), Some(Action::Open));
        assert_eq!(table.action_for(" ESC "), Some(Action::Close));
    }

    #[test]
    fn override_replaces_key_set() {
        let table =
            KeyBindingTable::from_overrides(&overrides(&[("open", &["SPACE", "KP_ENTER"])])).unwrap();
        assert_eq!(table.keys_for(Action::Open), ["SPACE", "KP_ENTER"]);
        assert_eq!(table.action_for("ENTER"), None);
        assert_eq!(table.keys_for(Action::Up), ["UP", "WHEEL_UP"]);
    }

    #[test]
    fn override_accepts_any_spelling() {
        let table = KeyBindingTable::from_overrides(&overrides(&[("FastUp", &["k"])])).unwrap();
        assert_eq!(table.keys_for(Action::FastUp), ["k"]);
    }

    #[test]
    fn unknown_action_rejected() {
        let err = KeyBindingTable::from_overrides(&overrides(&[("jump", &["j"])])).unwrap_err();
        assert_eq!(err, MenuError::InvalidAction("jump".into()));
    }

    #[test]
    fn action_missing_from_defaults_rejected() {
        let mut defaults = default_bindings();
        defaults.remove(&Action::Help);
        let err = KeyBindingTable::new(defaults, &overrides(&[("help", &["F1"])])).unwrap_err();
        assert_eq!(err, MenuError::InvalidAction("help".into()));
    }

    #[test]
    fn blank_key_rejected() {
        let err = KeyBindingTable::from_overrides(&overrides(&[("undo", &["  "])])).unwrap_err();
        assert_eq!(
            err,
            MenuError::InvalidKey {
                action: Action::Undo,
                key: "  ".into()
            }
        );
    }

    #[test]
    fn duplicate_after_overrides_rejected() {
        let err = KeyBindingTable::from_overrides(&overrides(&[("close", &["enter"])])).unwrap_err();
        assert_eq!(
            err,
            MenuError::DuplicateBinding {
                key: "enter".into(),
                first: Action::Open,
                second: Action::Close,
            }
        );
    }

    #[test]
    fn swapping_keys_between_actions_is_fine() {
        let table = KeyBindingTable::from_overrides(&overrides(&[
            ("open", &["ESC"]),
            ("close", &["ENTER"]),
        ]))
        .unwrap();
        assert_eq!(table.action_for("ESC"), Some(Action::Open));
        assert_eq!(table.action_for("ENTER"), Some(Action::Close));
    }

    #[test]
    fn repeated_key_within_one_action_collapses() {
        let table = KeyBindingTable::from_overrides(&overrides(&[("left", &["h", " H"])])).unwrap();
        assert_eq!(table.keys_for(Action::Left), ["h"]);
    }

    #[test]
    fn only_scrolling_actions_repeat() {
        let table = KeyBindingTable::default();
        assert!(table.is_repeatable(Action::FastDown));
        assert!(!table.is_repeatable(Action::Open));
        assert!(!table.is_repeatable(Action::Left));
    }

    #[test]
    fn help_text_sorted() {
        let table = KeyBindingTable::from_overrides(&overrides(&[("down", &["j", "DOWN"])])).unwrap();
        let help = table.help_text();
        let lines: Vec<&str> = help.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "close: ESC");
        assert_eq!(lines[1], "down: DOWN, j");
        let mut sorted = lines.clone();
        sorted.sort_by_key(|l| l.to_lowercase());
        assert_eq!(lines, sorted);
    }
}
