//! Option list, selection and scroll window.

use std::ops::Range;

/// Prefix of the highlighted row.
pub const SELECTED_MARKER: &str = "> ";
/// Prefix of every other row, keeping columns aligned.
pub const UNSELECTED_MARKER: &str = "  ";
/// Replaces a window-edge row that is not the true first or last item.
pub const TRUNCATED: &str = "...";
/// Step of the fast up / fast down actions.
pub const FAST_STEP: isize = 10;

/// A single option: its display text plus arbitrary consumer data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem<T = ()> {
    pub text: String,
    pub data: T,
}

impl MenuItem<()> {
    /// An option with no attached data.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: (),
        }
    }
}

impl<T> MenuItem<T> {
    /// An option carrying `data`.
    pub fn with_data(text: impl Into<String>, data: T) -> Self {
        Self {
            text: text.into(),
            data,
        }
    }
}

impl From<&str> for MenuItem<()> {
    fn from(text: &str) -> Self {
        MenuItem::new(text)
    }
}

impl From<String> for MenuItem<()> {
    fn from(text: String) -> Self {
        MenuItem::new(text)
    }
}

/// The navigable list behind a menu.
///
/// The selection is always a valid index while the list is non-empty. The
/// scroll window is not stored; it is derived from the selection on every
/// [`render`](Self::render).
#[derive(Debug, Clone)]
pub struct MenuState<T = ()> {
    title: String,
    items: Vec<MenuItem<T>>,
    selected: usize,
}

impl<T> MenuState<T> {
    /// An empty list with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            items: Vec::new(),
            selected: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Replace the options. The selection moves to `initial` if it is valid
    /// for the new list, else to the first item.
    pub fn set_options(&mut self, items: Vec<MenuItem<T>>, initial: Option<usize>) {
        self.items = items;
        self.selected = initial.filter(|&i| i < self.items.len()).unwrap_or(0);
    }

    /// Replace the options, keeping the selection on the first item whose
    /// text matches the previously selected one. Falls back to the old
    /// index, clamped to the new length.
    pub fn refresh_options(&mut self, items: Vec<MenuItem<T>>) {
        let previous = self.selected_item().map(|item| item.text.clone());
        let old_index = self.selected;
        self.items = items;
        self.selected = previous
            .and_then(|text| self.items.iter().position(|item| item.text == text))
            .unwrap_or_else(|| old_index.min(self.items.len().saturating_sub(1)));
    }

    pub fn items(&self) -> &[MenuItem<T>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The selected index; `None` for an empty list.
    pub fn selected_index(&self) -> Option<usize> {
        (!self.items.is_empty()).then_some(self.selected)
    }

    pub fn selected_item(&self) -> Option<&MenuItem<T>> {
        self.items.get(self.selected)
    }

    /// Select `index`. Returns `false`, leaving the selection alone, if the
    /// index is out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.selected = index;
            true
        } else {
            false
        }
    }

    /// Move the selection by `delta`.
    ///
    /// With `wrap`, running off one end lands on the other. Without it the
    /// selection stops at the boundary, so long jumps never silently wrap.
    /// Returns whether the selection changed.
    pub fn move_selection(&mut self, delta: isize, wrap: bool) -> bool {
        let len = self.items.len() as isize;
        if len == 0 {
            return false;
        }
        let mut idx = self.selected as isize + delta;
        if wrap {
            if idx < 0 {
                idx = len - 1;
            } else if idx >= len {
                idx = 0;
            }
        } else {
            idx = idx.clamp(0, len - 1);
        }
        let changed = idx as usize != self.selected;
        self.selected = idx as usize;
        changed
    }

    /// The item indices shown for a window of at most `max_lines` rows.
    ///
    /// The window is centred on the selection, pushed right of zero, cut at
    /// the list end and then re-extended backwards so it stays full.
    pub fn visible_range(&self, max_lines: usize) -> Range<usize> {
        let len = self.items.len();
        let start = self.selected.saturating_sub(max_lines / 2);
        let end = (start + max_lines).min(len);
        let start = end.saturating_sub(max_lines).min(start);
        start..end
    }

    /// The display text: title, a blank line, then the visible rows.
    ///
    /// `selected_prefix` is a transient status (e.g. `[loading...]`) drawn
    /// only in front of the selected row.
    pub fn render(&self, max_lines: usize, selected_prefix: Option<&str>) -> String {
        let mut out = self.title.clone();
        let window = self.visible_range(max_lines);
        if window.is_empty() {
            return out;
        }
        out.push_str("\n\n");

        let (first, last) = (window.start, window.end - 1);
        let mut rows = Vec::with_capacity(window.len());
        for i in window {
            let row = if i == self.selected {
                match selected_prefix {
                    Some(prefix) => {
                        format!("{SELECTED_MARKER}{prefix} {}", self.items[i].text)
                    }
                    None => format!("{SELECTED_MARKER}{}", self.items[i].text),
                }
            } else if (i == first && i > 0) || (i == last && i + 1 < self.items.len()) {
                TRUNCATED.to_string()
            } else {
                format!("{UNSELECTED_MARKER}{}", self.items[i].text)
            };
            rows.push(row);
        }
        out.push_str(&rows.join("\n"));
        out
    }
}

impl<T> Default for MenuState<T> {
    fn default() -> Self {
        Self::new("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(n: usize) -> MenuState {
        let mut s = MenuState::new("Title");
        s.set_options((0..n).map(|i| MenuItem::new(format!("item {i}"))).collect(), None);
        s
    }

    fn rows(rendered: &str) -> Vec<&str> {
        rendered.lines().skip(2).collect()
    }

    #[test]
    fn initial_index_validated() {
        let mut s = state(0);
        s.set_options(vec!["a".into(), "b".into()], Some(1));
        assert_eq!(s.selected_index(), Some(1));
        s.set_options(vec!["a".into(), "b".into()], Some(2));
        assert_eq!(s.selected_index(), Some(0));
        s.set_options(Vec::new(), Some(0));
        assert_eq!(s.selected_index(), None);
        assert!(s.selected_item().is_none());
    }

    #[test]
    fn single_step_wraps() {
        let mut s = state(7);
        assert!(s.move_selection(-1, true));
        assert_eq!(s.selected_index(), Some(6));
        assert!(s.move_selection(1, true));
        assert_eq!(s.selected_index(), Some(0));
    }

    #[test]
    fn fast_step_clamps() {
        let mut s = state(7);
        s.select(3);
        s.move_selection(-FAST_STEP, false);
        assert_eq!(s.selected_index(), Some(0));
        s.move_selection(FAST_STEP, false);
        assert_eq!(s.selected_index(), Some(6));
        assert!(!s.move_selection(FAST_STEP, false));
    }

    #[test]
    fn move_on_empty_is_noop() {
        let mut s = state(0);
        assert!(!s.move_selection(1, true));
        assert_eq!(s.selected_index(), None);
    }

    #[test]
    fn window_shifts_back_near_end() {
        let mut s = state(100);
        s.select(95);
        assert_eq!(s.visible_range(10), 90..100);
        let out = s.render(10, None);
        let r = rows(&out);
        assert_eq!(r.len(), 10);
        assert_eq!(r[0], TRUNCATED);
        assert_eq!(r[5], "> item 95");
        assert_eq!(r[9], "  item 99");
    }

    #[test]
    fn window_centres_on_selection() {
        let mut s = state(100);
        s.select(50);
        assert_eq!(s.visible_range(10), 45..55);
        let out = s.render(10, None);
        let r = rows(&out);
        assert_eq!(r.first(), Some(&TRUNCATED));
        assert_eq!(r.last(), Some(&TRUNCATED));
        assert_eq!(r[5], "> item 50");
    }

    #[test]
    fn window_at_start_has_no_leading_marker() {
        let s = state(100);
        assert_eq!(s.visible_range(5), 0..5);
        let out = s.render(5, None);
        let r = rows(&out);
        assert_eq!(r[0], "> item 0");
        assert_eq!(r[4], TRUNCATED);
    }

    #[test]
    fn short_list_fits_without_markers() {
        let mut s = state(3);
        s.select(2);
        let out = s.render(10, None);
        assert_eq!(out, "Title\n\n  item 0\n  item 1\n> item 2");
    }

    #[test]
    fn empty_renders_title_only() {
        let s = state(0);
        assert_eq!(s.render(10, Some("[loading...]")), "Title");
    }

    #[test]
    fn zero_lines_renders_title_only() {
        let s = state(2);
        assert_eq!(s.render(0, None), "Title");
        assert!(s.visible_range(0).is_empty());
    }

    #[test]
    fn prefix_only_on_selected_row() {
        let mut s = state(3);
        s.select(1);
        let out = s.render(10, Some("[loading...]"));
        let r = rows(&out);
        assert_eq!(r, ["  item 0", "> [loading...] item 1", "  item 2"]);
        assert_eq!(s.items()[1].text, "item 1");
    }

    #[test]
    fn refresh_keeps_selected_text() {
        let mut s: MenuState = MenuState::new("t");
        s.set_options(vec!["a".into(), "b".into(), "c".into()], Some(2));
        s.refresh_options(vec!["x".into(), "c".into(), "a".into()]);
        assert_eq!(s.selected_index(), Some(1));

        s.refresh_options(vec!["only".into()]);
        assert_eq!(s.selected_index(), Some(0));
    }
}
