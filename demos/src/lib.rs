//! Playlist picker: a menu consumer shared by the terminal demo and tests.
//!
//! Demonstrates: option lists carrying data, selection preservation on
//! refresh, non-repeating shuffle jumps (Right / Left), bounded undo, and
//! transient status messages.

use std::convert::Infallible;
use std::time::Duration;

use osd_core::Host;
use osd_menu::{MenuController, MenuHandler, MenuItem};
use osd_nav::{HistoryStack, ShuffleCycle};
use rand::Rng;
use rand::rngs::ThreadRng;

/// How many previously played entries Undo remembers.
pub const HISTORY_SIZE: usize = 50;
const STATUS_DURATION: Duration = Duration::from_millis(1500);
const PLAYING_MARK: &str = "\u{25b6} ";

/// A playlist whose menu plays the selected entry on Open, jumps to a
/// random unplayed entry on Right (back along the same shuffle on Left) and
/// returns to the previously played entry on Undo.
pub struct PlaylistPicker<R: Rng = ThreadRng> {
    entries: Vec<String>,
    playing: Option<usize>,
    cycle: ShuffleCycle<R>,
    history: HistoryStack<usize>,
}

impl PlaylistPicker<ThreadRng> {
    pub fn new(entries: Vec<String>) -> Self {
        Self::with_rng(entries, rand::rng())
    }
}

impl<R: Rng> PlaylistPicker<R> {
    pub fn with_rng(entries: Vec<String>, rng: R) -> Self {
        Self {
            entries,
            playing: None,
            cycle: ShuffleCycle::with_rng(rng),
            history: HistoryStack::bounded(HISTORY_SIZE).unwrap_or_default(),
        }
    }

    /// The index of the entry playing now.
    pub fn playing(&self) -> Option<usize> {
        self.playing
    }

    pub fn history(&self) -> &HistoryStack<usize> {
        &self.history
    }

    /// Menu rows; each carries its playlist index.
    pub fn items(&self) -> Vec<MenuItem<usize>> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let text = if self.playing == Some(i) {
                    format!("{PLAYING_MARK}{name}")
                } else {
                    name.clone()
                };
                MenuItem::with_data(text, i)
            })
            .collect()
    }

    /// Replace the playlist. Undo history refers to positions, so it is
    /// dropped whenever the length changes.
    pub fn set_entries<H: Host>(
        &mut self,
        menu: &mut MenuController<H, usize>,
        entries: Vec<String>,
    ) {
        if entries.len() != self.entries.len() {
            self.history.clear();
        }
        self.entries = entries;
        self.playing = self.playing.filter(|&i| i < self.entries.len());
        let selected = menu.selected_index();
        menu.set_options(self.items(), selected);
    }

    fn play<H: Host>(&mut self, menu: &mut MenuController<H, usize>, index: usize, remember: bool) {
        if remember {
            if let Some(prev) = self.playing.filter(|&p| p != index) {
                self.history.push(prev);
            }
        }
        self.playing = Some(index);
        menu.set_options(self.items(), Some(index));
        let text = format!("Playing: {}", self.entries[index]);
        menu.show_message(&text, STATUS_DURATION, true);
    }

    fn jump<H: Host>(&mut self, menu: &mut MenuController<H, usize>, forward: bool) {
        let Some(current) = menu.selected_index() else {
            menu.show_message("Playlist is empty", STATUS_DURATION, false);
            return;
        };
        let len = self.entries.len();
        let target = if forward {
            self.cycle.next_or_rebuild(current, len)
        } else {
            self.cycle.previous_or_rebuild(current, len)
        };
        match target {
            Ok(index) => self.play(menu, index, true),
            Err(e) => {
                log::warn!("shuffle jump from {current} failed: {e}");
                menu.show_message(&format!("Shuffle failed: {e}"), STATUS_DURATION, false);
            }
        }
    }
}

impl<H: Host, R: Rng> MenuHandler<H, usize> for PlaylistPicker<R> {
    type Error = Infallible;

    fn on_show(&mut self, menu: &mut MenuController<H, usize>) -> Result<(), Infallible> {
        menu.set_options(self.items(), self.playing);
        Ok(())
    }

    fn on_open(&mut self, menu: &mut MenuController<H, usize>) -> Result<(), Infallible> {
        match menu.selected_item().map(|item| item.data) {
            Some(index) => self.play(menu, index, true),
            None => menu.show_message("Playlist is empty", STATUS_DURATION, false),
        }
        Ok(())
    }

    fn on_right(&mut self, menu: &mut MenuController<H, usize>) -> Result<(), Infallible> {
        self.jump(menu, true);
        Ok(())
    }

    fn on_left(&mut self, menu: &mut MenuController<H, usize>) -> Result<(), Infallible> {
        self.jump(menu, false);
        Ok(())
    }

    fn on_undo(&mut self, menu: &mut MenuController<H, usize>) -> Result<(), Infallible> {
        match self.history.pop() {
            Some(index) if index < self.entries.len() => self.play(menu, index, false),
            _ => menu.show_message("Nothing to undo", STATUS_DURATION, false),
        }
        Ok(())
    }
}
