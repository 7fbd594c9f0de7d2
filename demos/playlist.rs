//! Terminal playlist picker using crossterm.
//!
//! Run: cargo run --bin playlist -- [entry ...]
//!
//! UP/DOWN move, Shift+UP/Shift+DOWN or PGUP/PGDWN jump by ten, ENTER
//! plays, RIGHT/LEFT shuffle forward/back, BS undoes, ? lists keys, ESC
//! quits.

use std::time::Duration;

use osd_crossterm::TerminalHost;
use osd_demos::PlaylistPicker;
use osd_menu::{MenuConfig, MenuController};

fn run(host: &mut TerminalHost, entries: Vec<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = MenuConfig {
        title: "Playlist".into(),
        auto_close_delay_secs: 30.0,
        ..Default::default()
    };
    let mut menu: MenuController<&mut TerminalHost, usize> = MenuController::new(host, config)?;
    let mut picker = PlaylistPicker::new(entries);
    menu.show(&mut picker)?;
    while menu.is_open() {
        for msg in menu.host_mut().poll_msgs(Duration::from_millis(250))? {
            menu.update(msg, &mut picker)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut entries: Vec<String> = std::env::args().skip(1).collect();
    if entries.is_empty() {
        entries = (1..=40).map(|i| format!("Track {i:02}")).collect();
    }

    let mut host = TerminalHost::new();
    host.init()?;
    let result = run(&mut host, entries);
    host.close();
    result
}
