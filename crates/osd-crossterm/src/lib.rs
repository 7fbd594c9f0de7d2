//! Crossterm terminal host for the on-screen menu.
//!
//! Provides a [`TerminalHost`] that implements [`osd_core::Host`]: the text
//! surface is the terminal screen, keys are reported under the host's key
//! names (`UP`, `Shift+UP`, `PGDWN`, `ENTER`, `BS`, `ESC`, `WHEEL_UP`,
//! printable characters) and timers run off a monotonic clock.

use std::collections::HashMap;
use std::io::{self, Write};
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind},
    execute, queue,
    style::Print,
    terminal::{self, ClearType},
};

use osd_core::{Action, DEFAULT_FONT_SIZE, Host, Msg, TimerId, TimerQueue};

/// Presses of a non-repeating key closer together than this are treated as
/// terminal auto-repeat and dropped.
pub const DEFAULT_REPEAT_GUARD: Duration = Duration::from_millis(120);

/// Maps crossterm modifiers to a key-name prefix such as `Ctrl+Alt+`.
fn modifier_prefix(mods: KeyModifiers, with_shift: bool) -> String {
    let mut prefix = String::new();
    if with_shift && mods.contains(KeyModifiers::SHIFT) {
        prefix.push_str("Shift+");
    }
    if mods.contains(KeyModifiers::CONTROL) {
        prefix.push_str("Ctrl+");
    }
    if mods.contains(KeyModifiers::ALT) {
        prefix.push_str("Alt+");
    }
    if mods.contains(KeyModifiers::META) {
        prefix.push_str("Meta+");
    }
    prefix
}

/// Maps a crossterm [`KeyCode`] plus modifiers to a key name.
///
/// Shift is folded into printable characters (`A` rather than `Shift+a`)
/// and spelled out for everything else.
pub fn key_name(code: KeyCode, mods: KeyModifiers) -> Option<String> {
    let (base, is_char) = match code {
        KeyCode::Char(' ') => ("SPACE".to_string(), false),
        KeyCode::Char(c) => (c.to_string(), true),
        KeyCode::Enter => ("ENTER".to_string(), false),
        KeyCode::Esc => ("ESC".to_string(), false),
        KeyCode::Backspace => ("BS".to_string(), false),
        KeyCode::Tab => ("TAB".to_string(), false),
        KeyCode::BackTab => ("Shift+TAB".to_string(), true),
        KeyCode::Delete => ("DEL".to_string(), false),
        KeyCode::Insert => ("INS".to_string(), false),
        KeyCode::Home => ("HOME".to_string(), false),
        KeyCode::End => ("END".to_string(), false),
        KeyCode::PageUp => ("PGUP".to_string(), false),
        KeyCode::PageDown => ("PGDWN".to_string(), false),
        KeyCode::Up => ("UP".to_string(), false),
        KeyCode::Down => ("DOWN".to_string(), false),
        KeyCode::Left => ("LEFT".to_string(), false),
        KeyCode::Right => ("RIGHT".to_string(), false),
        KeyCode::F(n) => (format!("F{n}"), false),
        _ => return None,
    };
    Some(modifier_prefix(mods, !is_char) + &base)
}

/// Lines of `text` paired with their screen row. Lines past the last
/// addressable row are dropped.
fn screen_rows(text: &str) -> impl Iterator<Item = (u16, &str)> {
    text.lines()
        .enumerate()
        .map_while(|(row, line)| u16::try_from(row).ok().map(|row| (row, line)))
}

#[derive(Copy, Clone, Debug)]
struct Binding {
    action: Action,
    repeatable: bool,
}

/// A terminal-backed [`Host`].
pub struct TerminalHost {
    start: Instant,
    font_size: f64,
    mouse_enabled: bool,
    repeat_guard: Duration,
    bindings: HashMap<String, Binding>,
    timers: TimerQueue<TimerId>,
    intervals: HashMap<TimerId, Duration>,
    next_id: u64,
    /// Expiry of the text on screen, if any.
    text_until: Option<Duration>,
    last_press: Option<(String, Duration)>,
}

impl TerminalHost {
    /// Create a new host. Call [`init`](Self::init) before use.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            font_size: DEFAULT_FONT_SIZE,
            mouse_enabled: true,
            repeat_guard: DEFAULT_REPEAT_GUARD,
            bindings: HashMap::new(),
            timers: TimerQueue::new(),
            intervals: HashMap::new(),
            next_id: 0,
            text_until: None,
            last_press: None,
        }
    }

    /// Configure whether mouse wheel events are captured.
    pub fn with_mouse(mut self, enabled: bool) -> Self {
        self.mouse_enabled = enabled;
        self
    }

    /// Configure the auto-repeat suppression window for non-repeating keys.
    pub fn with_repeat_guard(mut self, guard: Duration) -> Self {
        self.repeat_guard = guard;
        self
    }

    /// Enter raw mode and the alternate screen.
    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(ClearType::All)
        )?;
        if self.mouse_enabled {
            execute!(stdout, event::EnableMouseCapture)?;
        }
        Ok(())
    }

    /// Restore the terminal.
    pub fn close(&mut self) {
        let mut stdout = io::stdout();
        if self.mouse_enabled {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }

    /// Wait up to `max_wait` (less if a timer is due sooner) and return the
    /// events that arrived, key actions first, then expired timers in
    /// deadline order.
    pub fn poll_msgs(&mut self, max_wait: Duration) -> io::Result<Vec<Msg>> {
        let now = self.now();
        let wait = self
            .timers
            .next_deadline()
            .map_or(max_wait, |d| d.saturating_sub(now).min(max_wait));

        let mut msgs = Vec::new();
        if event::poll(wait)? {
            while event::poll(Duration::ZERO)? {
                if let Some(msg) = self.translate(event::read()?) {
                    msgs.push(msg);
                }
            }
        }

        let now = self.now();
        while let Some((id, deadline)) = self.timers.pop_due(now) {
            if let Some(&interval) = self.intervals.get(&id) {
                self.timers.push(id, deadline + interval);
            }
            msgs.push(Msg::Timer(id));
        }

        if self.text_until.is_some_and(|until| now >= until) {
            self.clear_text();
        }
        Ok(msgs)
    }

    fn translate(&mut self, ev: Event) -> Option<Msg> {
        let (name, repeated) = match ev {
            Event::Key(KeyEvent {
                code,
                modifiers,
                kind,
                ..
            }) => {
                if kind == KeyEventKind::Release {
                    return None;
                }
                (key_name(code, modifiers)?, kind == KeyEventKind::Repeat)
            }
            Event::Mouse(me) => match me.kind {
                MouseEventKind::ScrollUp => ("WHEEL_UP".to_string(), false),
                MouseEventKind::ScrollDown => ("WHEEL_DOWN".to_string(), false),
                _ => return None,
            },
            _ => return None,
        };

        let now = self.now();
        let too_soon = self
            .last_press
            .as_ref()
            .is_some_and(|(last, at)| *last == name && now.saturating_sub(*at) < self.repeat_guard);
        self.last_press = Some((name.clone(), now));

        let binding = self.bindings.get(&name)?;
        if !binding.repeatable && (repeated || too_soon) {
            log::trace!("suppressing auto-repeat of {name}");
            return None;
        }
        Some(Msg::Action(binding.action))
    }

    fn draw(&self, text: &str) -> io::Result<()> {
        let mut stdout = io::stdout();
        queue!(stdout, terminal::Clear(ClearType::All))?;
        for (row, line) in screen_rows(text) {
            queue!(stdout, cursor::MoveTo(0, row), Print(line))?;
        }
        stdout.flush()
    }

    fn next_timer_id(&mut self) -> TimerId {
        self.next_id += 1;
        TimerId(self.next_id)
    }
}

impl Default for TerminalHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for TerminalHost {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    fn show_text(&mut self, text: &str, duration: Duration) {
        if let Err(e) = self.draw(text) {
            log::warn!("terminal draw failed: {e}");
        }
        self.text_until = Some(self.now() + duration);
    }

    fn clear_text(&mut self) {
        self.text_until = None;
        if let Err(e) = execute!(io::stdout(), terminal::Clear(ClearType::All)) {
            log::warn!("terminal clear failed: {e}");
        }
    }

    fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Terminals cannot change their font; the value is only recorded.
    fn set_font_size(&mut self, size: f64) {
        log::debug!("font size {} -> {size}", self.font_size);
        self.font_size = size;
    }

    fn bind_key(&mut self, key: &str, action: Action, repeatable: bool) {
        self.bindings
            .insert(key.to_string(), Binding { action, repeatable });
    }

    fn unbind_key(&mut self, key: &str) {
        self.bindings.remove(key);
    }

    fn schedule_once(&mut self, delay: Duration) -> TimerId {
        let id = self.next_timer_id();
        let deadline = self.now() + delay;
        self.timers.push(id, deadline);
        id
    }

    fn schedule_repeating(&mut self, interval: Duration) -> TimerId {
        let id = self.next_timer_id();
        self.intervals.insert(id, interval);
        let deadline = self.now() + interval;
        self.timers.push(id, deadline);
        id
    }

    fn cancel_timer(&mut self, id: TimerId) {
        self.intervals.remove(&id);
        self.timers.retain(|t| *t != id);
    }
}
