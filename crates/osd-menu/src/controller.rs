//! The menu state machine: lifecycle, action routing, message overlays,
//! redraw and auto-close.

use std::convert::Infallible;
use std::time::Duration;

use osd_core::{Action, Host, Msg, TimerId};

use crate::config::{MenuConfig, Settings};
use crate::error::{DispatchError, MenuError};
use crate::idle::IdleTimer;
use crate::keys::KeyBindingTable;
use crate::state::{MenuItem, MenuState, FAST_STEP};

// ---------------------------------------------------------------------------
// MenuHandler
// ---------------------------------------------------------------------------

/// Consumer callbacks.
///
/// Each callback receives the controller and may call back into it
/// (`set_options`, `show_message`, `hide`, ...). Errors are returned from
/// the [`MenuController`] call that triggered the callback.
pub trait MenuHandler<H: Host, T = ()> {
    type Error;

    /// After the menu opened, before its first render.
    fn on_show(&mut self, _menu: &mut MenuController<H, T>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// After the menu closed and released the host surface.
    fn on_hide(&mut self, _menu: &mut MenuController<H, T>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_left(&mut self, _menu: &mut MenuController<H, T>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_right(&mut self, _menu: &mut MenuController<H, T>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_open(&mut self, _menu: &mut MenuController<H, T>) -> Result<(), Self::Error> {
        Ok(())
    }

    fn on_undo(&mut self, _menu: &mut MenuController<H, T>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A menu with no callbacks.
impl<H: Host, T> MenuHandler<H, T> for () {
    type Error = Infallible;
}

// ---------------------------------------------------------------------------
// Status / MenuAction
// ---------------------------------------------------------------------------

/// Public view of the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuStatus {
    Closed,
    Open,
    OpenWithMessage,
}

/// What a dispatched action ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Nothing: the menu is closed, or the event was not for the menu.
    Pass,
    /// A message overlay is up; only Close gets through.
    Blocked,
    /// The selection moved (or hit a boundary).
    Move,
    /// A consumer callback ran.
    Invoke,
    /// The key listing was shown.
    Help,
    /// The menu was closed.
    Quit,
}

#[derive(Debug, Clone)]
struct Overlay {
    text: String,
    timer: TimerId,
    until: Duration,
}

#[derive(Debug, Clone)]
enum Lifecycle {
    Closed,
    Open,
    Message(Overlay),
}

// ---------------------------------------------------------------------------
// MenuController
// ---------------------------------------------------------------------------

/// An interactive on-screen menu bound to a [`Host`].
///
/// The host delivers key actions and timer expiries through
/// [`update`](Self::update); the controller mutates its [`MenuState`], runs
/// consumer callbacks and writes the resulting text back to the host.
pub struct MenuController<H: Host, T = ()> {
    host: H,
    settings: Settings,
    state: MenuState<T>,
    keys: KeyBindingTable,
    idle: IdleTimer,
    lifecycle: Lifecycle,
    saved_font_size: Option<f64>,
    redraw_timer: Option<TimerId>,
    selection_prefix: Option<String>,
}

impl<H: Host, T> MenuController<H, T> {
    /// Validate `config` and build a closed menu.
    pub fn new(host: H, config: MenuConfig) -> Result<Self, MenuError> {
        let settings = config.validate()?;
        let keys = KeyBindingTable::from_overrides(&config.key_rebindings)?;
        let idle = IdleTimer::new(host.now());
        Ok(Self {
            host,
            settings,
            state: MenuState::new(config.title),
            keys,
            idle,
            lifecycle: Lifecycle::Closed,
            saved_font_size: None,
            redraw_timer: None,
            selection_prefix: None,
        })
    }

    // -- lifecycle --

    /// Open the menu: override the font size, bind keys, start the redraw
    /// tick, run [`MenuHandler::on_show`] and render. Does nothing if
    /// already open.
    pub fn show<Hd: MenuHandler<H, T>>(
        &mut self,
        handler: &mut Hd,
    ) -> Result<(), DispatchError<Hd::Error>> {
        if self.is_open() {
            return Ok(());
        }
        log::debug!("menu \u{201c}{}\u{201d} opening", self.state.title());

        self.saved_font_size = Some(self.host.font_size());
        self.host.set_font_size(self.settings.font_size);
        for (action, keys) in self.keys.iter() {
            for key in keys {
                self.host.bind_key(key, action, action.repeatable());
            }
        }
        if let Some(old) = self.redraw_timer.take() {
            self.host.cancel_timer(old);
        }
        self.redraw_timer = Some(self.host.schedule_repeating(self.settings.redraw_interval));
        self.lifecycle = Lifecycle::Open;
        let now = self.host.now();
        self.idle.force_enable(now);

        handler.on_show(self).map_err(DispatchError::Handler)?;
        self.render_menu();
        Ok(())
    }

    /// Close the menu, release the host surface and run
    /// [`MenuHandler::on_hide`]. Does nothing if already closed.
    pub fn hide<Hd: MenuHandler<H, T>>(
        &mut self,
        handler: &mut Hd,
    ) -> Result<(), DispatchError<Hd::Error>> {
        if !self.is_open() {
            return Ok(());
        }
        log::debug!("menu \u{201c}{}\u{201d} closing", self.state.title());
        self.release();
        handler.on_hide(self).map_err(DispatchError::Handler)
    }

    pub fn is_open(&self) -> bool {
        !matches!(self.lifecycle, Lifecycle::Closed)
    }

    pub fn status(&self) -> MenuStatus {
        match self.lifecycle {
            Lifecycle::Closed => MenuStatus::Closed,
            Lifecycle::Open => MenuStatus::Open,
            Lifecycle::Message(_) => MenuStatus::OpenWithMessage,
        }
    }

    // -- events --

    /// Handle one host event.
    pub fn update<Hd: MenuHandler<H, T>>(
        &mut self,
        msg: Msg,
        handler: &mut Hd,
    ) -> Result<MenuAction, DispatchError<Hd::Error>> {
        match msg {
            Msg::Action(action) => self.dispatch(action, handler),
            Msg::Timer(id) if self.redraw_timer == Some(id) => {
                self.periodic_tick(handler)?;
                Ok(MenuAction::Pass)
            }
            Msg::Timer(id) => {
                let overlay_expired =
                    matches!(&self.lifecycle, Lifecycle::Message(o) if o.timer == id);
                if overlay_expired {
                    self.stop_message();
                } else {
                    log::trace!("ignoring stale timer {id:?}");
                }
                Ok(MenuAction::Pass)
            }
        }
    }

    /// Route an action by its configuration name.
    pub fn dispatch_named<Hd: MenuHandler<H, T>>(
        &mut self,
        name: &str,
        handler: &mut Hd,
    ) -> Result<MenuAction, DispatchError<Hd::Error>> {
        let action = name.parse::<Action>()?;
        self.dispatch(action, handler)
    }

    /// Route a logical key action.
    pub fn dispatch<Hd: MenuHandler<H, T>>(
        &mut self,
        action: Action,
        handler: &mut Hd,
    ) -> Result<MenuAction, DispatchError<Hd::Error>> {
        if !self.is_open() {
            return Ok(MenuAction::Pass);
        }
        self.expire_message();
        if matches!(self.lifecycle, Lifecycle::Message(_)) && action != Action::Close {
            log::trace!("{action} blocked by message overlay");
            return Ok(MenuAction::Blocked);
        }
        log::trace!("dispatching {action}");

        let result = match action {
            Action::Up => self.step(-1, true),
            Action::Down => self.step(1, true),
            Action::FastUp => self.step(-FAST_STEP, false),
            Action::FastDown => self.step(FAST_STEP, false),
            Action::Left | Action::Right | Action::Open | Action::Undo => {
                self.idle.soft_disable();
                let outcome = match action {
                    Action::Left => handler.on_left(self),
                    Action::Right => handler.on_right(self),
                    Action::Open => handler.on_open(self),
                    _ => handler.on_undo(self),
                };
                if outcome.is_err() {
                    // A failed callback must not leave the idle clock suspended.
                    let now = self.host.now();
                    self.idle.touch(now);
                }
                outcome.map_err(DispatchError::Handler)?;
                MenuAction::Invoke
            }
            Action::Help => {
                let text = format!("Key bindings\n\n{}", self.keys.help_text());
                self.show_message(&text, self.settings.help_duration, false);
                MenuAction::Help
            }
            Action::Close => {
                self.hide(handler)?;
                MenuAction::Quit
            }
        };

        let now = self.host.now();
        self.idle.touch(now);
        Ok(result)
    }

    /// Redraw the active text and check for idle expiry. Called on every
    /// redraw-timer expiry; may also be driven directly.
    pub fn periodic_tick<Hd: MenuHandler<H, T>>(
        &mut self,
        handler: &mut Hd,
    ) -> Result<(), DispatchError<Hd::Error>> {
        if !self.is_open() {
            return Ok(());
        }
        self.expire_message();
        let now = self.host.now();
        if let Lifecycle::Message(overlay) = &self.lifecycle {
            let remaining = overlay.until.saturating_sub(now);
            self.host.show_text(&overlay.text, remaining);
        } else {
            self.render_menu();
        }
        if self.idle.check_expired(self.settings.auto_close_delay, now) {
            log::debug!("menu idle for {:?}; closing", self.settings.auto_close_delay);
            self.hide(handler)?;
        }
        Ok(())
    }

    // -- message overlay --

    /// Show `text` in place of the menu for `duration`. While it is up only
    /// Close is accepted and idle auto-close is suspended. Replaces any
    /// message already showing. Ignored while the menu is closed.
    pub fn show_message(&mut self, text: &str, duration: Duration, clear_selection_prefix: bool) {
        if !self.is_open() {
            log::debug!("dropping message while closed: {text}");
            return;
        }
        if let Lifecycle::Message(old) = &self.lifecycle {
            self.host.cancel_timer(old.timer);
        }
        if clear_selection_prefix {
            self.selection_prefix = None;
        }
        log::debug!("showing message for {duration:?}");
        let timer = self.host.schedule_once(duration);
        let until = self.host.now() + duration;
        self.idle.hard_disable();
        self.host.show_text(text, duration);
        self.lifecycle = Lifecycle::Message(Overlay {
            text: text.to_string(),
            timer,
            until,
        });
    }

    /// Drop the message overlay, if any, and go back to the menu.
    pub fn stop_message(&mut self) {
        let Lifecycle::Message(overlay) = &self.lifecycle else {
            return;
        };
        self.host.cancel_timer(overlay.timer);
        self.lifecycle = Lifecycle::Open;
        let now = self.host.now();
        self.idle.force_enable(now);
        self.render_menu();
    }

    // -- content --

    /// Replace the options; see [`MenuState::set_options`].
    pub fn set_options(&mut self, items: Vec<MenuItem<T>>, initial: Option<usize>) {
        self.state.set_options(items, initial);
        self.render_menu();
    }

    /// Replace the options, keeping the selected entry where possible; see
    /// [`MenuState::refresh_options`].
    pub fn refresh_options(&mut self, items: Vec<MenuItem<T>>) {
        self.state.refresh_options(items);
        self.render_menu();
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.state.set_title(title);
        self.render_menu();
    }

    /// Select `index` if it is in range.
    pub fn select(&mut self, index: usize) -> bool {
        let ok = self.state.select(index);
        self.render_menu();
        ok
    }

    /// Set or clear the transient status drawn before the selected row.
    pub fn set_selection_prefix(&mut self, prefix: Option<String>) {
        self.selection_prefix = prefix;
        self.render_menu();
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.state.selected_index()
    }

    pub fn selected_item(&self) -> Option<&MenuItem<T>> {
        self.state.selected_item()
    }

    pub fn state(&self) -> &MenuState<T> {
        &self.state
    }

    pub fn keys(&self) -> &KeyBindingTable {
        &self.keys
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Write the menu to the host now. Does nothing while closed or while a
    /// message is showing.
    pub fn render_menu(&mut self) {
        if !matches!(self.lifecycle, Lifecycle::Open) {
            return;
        }
        let text = self.state.render(
            self.settings.max_visible_lines,
            self.selection_prefix.as_deref(),
        );
        // Outlive the next redraw tick so the menu never flickers off.
        self.host.show_text(&text, self.settings.redraw_interval * 2);
    }

    // -- private helpers --

    fn step(&mut self, delta: isize, wrap: bool) -> MenuAction {
        self.state.move_selection(delta, wrap);
        self.render_menu();
        MenuAction::Move
    }

    /// Revert an overlay whose deadline passed without its timer being
    /// delivered yet.
    fn expire_message(&mut self) {
        let now = self.host.now();
        if matches!(&self.lifecycle, Lifecycle::Message(o) if now >= o.until) {
            self.stop_message();
        }
    }

    /// Undo everything `show` acquired. Safe to call on every exit path.
    fn release(&mut self) {
        if let Lifecycle::Message(overlay) = &self.lifecycle {
            self.host.cancel_timer(overlay.timer);
        }
        self.lifecycle = Lifecycle::Closed;
        if let Some(id) = self.redraw_timer.take() {
            self.host.cancel_timer(id);
        }
        for (_, keys) in self.keys.iter() {
            for key in keys {
                self.host.unbind_key(key);
            }
        }
        if let Some(size) = self.saved_font_size.take() {
            self.host.set_font_size(size);
        }
        self.host.clear_text();
    }
}

impl<H: Host, T> Drop for MenuController<H, T> {
    fn drop(&mut self) {
        if self.is_open() {
            self.release();
        }
    }
}
