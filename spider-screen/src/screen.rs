//! src/screen.rs
//! ============================================================================
//! # Screen: the modal UI unit
//!
//! A screen owns its own state and reacts to one [`Input`] at a time. Built-in
//! screens and screens loaded from extension modules implement the same trait
//! and are indistinguishable once boxed.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use tracing::{debug, instrument};

use crate::context::ScreenContext;

/// One unit of input delivered to the active screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// A key press.
    Key(KeyEvent),

    /// The periodic tick; carries no meaning beyond "nothing was pressed".
    Tick,
}

impl Input {
    /// Plain character key without modifiers (shift is implied by the char).
    pub const fn char(c: char) -> Self {
        Self::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    /// Character key with the control modifier held.
    pub const fn ctrl(c: char) -> Self {
        Self::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    pub const fn code(code: KeyCode) -> Self {
        Self::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    /// The typed character, if this is a press of a printable key with no
    /// control or alt modifier.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Self::Key(KeyEvent {
                code: KeyCode::Char(c),
                modifiers,
                kind: KeyEventKind::Press,
                ..
            }) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => Some(*c),
            _ => None,
        }
    }

    pub fn key_code(&self) -> Option<KeyCode> {
        match self {
            Self::Key(event) => Some(event.code),
            Self::Tick => None,
        }
    }

    /// `q`, `Ctrl-D` or `Ctrl-C`: the keys that end the session unless the
    /// active screen consumes them.
    pub fn is_quit(&self) -> bool {
        match self {
            Self::Key(KeyEvent {
                code: KeyCode::Char(c),
                modifiers,
                ..
            }) => {
                if modifiers.contains(KeyModifiers::CONTROL) {
                    matches!(c, 'c' | 'd')
                } else {
                    *c == 'q' && !modifiers.contains(KeyModifiers::ALT)
                }
            }
            _ => false,
        }
    }
}

/// Whether a screen acted on an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    Consumed,
    Ignored,
}

/// A self-contained modal UI unit.
///
/// The dispatch loop only ever talks to the screen on top of the modal stack.
/// `on_activate` and `on_deactivate` are strictly paired: a screen is told it
/// is active exactly when it becomes the top, and told it is inactive before
/// anything is pushed over it and before it is destroyed.
pub trait Screen {
    /// The name of this screen for logging
    fn name(&self) -> &str;

    /// React to one input. Structural changes (push, pop, spawning processes)
    /// are requested through `ctx` and applied once this returns.
    fn update(&mut self, input: &Input, ctx: &mut ScreenContext) -> EventResult;

    /// Render the whole screen.
    fn draw(&mut self, frame: &mut Frame<'_>, ctx: &ScreenContext);

    /// Called when the screen becomes the top of the stack
    #[instrument(level = "debug", skip_all, fields(screen = self.name()))]
    fn on_activate(&mut self) {
        debug!("Screen activated");
    }

    /// Called before the screen is covered or destroyed
    #[instrument(level = "debug", skip_all, fields(screen = self.name()))]
    fn on_deactivate(&mut self) {
        debug!("Screen deactivated");
    }
}
