//! src/controller/input.rs
//! Input sources for the dispatch loop.

use std::time::Duration;

use crossterm::event::{self, Event as TerminalEvent, KeyEventKind};
use spider_screen::Input;
use tracing::trace;

use crate::error::{AppError, AppResult};

/// Yields one [`Input`] per loop iteration.
pub trait InputSource {
    /// Block for at most `timeout`; `Input::Tick` when nothing arrived.
    /// `None` ends the session.
    fn next_input(&mut self, timeout: Duration) -> AppResult<Option<Input>>;
}

/// Reads key presses from the controlling terminal.
///
/// Polling is synchronous so no background reader competes with a foreground
/// child process for keystrokes.
#[derive(Debug, Default)]
pub struct CrosstermInput;

impl InputSource for CrosstermInput {
    fn next_input(&mut self, timeout: Duration) -> AppResult<Option<Input>> {
        if !event::poll(timeout).map_err(|e| AppError::Terminal(e.to_string()))? {
            return Ok(Some(Input::Tick));
        }

        let input = match event::read().map_err(|e| AppError::Terminal(e.to_string()))? {
            TerminalEvent::Key(key) if key.kind == KeyEventKind::Press => Input::Key(key),
            other => {
                trace!(event = ?other, "Ignoring terminal event");
                Input::Tick
            }
        };
        Ok(Some(input))
    }
}

/// Replays a fixed sequence of inputs, then ends the session.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct ScriptedInput {
    inputs: std::collections::VecDeque<Input>,
}

#[cfg(test)]
impl ScriptedInput {
    pub fn new(inputs: impl IntoIterator<Item = Input>) -> Self {
        Self {
            inputs: inputs.into_iter().collect(),
        }
    }
}

#[cfg(test)]
impl InputSource for ScriptedInput {
    fn next_input(&mut self, _timeout: Duration) -> AppResult<Option<Input>> {
        Ok(self.inputs.pop_front())
    }
}
