//! src/screens/prompt.rs
//! ============================================================================
//! # Inline prompt on the bottom row
//!
//! Two flavors: a line editor (`Esc` cancels, `Enter` submits, `Backspace`
//! deletes) and a single-key confirmation where only `y`/`Y` means yes.

use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Clear, Paragraph},
};
use spider_screen::Input;

use crate::view::{status_line, theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptMode {
    Line,
    Confirm,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptEvent {
    /// The buffer changed; the prompt stays open.
    Edited,
    Submitted(String),
    Confirmed(bool),
    Cancelled,
    /// Nothing happened (ticks, unhandled keys).
    Idle,
}

#[derive(Debug, Clone)]
pub struct Prompt {
    message: String,
    buffer: String,
    mode: PromptMode,
}

impl Prompt {
    pub fn line(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            buffer: String::new(),
            mode: PromptMode::Line,
        }
    }

    pub fn confirm(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            buffer: String::new(),
            mode: PromptMode::Confirm,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn handle(&mut self, input: &Input) -> PromptEvent {
        let Some(code) = input.key_code() else {
            return PromptEvent::Idle;
        };

        if self.mode == PromptMode::Confirm {
            return PromptEvent::Confirmed(matches!(input.as_char(), Some('y' | 'Y')));
        }

        match code {
            KeyCode::Esc => PromptEvent::Cancelled,
            KeyCode::Enter => PromptEvent::Submitted(std::mem::take(&mut self.buffer)),
            KeyCode::Backspace => {
                self.buffer.pop();
                PromptEvent::Edited
            }
            _ => match input.as_char() {
                Some('\t') | None => PromptEvent::Idle,
                Some(c) => {
                    self.buffer.push(c);
                    PromptEvent::Edited
                }
            },
        }
    }

    pub fn render(&self, frame: &mut Frame<'_>) {
        let row = status_line::area(frame.area());
        let text = format!("{}{}", self.message, self.buffer);
        let width = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);

        frame.render_widget(Clear, row);
        frame.render_widget(Paragraph::new(text).style(theme::prompt_style()), row);
        frame.set_cursor_position((row.x.saturating_add(width).min(row.right().saturating_sub(1)), row.y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(prompt: &mut Prompt, text: &str) {
        for c in text.chars() {
            assert_eq!(prompt.handle(&Input::char(c)), PromptEvent::Edited);
        }
    }

    #[test]
    fn test_line_editing() {
        let mut prompt = Prompt::line("Name of file:");
        feed(&mut prompt, "notes.tx");
        assert_eq!(prompt.handle(&Input::code(KeyCode::Backspace)), PromptEvent::Edited);
        assert_eq!(prompt.handle(&Input::code(KeyCode::Backspace)), PromptEvent::Edited);
        assert_eq!(prompt.buffer(), "notes.");
        feed(&mut prompt, "md");
        assert_eq!(prompt.handle(&Input::Tick), PromptEvent::Idle);
        assert_eq!(prompt.handle(&Input::char('\t')), PromptEvent::Idle);

        assert_eq!(
            prompt.handle(&Input::code(KeyCode::Enter)),
            PromptEvent::Submitted("notes.md".to_string())
        );
    }

    #[test]
    fn test_escape_cancels() {
        let mut prompt = Prompt::line("New name:");
        feed(&mut prompt, "x");
        assert_eq!(prompt.handle(&Input::code(KeyCode::Esc)), PromptEvent::Cancelled);
    }

    #[test]
    fn test_confirmation_accepts_only_y() {
        let mut prompt = Prompt::confirm("Delete a?(Y/N):");
        assert_eq!(prompt.handle(&Input::Tick), PromptEvent::Idle);
        assert_eq!(prompt.handle(&Input::char('Y')), PromptEvent::Confirmed(true));
        assert_eq!(prompt.handle(&Input::char('y')), PromptEvent::Confirmed(true));
        assert_eq!(prompt.handle(&Input::char('n')), PromptEvent::Confirmed(false));
        assert_eq!(prompt.handle(&Input::code(KeyCode::Enter)), PromptEvent::Confirmed(false));
    }
}
