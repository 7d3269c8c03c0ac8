//! src/screens/git_status.rs
//! Repository status overlay: one line per changed path.

use std::{path::Path, process::Command};

use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use spider_screen::{EventResult, Input, Screen, ScreenContext};
use tracing::{debug, warn};

use crate::view::theme;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub code: char,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Stale,
    Loaded(Vec<StatusLine>),
    Failed(String),
}

pub struct GitStatus {
    state: State,
    list_state: ListState,
}

impl GitStatus {
    pub const NAME: &'static str = "git-status";

    pub fn new() -> Self {
        Self {
            state: State::Stale,
            list_state: ListState::default(),
        }
    }

    fn ensure_loaded(&mut self, cwd: &Path) {
        if self.state == State::Stale {
            self.state = load(cwd);
            let has_lines = matches!(&self.state, State::Loaded(lines) if !lines.is_empty());
            self.list_state.select(has_lines.then_some(0));
        }
    }

    fn line_count(&self) -> usize {
        match &self.state {
            State::Loaded(lines) => lines.len(),
            _ => 0,
        }
    }
}

impl Default for GitStatus {
    fn default() -> Self {
        Self::new()
    }
}

fn load(cwd: &Path) -> State {
    let output = Command::new("git")
        .args(["status", "--porcelain"])
        .current_dir(cwd)
        .output();

    match output {
        Ok(output) if output.status.success() => {
            let lines = parse_porcelain(&String::from_utf8_lossy(&output.stdout));
            debug!(count = lines.len(), "Loaded repository status");
            State::Loaded(lines)
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            State::Failed(format!("Could not enter git mode, error: {}", stderr.trim()))
        }
        Err(e) => {
            warn!("Failed to run git: {e}");
            State::Failed(format!("Could not enter git mode, error: {e}"))
        }
    }
}

/// Parse `git status --porcelain` output. Ignored entries are dropped.
pub fn parse_porcelain(text: &str) -> Vec<StatusLine> {
    text.lines()
        .filter_map(|line| {
            let mut chars = line.chars();
            let index = chars.next()?;
            let worktree = chars.next()?;
            let path = line.get(3..)?.to_string();

            let code = match (index, worktree) {
                ('!', '!') => return None,
                ('?', '?') => '?',
                (' ', flag) | (flag, _) => status_letter(flag),
            };
            Some(StatusLine { code, path })
        })
        .collect()
}

fn status_letter(flag: char) -> char {
    match flag {
        'A' => 'A',
        'M' => 'M',
        'D' => 'D',
        'T' => 'T',
        'R' | 'C' => 'R',
        _ => 'X',
    }
}

fn code_style(code: char) -> Style {
    match code {
        'A' => Style::default().fg(theme::GREEN),
        'M' | 'T' => Style::default().fg(theme::YELLOW),
        'D' => Style::default().fg(theme::RED),
        'R' => Style::default().fg(theme::CYAN),
        '?' => Style::default().fg(theme::COMMENT),
        _ => Style::default().fg(theme::PINK),
    }
}

impl Screen for GitStatus {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(&mut self, input: &Input, ctx: &mut ScreenContext) -> EventResult {
        self.ensure_loaded(ctx.cwd());

        if input.as_char() == Some('q') || input.key_code() == Some(KeyCode::Esc) {
            ctx.pop();
            return EventResult::Consumed;
        }

        let count = self.line_count();
        match (input.as_char(), input.key_code()) {
            (Some('j'), _) | (_, Some(KeyCode::Down)) if count > 0 => {
                let next = self.list_state.selected().map_or(0, |i| (i + 1) % count);
                self.list_state.select(Some(next));
                EventResult::Consumed
            }
            (Some('k'), _) | (_, Some(KeyCode::Up)) if count > 0 => {
                let prev = self
                    .list_state
                    .selected()
                    .map_or(0, |i| i.checked_sub(1).unwrap_or(count - 1));
                self.list_state.select(Some(prev));
                EventResult::Consumed
            }
            _ => EventResult::Ignored,
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>, ctx: &ScreenContext) {
        self.ensure_loaded(ctx.cwd());

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" git status: {} ", ctx.cwd().display()))
            .title_style(theme::title_style())
            .border_style(theme::border_style())
            .style(theme::base_style());

        match &self.state {
            State::Loaded(lines) if lines.is_empty() => {
                frame.render_widget(Paragraph::new("Working tree clean").block(block), frame.area());
            }
            State::Loaded(lines) => {
                let items: Vec<ListItem> = lines
                    .iter()
                    .map(|line| {
                        ListItem::new(Line::from(vec![
                            Span::styled(line.code.to_string(), code_style(line.code)),
                            Span::raw(format!("  {}", line.path)),
                        ]))
                    })
                    .collect();
                let list = List::new(items)
                    .block(block)
                    .highlight_style(theme::highlight_style());
                frame.render_stateful_widget(list, frame.area(), &mut self.list_state);
            }
            State::Failed(message) => {
                frame.render_widget(
                    Paragraph::new(message.as_str())
                        .style(theme::error_style())
                        .wrap(Wrap { trim: false })
                        .block(block),
                    frame.area(),
                );
            }
            State::Stale => {}
        }
    }

    fn on_activate(&mut self) {
        debug!("Repository status activated");
        self.state = State::Stale;
    }
}
