//! src/screens/bookmark_list.rs
//! Bookmark picker: a letter (or `Enter` on the highlighted row) jumps to that
//! directory, `Esc` or an unused letter closes the picker.

use std::path::PathBuf;

use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use spider_screen::{EventResult, Input, Screen, ScreenContext};
use tracing::debug;

use crate::{fs::bookmarks, view::theme};

pub struct BookmarkList {
    dirs: Vec<PathBuf>,
    list_state: ListState,
}

impl BookmarkList {
    pub const NAME: &'static str = "bookmarks";

    pub fn new(dirs: Vec<PathBuf>) -> Self {
        let list_state = ListState::default().with_selected((!dirs.is_empty()).then_some(0));
        Self { dirs, list_state }
    }

    fn jump(&self, index: usize, ctx: &mut ScreenContext) {
        if let Some(dir) = self.dirs.get(index) {
            debug!(dir = %dir.display(), "Jumping to bookmark");
            ctx.set_cwd(dir.clone());
        }
        ctx.pop();
    }
}

impl Screen for BookmarkList {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn update(&mut self, input: &Input, ctx: &mut ScreenContext) -> EventResult {
        let count = self.dirs.len();

        if let Some(c) = input.as_char() {
            match (c as usize).checked_sub('a' as usize) {
                Some(index) if c.is_ascii_lowercase() => self.jump(index, ctx),
                _ => ctx.pop(),
            }
            return EventResult::Consumed;
        }

        match input.key_code() {
            Some(KeyCode::Esc) => ctx.pop(),
            Some(KeyCode::Enter) => {
                let selected = self.list_state.selected().unwrap_or(count);
                self.jump(selected, ctx);
            }
            Some(KeyCode::Down) if count > 0 => {
                let next = self.list_state.selected().map_or(0, |i| (i + 1) % count);
                self.list_state.select(Some(next));
            }
            Some(KeyCode::Up) if count > 0 => {
                let prev = self
                    .list_state
                    .selected()
                    .map_or(0, |i| i.checked_sub(1).unwrap_or(count - 1));
                self.list_state.select(Some(prev));
            }
            _ => return EventResult::Ignored,
        }
        EventResult::Consumed
    }

    fn draw(&mut self, frame: &mut Frame<'_>, _ctx: &ScreenContext) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Select bookmark ")
            .title_style(theme::title_style())
            .border_style(theme::border_style())
            .style(theme::base_style());

        if self.dirs.is_empty() {
            frame.render_widget(Paragraph::new("No bookmarks").block(block), frame.area());
            return;
        }

        let items: Vec<ListItem> = self
            .dirs
            .iter()
            .enumerate()
            .map(|(index, dir)| {
                let letter = bookmarks::letter(index).unwrap_or(' ');
                ListItem::new(Line::from(vec![
                    Span::styled(letter.to_string(), theme::header_style()),
                    Span::styled(format!("  {}", dir.display()), theme::directory_style()),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(block)
            .highlight_style(theme::highlight_style());
        frame.render_stateful_widget(list, frame.area(), &mut self.list_state);
    }
}
