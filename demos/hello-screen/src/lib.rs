//! Sample extension module for spider.
//!
//! Build with `cargo build -p hello-screen` and copy the resulting shared
//! library into `~/.config/spider/plugins/`. The screen counts key presses
//! and ticks; `q` or `Esc` closes it.

use crossterm::event::KeyCode;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use spider_screen::{EventResult, Input, Screen, ScreenContext};

#[derive(Debug, Default)]
pub struct HelloScreen {
    keys: u32,
    ticks: u32,
}

impl Screen for HelloScreen {
    fn name(&self) -> &str {
        "hello"
    }

    fn update(&mut self, input: &Input, ctx: &mut ScreenContext) -> EventResult {
        match input {
            Input::Tick => {
                self.ticks += 1;
                EventResult::Ignored
            }
            _ if input.as_char() == Some('q') || input.key_code() == Some(KeyCode::Esc) => {
                ctx.pop();
                EventResult::Consumed
            }
            Input::Key(_) => {
                self.keys += 1;
                EventResult::Consumed
            }
        }
    }

    fn draw(&mut self, frame: &mut Frame<'_>, ctx: &ScreenContext) {
        let text = vec![
            Line::from(format!("Hello from an extension in {}", ctx.cwd().display())),
            Line::from(format!("keys: {}  ticks: {}", self.keys, self.ticks)),
            Line::from("press q to close"),
        ];
        let block = Block::default().borders(Borders::ALL).title(" hello ");
        frame.render_widget(Paragraph::new(text).block(block), frame.area());
    }

    fn on_activate(&mut self) {
        self.ticks = 0;
    }
}

spider_screen::export_screen!(HelloScreen::default());
