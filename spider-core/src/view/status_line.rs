//! src/view/status_line.rs
//! Transient message on the last terminal row.

use ratatui::{
    prelude::*,
    widgets::{Clear, Paragraph, Widget},
};
use spider_screen::ScreenContext;

use crate::view::theme;

/// The bottom row of `area`.
pub fn area(area: Rect) -> Rect {
    Rect {
        y: area.bottom().saturating_sub(1),
        height: area.height.min(1),
        ..area
    }
}

/// Draw the pending status message, if any, over the last row.
pub fn render(frame: &mut Frame<'_>, ctx: &ScreenContext) {
    let Some(message) = ctx.status() else {
        return;
    };
    let row = area(frame.area());
    Clear.render(row, frame.buffer_mut());
    Paragraph::new(message.to_string())
        .style(theme::error_style())
        .alignment(Alignment::Left)
        .render(row, frame.buffer_mut());
}
