//! src/view/theme.rs
//! ============================================================================
//! # Catppuccin Mocha Theme Color Palette
//!
//! Color constants and the handful of composed styles the built-in screens
//! share. Colors are from the Catppuccin Mocha palette:
//! https://github.com/catppuccin/catppuccin

use ratatui::style::{Color, Modifier, Style};

pub const BACKGROUND: Color = Color::Rgb(30, 30, 46); // Base
pub const CURRENT_LINE: Color = Color::Rgb(69, 71, 90); // Surface1
pub const FOREGROUND: Color = Color::Rgb(205, 214, 244); // Text
pub const COMMENT: Color = Color::Rgb(127, 132, 156); // Overlay1
pub const CYAN: Color = Color::Rgb(137, 220, 235); // Sky
pub const GREEN: Color = Color::Rgb(166, 227, 161); // Green
pub const ORANGE: Color = Color::Rgb(250, 179, 135); // Peach
pub const PINK: Color = Color::Rgb(245, 194, 231); // Pink
pub const PURPLE: Color = Color::Rgb(203, 166, 247); // Mauve
pub const RED: Color = Color::Rgb(243, 139, 168); // Red
pub const YELLOW: Color = Color::Rgb(249, 226, 175); // Yellow

pub const FOLDER_ICON: &str = "";
pub const FILE_ICON: &str = "";
pub const SYMLINK_ICON: &str = "";

pub fn base_style() -> Style {
    Style::default().bg(BACKGROUND).fg(FOREGROUND)
}

pub fn border_style() -> Style {
    Style::default().fg(COMMENT)
}

pub fn title_style() -> Style {
    Style::default().fg(PURPLE).add_modifier(Modifier::BOLD)
}

pub fn header_style() -> Style {
    Style::default().fg(YELLOW).add_modifier(Modifier::BOLD)
}

pub fn highlight_style() -> Style {
    Style::default().bg(CURRENT_LINE).add_modifier(Modifier::BOLD)
}

pub fn directory_style() -> Style {
    Style::default().fg(CYAN)
}

pub fn symlink_style() -> Style {
    Style::default().fg(PINK)
}

pub fn executable_style() -> Style {
    Style::default().fg(GREEN)
}

pub fn marked_style() -> Style {
    Style::default().fg(ORANGE).add_modifier(Modifier::BOLD)
}

pub fn prompt_style() -> Style {
    Style::default().bg(CURRENT_LINE).fg(YELLOW)
}

pub fn error_style() -> Style {
    Style::default().bg(BACKGROUND).fg(RED)
}

pub fn status_style() -> Style {
    Style::default().bg(CURRENT_LINE).fg(FOREGROUND)
}
