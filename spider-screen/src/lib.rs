//! # spider-screen - Screen contract for the spider file browser
//!
//! Everything a screen needs to plug into the spider dispatch loop, whether it
//! is compiled into the host or loaded at runtime from an extension module.
//!
//! ## Key Features
//! - [`Screen`]: the update/draw/activate/deactivate lifecycle
//! - [`ScreenContext`]: settings, current directory and the action queue
//! - [`export_screen!`]: generates the two entry points an extension exports
//!
//! Extension modules hand the host a boxed Rust trait object, so they must be
//! built with the same compiler and the same version of this crate as the
//! host binary.

pub mod context;
pub mod export;
pub mod screen;
pub mod settings;

// Re-export main types for easy use
pub use context::{Action, ProcessMode, ProcessRequest, ScreenContext};
pub use export::{CREATE_SYMBOL, CreateFn, DESTROY_SYMBOL, DestroyFn, ScreenBox};
pub use screen::{EventResult, Input, Screen};
pub use settings::Settings;

// Used by `export_screen!` expansions in extension crates.
pub use ratatui;
pub use crossterm;
