pub mod error;

pub mod config {
    pub mod token;
    pub use token::{Token, TokenKind};

    pub mod lexer;
    pub use lexer::{lex, lex_file};

    pub mod bindings;
    pub use bindings::{Binding, BindingAction, Bindings, BuiltinAction, CommandTemplate};

    pub mod interpreter;
    pub use interpreter::interpret;

    pub mod app_config;
    pub use app_config::{AppConfig, ConfigPaths};
}

pub mod controller {
    pub mod modal_stack;
    pub use modal_stack::ModalStack;

    pub mod input;
    pub use input::{CrosstermInput, InputSource};

    pub mod process;
    pub use process::{ProcessRunner, TerminalProcessRunner};

    pub mod event_loop;
    pub use event_loop::EventLoop;
}

pub mod extension {
    pub mod module;
    pub use module::{ExtensionHandle, ExtensionModule, ModuleLibrary, ModuleOpener};

    pub mod native;
    pub use native::{NativeLibrary, NativeOpener};

    pub mod registry;
    pub use registry::ExtensionRegistry;
}

pub mod fs {
    pub mod bookmarks;
    pub use bookmarks::Bookmarks;

    pub mod listing;
    pub mod operations;
}

pub mod screens {
    pub mod prompt;

    pub mod browser;
    pub use browser::Browser;

    pub mod git_status;
    pub use git_status::GitStatus;

    pub mod bookmark_list;
    pub use bookmark_list::BookmarkList;
}

pub mod view {
    pub mod theme;

    pub mod status_line;
}

pub mod logging;
pub use logging::Logger;

pub use error::{AppError, AppResult};
