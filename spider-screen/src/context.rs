//! src/context.rs
//! ============================================================================
//! # ScreenContext: state shared between the dispatch loop and screens
//!
//! Replaces process-wide "current settings / current path" state with an
//! explicit object owned by the dispatch loop. Screens read settings and the
//! working directory from it and queue [`Action`]s; the loop applies queued
//! actions after `update` returns, so the modal stack is never mutated while a
//! screen on it is executing.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use compact_str::CompactString;
use ratatui::layout::Size;
use smallvec::SmallVec;

use crate::{screen::Screen, settings::Settings};

/// How the dispatch loop should treat a spawned child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessMode {
    /// Spawn and forget; the child manages its own lifecycle.
    Detached,

    /// Tear down the terminal, wait for the child, restore the terminal.
    Foreground,

    /// Like `Foreground`, then wait for ENTER so the user can read the output.
    ForegroundPause,
}

/// A child process a screen wants launched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRequest {
    pub program: String,
    pub args: Vec<String>,
    pub mode: ProcessMode,
}

impl ProcessRequest {
    pub fn new(program: impl Into<String>, mode: ProcessMode) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            mode,
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// `shell -c command`, run in the foreground.
    pub fn shell(shell: &str, command: impl Into<String>) -> Self {
        Self::new(shell, ProcessMode::Foreground)
            .arg("-c")
            .arg(command)
    }

    pub fn waits(&self) -> bool {
        !matches!(self.mode, ProcessMode::Detached)
    }
}

/// A structural change requested by the active screen.
pub enum Action {
    /// Push a new screen on top of the stack.
    Push(Box<dyn Screen>),

    /// Pop (and destroy) the requesting screen.
    Pop,

    /// Unwind the whole stack and exit.
    Quit,

    /// Launch a child process.
    Run(ProcessRequest),

    /// Push the named extension screen, if one was loaded.
    OpenExtension(String),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Push(screen) => f.debug_tuple("Push").field(&screen.name()).finish(),
            Self::Pop => f.write_str("Pop"),
            Self::Quit => f.write_str("Quit"),
            Self::Run(request) => f.debug_tuple("Run").field(request).finish(),
            Self::OpenExtension(name) => f.debug_tuple("OpenExtension").field(name).finish(),
        }
    }
}

/// Context handed to every screen callback.
#[derive(Debug)]
pub struct ScreenContext {
    settings: Settings,
    cwd: PathBuf,
    size: Size,
    status: Option<CompactString>,
    actions: SmallVec<[Action; 4]>,
}

impl ScreenContext {
    pub fn new(settings: Settings, cwd: PathBuf) -> Self {
        Self {
            settings,
            cwd,
            size: Size::default(),
            status: None,
            actions: SmallVec::new(),
        }
    }

    #[inline]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn set_cwd(&mut self, cwd: impl Into<PathBuf>) {
        self.cwd = cwd.into();
    }

    /// Terminal geometry, refreshed by the dispatch loop every tick.
    #[inline]
    pub const fn size(&self) -> Size {
        self.size
    }

    pub fn set_size(&mut self, size: Size) {
        self.size = size;
    }

    pub fn push(&mut self, screen: Box<dyn Screen>) {
        self.actions.push(Action::Push(screen));
    }

    pub fn pop(&mut self) {
        self.actions.push(Action::Pop);
    }

    pub fn quit(&mut self) {
        self.actions.push(Action::Quit);
    }

    pub fn run(&mut self, request: ProcessRequest) {
        self.actions.push(Action::Run(request));
    }

    pub fn open_extension(&mut self, name: impl Into<String>) {
        self.actions.push(Action::OpenExtension(name.into()));
    }

    /// Show a transient message on the status line.
    pub fn report(&mut self, message: impl Into<CompactString>) {
        self.status = Some(message.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn has_pending_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Drain queued actions in request order.
    pub fn take_actions(&mut self) -> SmallVec<[Action; 4]> {
        std::mem::take(&mut self.actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ScreenContext {
        ScreenContext::new(Settings::default(), PathBuf::from("/tmp"))
    }

    #[test]
    fn test_actions_drain_in_order() {
        let mut ctx = context();
        ctx.run(ProcessRequest::shell("sh", "true"));
        ctx.pop();
        ctx.open_extension("hello");

        let actions = ctx.take_actions();
        assert_eq!(actions.len(), 3);
        assert!(matches!(actions[0], Action::Run(_)));
        assert!(matches!(actions[1], Action::Pop));
        assert!(matches!(&actions[2], Action::OpenExtension(name) if name == "hello"));
        assert!(!ctx.has_pending_actions());
    }

    #[test]
    fn test_shell_request_shape() {
        let request = ProcessRequest::shell("bash", "echo /tmp");
        assert_eq!(request.program, "bash");
        assert_eq!(request.args, vec!["-c".to_string(), "echo /tmp".to_string()]);
        assert!(request.waits());
        assert!(!ProcessRequest::new("urxvt", ProcessMode::Detached).waits());
    }

    #[test]
    fn test_status_is_transient() {
        let mut ctx = context();
        ctx.report("rename failed");
        assert_eq!(ctx.status(), Some("rename failed"));
        ctx.clear_status();
        assert_eq!(ctx.status(), None);
    }
}
