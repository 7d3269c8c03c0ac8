//! src/controller/event_loop.rs
//! ============================================================================
//! # Dispatch Loop
//!
//! Drives the modal stack one input at a time:
//! - refresh the cached terminal size and draw the top screen plus the
//!   status line
//! - block for one input, or a `Tick` once the tick interval elapses
//! - hand the input to the top screen, then apply the actions it queued
//!
//! The loop ends when the stack empties, a screen requests `Quit`, the input
//! source closes, or the top screen ignores a quit key. The stack is always
//! cleared on the way out so every activation is paired with a deactivation.

use std::{io, path::PathBuf, time::Duration};

use ratatui::{Terminal, backend::Backend};
use spider_screen::{Action, EventResult, Input, ProcessRequest, Screen, ScreenContext};
use tracing::{debug, info, instrument, trace, warn};

use crate::{
    controller::{input::InputSource, modal_stack::ModalStack, process::ProcessRunner},
    error::{AppError, AppResult},
    extension::registry::ExtensionRegistry,
    view::status_line,
};

pub const DEFAULT_TICK: Duration = Duration::from_millis(1000);

pub struct EventLoop<B: Backend> {
    terminal: Terminal<B>,
    stack: ModalStack,
    extensions: ExtensionRegistry,
    ctx: ScreenContext,
    runner: Box<dyn ProcessRunner>,
    tick: Duration,
}

impl<B: Backend> EventLoop<B> {
    pub fn new(
        terminal: Terminal<B>,
        ctx: ScreenContext,
        extensions: ExtensionRegistry,
        runner: Box<dyn ProcessRunner>,
    ) -> Self {
        info!(extensions = extensions.len(), "Initializing event loop");
        Self {
            terminal,
            stack: ModalStack::new(),
            extensions,
            ctx,
            runner,
            tick: DEFAULT_TICK,
        }
    }

    #[must_use]
    pub fn with_tick(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Push the screen the session starts on.
    pub fn push(&mut self, screen: Box<dyn Screen>) {
        self.stack.push(screen);
    }

    pub fn stack(&self) -> &ModalStack {
        &self.stack
    }

    pub fn context(&self) -> &ScreenContext {
        &self.ctx
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    /// Run until the session ends, then unwind the stack.
    pub async fn run(&mut self, input: &mut dyn InputSource) -> AppResult<()> {
        let result = self.dispatch(input).await;
        self.stack.clear();
        info!("Event loop finished");
        result
    }

    async fn dispatch(&mut self, input: &mut dyn InputSource) -> AppResult<()> {
        while !self.stack.is_empty() {
            self.draw()?;

            let Some(event) = input.next_input(self.tick)? else {
                info!("Input source closed");
                return Ok(());
            };

            if matches!(event, Input::Key(_)) {
                self.ctx.clear_status();
            }

            let Some(top) = self.stack.top_mut() else {
                break;
            };
            let result = top.update(&event, &mut self.ctx);
            trace!(?event, ?result, screen = top.name(), "Dispatched input");

            let quit_key = result == EventResult::Ignored && event.is_quit();
            if self.apply_actions().await? || quit_key {
                debug!(quit_key, "Session ending");
                return Ok(());
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> AppResult<()> {
        let size = self.terminal.size().map_err(terminal_error)?;
        self.ctx.set_size(size);

        let Self {
            terminal, stack, ctx, ..
        } = self;
        let Some(top) = stack.top_mut() else {
            return Ok(());
        };

        terminal
            .draw(|frame| {
                top.draw(frame, ctx);
                status_line::render(frame, ctx);
            })
            .map_err(terminal_error)?;
        Ok(())
    }

    /// Apply queued actions in order. Returns `true` when the session ends;
    /// actions queued behind a pop that empties the stack are dropped.
    async fn apply_actions(&mut self) -> AppResult<bool> {
        for action in self.ctx.take_actions() {
            trace!(?action, "Applying action");
            match action {
                Action::Push(screen) => self.stack.push(screen),
                Action::Pop => {
                    self.stack.pop();
                    if self.stack.is_empty() {
                        debug!("Stack emptied, discarding remaining actions");
                        return Ok(true);
                    }
                }
                Action::Quit => return Ok(true),
                Action::Run(request) => self.run_process(&request).await?,
                Action::OpenExtension(name) => self.open_extension(&name),
            }
        }
        Ok(self.stack.is_empty())
    }

    fn open_extension(&mut self, name: &str) {
        match self.extensions.open(name) {
            Some(handle) => self.stack.push(Box::new(handle)),
            None => {
                warn!("No extension named {name}");
                self.ctx.report(format!("No extension named {name}"));
            }
        }
    }

    #[instrument(level = "debug", skip_all, fields(program = %request.program))]
    async fn run_process(&mut self, request: &ProcessRequest) -> AppResult<()> {
        let cwd: PathBuf = self.ctx.cwd().to_path_buf();
        match self.runner.run(request, &cwd).await {
            Ok(()) => {}
            Err(e @ AppError::Terminal(_)) => return Err(e),
            Err(e) => {
                warn!("{e}");
                self.ctx.report(e.status_message());
            }
        }

        if request.waits() {
            self.terminal.clear().map_err(terminal_error)?;
        }
        Ok(())
    }
}

fn terminal_error(e: io::Error) -> AppError {
    AppError::Terminal(e.to_string())
}
