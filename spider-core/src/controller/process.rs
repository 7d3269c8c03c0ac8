//! src/controller/process.rs
//! ============================================================================
//! # Process runner
//!
//! Launches the child processes screens ask for. Foreground children get the
//! real terminal: raw mode and the alternate screen are released for the
//! duration and restored afterwards, even when the child fails to start.

use std::{io, path::Path};

use async_trait::async_trait;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use spider_screen::{ProcessMode, ProcessRequest};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    process::Command,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{AppError, AppResult};

#[async_trait(?Send)]
pub trait ProcessRunner {
    /// Run `request` in `cwd` according to its [`ProcessMode`].
    async fn run(&mut self, request: &ProcessRequest, cwd: &Path) -> AppResult<()>;
}

/// Runs children against the controlling terminal.
#[derive(Debug, Default)]
pub struct TerminalProcessRunner;

impl TerminalProcessRunner {
    fn command(request: &ProcessRequest, cwd: &Path) -> Command {
        let mut command = Command::new(&request.program);
        command.args(&request.args).current_dir(cwd);
        command
    }

    async fn run_foreground(request: &ProcessRequest, cwd: &Path) -> AppResult<()> {
        let status = Self::command(request, cwd)
            .status()
            .await
            .map_err(|e| AppError::process(&request.program, e))?;
        info!(program = %request.program, %status, "Child exited");

        if request.mode == ProcessMode::ForegroundPause {
            println!("\nPress ENTER to return to spider");
            let mut line = String::new();
            BufReader::new(tokio::io::stdin()).read_line(&mut line).await?;
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl ProcessRunner for TerminalProcessRunner {
    #[instrument(level = "info", skip_all, fields(program = %request.program, mode = ?request.mode))]
    async fn run(&mut self, request: &ProcessRequest, cwd: &Path) -> AppResult<()> {
        if request.mode == ProcessMode::Detached {
            let child = Self::command(request, cwd)
                .stdin(std::process::Stdio::null())
                .stdout(std::process::Stdio::null())
                .stderr(std::process::Stdio::null())
                .spawn()
                .map_err(|e| AppError::process(&request.program, e))?;
            debug!(pid = ?child.id(), "Spawned detached child");
            return Ok(());
        }

        release_terminal().map_err(|e| AppError::Terminal(e.to_string()))?;
        let result = Self::run_foreground(request, cwd).await;
        if let Err(e) = reclaim_terminal() {
            warn!("Failed to restore terminal after child: {e}");
            return Err(AppError::Terminal(e.to_string()));
        }
        result
    }
}

fn release_terminal() -> io::Result<()> {
    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)
}

fn reclaim_terminal() -> io::Result<()> {
    execute!(io::stdout(), EnterAlternateScreen)?;
    enable_raw_mode()
}
