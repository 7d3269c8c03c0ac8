//! src/main.rs
//! spider: modal terminal file browser

use std::{
    io::{self, Stdout},
    panic::{AssertUnwindSafe, PanicHookInfo},
};

use anyhow::{Context, Result};
use crossterm::{
    cursor, execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::FutureExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{error, info, warn};

use spider_core::{
    Logger,
    config::{AppConfig, ConfigPaths},
    controller::{CrosstermInput, EventLoop, TerminalProcessRunner},
    extension::ExtensionRegistry,
    fs::Bookmarks,
    screens::Browser,
};
use spider_screen::{ScreenContext, Settings};

type AppTerminal = Terminal<CrosstermBackend<Stdout>>;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    setup_panic_handler();

    let settings = Settings::from_env();
    let paths = ConfigPaths::from_env(&settings.home);
    if let Err(e) = Logger::init_tracing(&paths.log_dir) {
        eprintln!("spider: logging disabled: {e}");
    }
    info!("Starting spider");

    match AssertUnwindSafe(run(settings, paths)).catch_unwind().await {
        Ok(Ok(())) => info!("spider exited cleanly"),
        Ok(Err(e)) => {
            restore_terminal();
            error!("spider stopped: {e:#}");
            eprintln!("spider: {e:#}");
        }
        Err(payload) => {
            restore_terminal();
            let message = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            eprintln!("spider: internal error: {message}");
        }
    }
}

async fn run(settings: Settings, paths: ConfigPaths) -> Result<()> {
    let config = AppConfig::load_from(settings, paths)
        .await
        .context("Failed to load configuration")?;

    let extensions = ExtensionRegistry::load_all(&config.paths.extension_dir);
    info!(count = extensions.len(), "Extensions loaded");

    let bookmarks = Bookmarks::load(&config.paths.bookmarks_file).unwrap_or_else(|e| {
        warn!("Bookmarks unavailable, starting with none: {e}");
        Bookmarks::in_memory()
    });

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let ctx = ScreenContext::new(config.settings.clone(), cwd);

    let terminal = setup_terminal().context("Failed to initialize terminal")?;
    let mut event_loop = EventLoop::new(terminal, ctx, extensions, Box::new(TerminalProcessRunner));
    event_loop.push(Box::new(Browser::new(config.bindings).with_bookmarks(bookmarks)));

    let result = event_loop.run(&mut CrosstermInput).await;

    cleanup_terminal(event_loop.terminal_mut()).context("Failed to restore terminal")?;
    result.context("Application runtime error")
}

fn setup_terminal() -> Result<AppTerminal> {
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Failed to create terminal")
}

fn cleanup_terminal(terminal: &mut AppTerminal) -> Result<()> {
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;
    Ok(())
}

/// Best effort; used on paths where the terminal handle is already gone.
fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(io::stdout(), LeaveAlternateScreen, cursor::Show);
}

fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|panic_info: &PanicHookInfo| {
        restore_terminal();
        match panic_info.location() {
            Some(location) => error!(
                "Panic at {}:{}: {}",
                location.file(),
                location.line(),
                panic_message(panic_info)
            ),
            None => warn!("Panic: {}", panic_message(panic_info)),
        }
    }));
}

fn panic_message(panic_info: &PanicHookInfo) -> String {
    panic_info
        .payload()
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}
