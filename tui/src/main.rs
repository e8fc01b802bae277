//! Memeload Entry Point
//!
//! Runs commands behind the loading overlay.
//!
//! Usage:
//!   memeload [OPTIONS] -c <SHELL>...
//!   memeload [OPTIONS] -- <PROGRAM> [ARGS]...
//!
//! Logging goes to the file named by `MEMELOAD_LOG` (filtered by
//! `RUST_LOG`), since the terminal belongs to the overlay.

use std::fs::File;
use std::io;
use std::panic;
use std::sync::Mutex;

use anyhow::Context;
use clap::Parser;
use crossterm::event::EventStream;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use memeload_tui::{App, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging()?;

    let commands = cli.job_commands();
    if commands.is_empty() {
        eprintln!("memeload: nothing to run (use -c <SHELL> or -- <PROGRAM>)");
        std::process::exit(2);
    }
    let config = cli.mask_config().context("loading overlay config")?;

    // Check if we have a TTY before attempting initialization
    use std::io::IsTerminal;

    if !io::stdout().is_terminal() {
        eprintln!("memeload: stdout is not a terminal");
        std::process::exit(1);
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let mut app = App::new(config, &commands);
    let result = app.run(&mut terminal, EventStream::new()).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let code = result?;
    print_summary(&app);
    if let Err(e) = app.shutdown().await {
        tracing::warn!("overlay shutdown: {e}");
    }

    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Route tracing to `MEMELOAD_LOG`; without it, nothing is recorded
fn init_logging() -> anyhow::Result<()> {
    let Ok(path) = std::env::var("MEMELOAD_LOG") else {
        return Ok(());
    };
    let file = File::create(&path).with_context(|| format!("opening log file {path}"))?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    Ok(())
}

/// One line per job after the alternate screen is gone
fn print_summary(app: &App) {
    for job in app.jobs().jobs() {
        println!("{} {}", job.status.icon(), job.command);
    }
}
