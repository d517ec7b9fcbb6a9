//! Terminal front end for both game modes.

mod app;
mod input;
mod ui;

pub use app::{App, FIELD_SIZE, InputMode, Screen};
pub use input::{digit_position, move_cursor};

use crate::storage::KeyValueStore;
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{self, Stdout};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{error, info, instrument};

type Term = Terminal<CrosstermBackend<Stdout>>;

/// Sends logs to `path` so the terminal stays clean.
pub fn init_file_logging(path: &Path) -> Result<()> {
    let log_file = std::fs::File::create(path)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(
                    "info,tictactoe_dapp=debug,tictactoe_core=debug",
                )
            }),
        )
        .with_writer(std::sync::Arc::new(log_file))
        .with_ansi(false)
        .try_init(); // Don't panic if already initialized
    Ok(())
}

fn setup_terminal() -> Result<Term> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    Ok(Terminal::new(CrosstermBackend::new(stdout))?)
}

fn restore_terminal(terminal: &mut Term) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Runs `app` until the user quits.
#[instrument(skip_all)]
pub async fn run<S: KeyValueStore>(mut app: App<S>) -> Result<()> {
    info!("Starting terminal UI");
    let mut terminal = setup_terminal()?;

    app.start(Instant::now()).await;
    let res = run_app(&mut terminal, &mut app).await;

    restore_terminal(&mut terminal)?;

    if let Err(err) = &res {
        error!(error = ?err, "UI loop error");
    }
    res
}

async fn run_app<S: KeyValueStore>(terminal: &mut Term, app: &mut App<S>) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))?
            && let Event::Key(key) = event::read()?
            && key.kind != KeyEventKind::Release
        {
            app.handle_key(key.code, Instant::now()).await;
        }

        if app.should_quit() {
            info!("Leaving terminal UI");
            return Ok(());
        }

        app.tick(Instant::now()).await;
    }
}
