// src/main.rs

use color_eyre::eyre::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::prelude::*;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{info, warn};

mod app;
mod commands;
mod config;
mod core;
mod logging;
mod ui;

use app::{App, AppState};
use commands::{Command, CommandResult, Dispatcher};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    // A missing credential stops the program before the terminal is touched.
    let config = Config::from_env()?;
    let dispatcher = Arc::new(Dispatcher::new(&config)?);
    info!(base_url = %config.base_url, "Configuration loaded.");

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableMouseCapture)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = run(&mut terminal, dispatcher).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    stdout().execute(DisableMouseCapture)?;
    disable_raw_mode()?;
    result
}

async fn run<B: Backend>(terminal: &mut Terminal<B>, dispatcher: Arc<Dispatcher>) -> Result<()> {
    let mut app = App::new();
    let (tx, mut rx) = mpsc::channel(1);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(&mut app, &tx, &dispatcher)?;
        }

        if let Ok(result) = rx.try_recv() {
            app.finish(result);
        }

        app.on_tick();
    }

    info!("Shutting down.");
    Ok(())
}

fn handle_events(app: &mut App, tx: &mpsc::Sender<CommandResult>, dispatcher: &Arc<Dispatcher>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if key.code == KeyCode::Esc {
            app.quit();
            return Ok(());
        }
        match app.state {
            AppState::Disclaimer => {
                if key.code == KeyCode::Enter { app.acknowledge_disclaimer(); }
            }
            AppState::Idle => handle_idle_input(app, key.code, tx, dispatcher),
            AppState::Finished => handle_finished_input(app, key.code),
            AppState::Running => handle_shared_keys(app, key.code),
        }
    }
    Ok(())
}

/// Text entry. Every printable key goes into the input line.
fn handle_idle_input(app: &mut App, key_code: KeyCode, tx: &mpsc::Sender<CommandResult>, dispatcher: &Arc<Dispatcher>) {
    match key_code {
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => { app.input.pop(); },
        KeyCode::Enter => {
            let Some(line) = app.submit() else { return };
            match line.parse::<Command>() {
                Ok(command) => {
                    let tx_clone = tx.clone();
                    let dispatcher = Arc::clone(dispatcher);
                    tokio::spawn(async move {
                        let result = dispatcher.execute(command).await;
                        let _ = tx_clone.send(result).await;
                    });
                }
                Err(e) => {
                    warn!(line = %line, error = %e, "Rejected command line.");
                    app.finish(CommandResult::Failed(e.to_string()));
                }
            }
        }
        other => handle_shared_keys(app, other),
    }
}

fn handle_finished_input(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        other => handle_shared_keys(app, other),
    }
}

fn handle_shared_keys(app: &mut App, key_code: KeyCode) {
    match key_code {
        KeyCode::Char('q') if app.state == AppState::Running => app.quit(),
        KeyCode::Tab => app.toggle_logs(),
        KeyCode::Left if app.show_logs => app.scroll_logs_left(),
        KeyCode::Right if app.show_logs => app.scroll_logs_right(),
        _ => {}
    }
}
