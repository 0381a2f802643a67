// src/main.rs

use color_eyre::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use reconwatch::core::config::Config;
use reconwatch::core::models::CompletedScan;
use reconwatch::core::novelty::KnownHosts;
use reconwatch::core::service::{Probes, ScanService};
use reconwatch::logging;
use std::io::stdout;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

mod app;
mod ui;

use app::{App, AppState, ExportStatus, LOG_TOGGLE_KEY};

type ScanOutcome = std::result::Result<CompletedScan, String>;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    logging::initialize_logging()?;

    let config = Config::load_or_default();
    let probes = Probes::live(&config)?;
    let service = Arc::new(ScanService::new(config, probes, Arc::new(KnownHosts::new())));
    info!("ReconWatch started.");

    // --- Setup ---
    stdout().execute(EnterAlternateScreen)?;
    enable_raw_mode()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;
    terminal.clear()?;

    let result = run(&mut terminal, service).await;

    // --- Restore Terminal ---
    stdout().execute(LeaveAlternateScreen)?;
    disable_raw_mode()?;
    result
}

async fn run<B: Backend>(terminal: &mut Terminal<B>, service: Arc<ScanService>) -> Result<()> {
    let mut app = App::new();
    let (tx, mut rx) = mpsc::channel::<ScanOutcome>(4);

    // The dashboard opens on a fresh network snapshot.
    spawn_scan(&service, &tx, None);

    while !app.should_quit {
        terminal.draw(|frame| ui::render(&mut app, frame))?;

        if event::poll(Duration::from_millis(100))? {
            handle_events(&mut app, &service, &tx)?;
        }

        if let Ok(outcome) = rx.try_recv() {
            app.finish_scan(outcome, service.summary());
        }
        app.on_tick();
    }

    service.cancel_running();
    info!("ReconWatch exiting.");
    Ok(())
}

/// Runs a command phrase, or a network scan when `phrase` is `None`, in the background.
fn spawn_scan(service: &Arc<ScanService>, tx: &mpsc::Sender<ScanOutcome>, phrase: Option<String>) {
    let service = service.clone();
    let tx = tx.clone();
    tokio::spawn(async move {
        let outcome = match phrase {
            Some(phrase) => service.dispatch(&phrase).await,
            None => service.network_scan().await,
        };
        let outcome = outcome.map_err(|e| {
            error!(error = %e, "Scan returned an error.");
            e.to_string()
        });
        let _ = tx.send(outcome).await;
    });
}

fn handle_events(app: &mut App, service: &Arc<ScanService>, tx: &mpsc::Sender<ScanOutcome>) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }
        if app.show_disclaimer {
            match key.code {
                KeyCode::Enter => app.show_disclaimer = false,
                KeyCode::Esc => app.quit(),
                _ => {}
            }
            return Ok(());
        }
        if key.code == LOG_TOGGLE_KEY {
            app.toggle_logs();
            return Ok(());
        }
        match app.state {
            AppState::Idle => handle_idle_input(app, key.code, service, tx),
            AppState::Finished => handle_finished_input(app, key.code, service),
            AppState::Scanning => match key.code {
                KeyCode::Char('q') => app.quit(),
                KeyCode::Char('c') | KeyCode::Esc => service.cancel_running(),
                _ => {}
            },
        }
    }
    Ok(())
}

/// Typing a command phrase. `q` is a normal character here, so quitting is on Esc.
fn handle_idle_input(app: &mut App, key_code: KeyCode, service: &Arc<ScanService>, tx: &mpsc::Sender<ScanOutcome>) {
    match key_code {
        KeyCode::Esc => app.quit(),
        KeyCode::Char(c) => app.input.push(c),
        KeyCode::Backspace => {
            app.input.pop();
        }
        KeyCode::Enter => {
            if app.input.trim().is_empty() {
                return;
            }
            app.begin_scan();
            spawn_scan(service, tx, Some(app.input.clone()));
        }
        _ => {}
    }
}

fn handle_finished_input(app: &mut App, key_code: KeyCode, service: &Arc<ScanService>) {
    match key_code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('n') => app.reset(),
        KeyCode::Char('e') => {
            app.export_status = match service.export_report(&logging::get_data_dir()) {
                Ok(path) => ExportStatus::Success(path.display().to_string()),
                Err(e) => ExportStatus::Error(e.to_string()),
            };
        }
        KeyCode::Up => app.scroll_up(),
        KeyCode::Down => app.scroll_down(),
        KeyCode::Left => app.scroll_logs_left(),
        KeyCode::Right => app.scroll_logs_right(),
        _ => {}
    }
}
