//! Demoras CLI - Argentine flight punctuality statistics in your terminal
//!
//! A terminal UI application that displays airline rankings, route delays
//! and gate utilization computed from the published punctuality exports.

mod app;
mod cache;
mod cli;
mod data;
mod format;
mod metrics;
mod refresh;
mod ui;

use std::io;
use std::panic;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use app::{App, AppState};
use cli::{Cli, StartupConfig};
use refresh::{try_recv, RefreshConfig, RefreshHandle};

/// Sets up a panic hook that restores the terminal before printing the panic message.
/// This ensures the terminal is usable even if the application panics.
fn setup_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        // Attempt to restore the terminal
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        // Call the original panic hook
        original_hook(panic_info);
    }));
}

/// Renders the UI based on the current application state
fn render_ui(frame: &mut ratatui::Frame, app: &App) {
    match &app.state {
        AppState::Loading => {
            render_loading(frame);
        }
        AppState::Overview => {
            ui::render_overview(frame, app);
        }
        AppState::Routes => {
            ui::render_routes(frame, app);
        }
        AppState::Gates => {
            ui::render_gates(frame, app);
        }
        AppState::LoadFailed(reason) => {
            render_load_failed(frame, reason);
        }
    }

    if app.show_help {
        ui::render_help_overlay(frame);
    }
}

/// Renders a loading message while data is being fetched
fn render_loading(frame: &mut ratatui::Frame) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        widgets::Paragraph,
    };

    let area = frame.area();

    // Center the loading message vertically
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(3),
            Constraint::Percentage(45),
        ])
        .split(area);

    let loading_text = Paragraph::new("Cargando datos de vuelos...")
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center);

    frame.render_widget(loading_text, chunks[1]);
}

/// Renders the error screen shown when no data could be loaded
fn render_load_failed(frame: &mut ratatui::Frame, reason: &str) {
    use ratatui::{
        layout::{Alignment, Constraint, Direction, Layout},
        style::{Color, Style},
        text::Line,
        widgets::Paragraph,
    };

    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(4),
            Constraint::Percentage(40),
        ])
        .split(area);

    let message = Paragraph::new(vec![
        Line::from("No pudimos cargar los datos. Probá de nuevo más tarde."),
        Line::styled(reason.to_string(), Style::default().fg(Color::DarkGray)),
        Line::styled(
            "r: reintentar · q: salir",
            Style::default().fg(Color::Yellow),
        ),
    ])
    .style(Style::default().fg(Color::Red))
    .alignment(Alignment::Center);

    frame.render_widget(message, chunks[1]);
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = match StartupConfig::from_cli(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{}", error);
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: StartupConfig) -> Result<(), Box<dyn std::error::Error>> {
    // Set up panic hook to restore terminal on crash
    setup_panic_hook();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app instance
    let mut app = App::with_startup_config(config);

    // Initial render to show loading state
    terminal.draw(|f| render_ui(f, &app))?;

    // Trigger initial data load
    app.load_all_data().await;

    // Background refresher re-fetches once the manifest window expires
    let mut refresh_handle = app
        .store()
        .map(|store| RefreshHandle::spawn(RefreshConfig::default(), store));

    // Main event loop
    loop {
        // Render UI
        terminal.draw(|f| render_ui(f, &app))?;

        // Poll for keyboard events with 100ms timeout
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        // Drain background refresh updates
        if let Some(handle) = refresh_handle.as_mut() {
            while let Some(message) = try_recv(handle) {
                app.apply_refresh(message);
            }
        }

        // Manual refresh requested via the `r` key
        if app.refresh_requested {
            app.refresh_requested = false;
            app.begin_reload();
            terminal.draw(|f| render_ui(f, &app))?;
            app.load_all_data().await;
        }

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}
