//! A TUI for browsing campus events, with a gated admin panel for managing
//! them.

/// The "functional core" to the main module's "imperative shell"
mod app;

/// Configuration and argument parsing
mod config;

/// Macro for tab-cycling form fields
mod form_fields;

use app::App;
use campus_core::{Campus, FileStorage, MemoryStorage, SessionGate, Storage};
use clap::Parser;
use crossterm::event::{Event, EventStream};
use futures::StreamExt;
use ratatui::DefaultTerminal;
use std::{fs, io, path::Path, process::ExitCode};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> io::Result<ExitCode> {
    let config = config::Config::parse();

    let data_dir = config.data_dir();
    fs::create_dir_all(&data_dir)?;

    // Logs go to a file so they don't draw over the UI. The guard flushes
    // them when dropped, so it has to live until we return.
    let _log_guard = init_tracing(&data_dir);

    let gate = SessionGate::new(config.access_code.clone());

    if config.in_memory {
        start(MemoryStorage::new(), gate).await
    } else {
        let storage = FileStorage::in_dir(&data_dir);
        tracing::info!(path = ?storage.path(), "using file storage");

        start(storage, gate).await
    }
}

/// Set up `tracing` to write to `campus.log` in `data_dir`. `RUST_LOG`
/// overrides the default `info` level.
fn init_tracing(data_dir: &Path) -> WorkerGuard {
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(data_dir, "campus.log"));

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    guard
}

/// Load the views and hand the terminal over to the app.
async fn start<S: Storage>(storage: S, gate: SessionGate) -> io::Result<ExitCode> {
    let campus = match Campus::new(storage, gate) {
        Ok(campus) => campus,
        Err(problem) => {
            tracing::error!(?problem, "could not load events");
            eprintln!("could not load events: {problem}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut terminal = ratatui::init();
    terminal.clear()?;
    let res = run(terminal, App::new(campus)).await;
    ratatui::restore();
    res
}

/// Manage the lifecycle of the app
async fn run<S: Storage>(mut terminal: DefaultTerminal, mut app: App<S>) -> io::Result<ExitCode> {
    terminal.draw(|frame| app.render(frame))?;

    let mut event_stream = EventStream::new();

    // Every handler finishes (storage writes included) before we read the
    // next key, so there's only ever one thing touching storage.
    while let Some(event) = event_stream.next().await {
        let action = match event {
            Ok(Event::Key(key_event)) => app::Action::Key(key_event),
            Ok(_) => {
                // resizes and the like only need a redraw
                terminal.draw(|frame| app.render(frame))?;
                continue;
            }
            Err(err) => app::Action::Problem(err.to_string()),
        };

        app.handle(action);

        // Now that we handled the event, we re-render to display any changes
        // the app cares about.
        terminal.draw(|frame| app.render(frame))?;

        if let Some(code) = app.should_exit() {
            return Ok(code);
        }
    }

    Ok(ExitCode::SUCCESS)
}
