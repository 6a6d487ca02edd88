//! Alumnae directory - a terminal front-end for an alumnae association.
//!
//! Browse, filter and maintain the member directory, follow the gatherings
//! board and the photo archive. The roster lives either in a local JSON
//! snapshot or in a hosted table, chosen by configuration.

mod app;
mod ui;

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use alumnae_core::directory::{DashboardStats, DeepLink, DirectoryState};
use alumnae_core::{store, Config};

use app::{App, AppState};
use ui::input::handle_input;
use ui::render::render;

// ============================================================================
// Constants
// ============================================================================

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Prefix of the daily log files written while the TUI is running.
const LOG_FILE_PREFIX: &str = "alumnae.log";

const USAGE: &str = "\
Usage:
  alumnae [QUERY]                             Open the directory (QUERY pre-sets filters)
  alumnae --list [QUERY]                      Print matching members as JSON
  alumnae --stats                             Print dashboard statistics as JSON
  alumnae --upload-photo PATH TITLE [DATE]    Upload a photo to the archive (DATE: YYYY-MM-DD)

QUERY is a deep link such as 'cohort=25&tag=IT' or '?payment=unpaid'.";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Tui { query: Option<String> },
    List { query: Option<String> },
    Stats,
    UploadPhoto {
        path: PathBuf,
        title: String,
        taken_at: Option<String>,
    },
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    let rest = args.get(1..).unwrap_or_default();
    match rest.first().map(String::as_str) {
        None => Ok(Command::Tui { query: None }),
        Some("-h") | Some("--help") => Ok(Command::Help),
        Some("--list") => Ok(Command::List {
            query: rest.get(1).cloned(),
        }),
        Some("--stats") => Ok(Command::Stats),
        Some("--upload-photo") => match rest {
            [_, path, title] => Ok(Command::UploadPhoto {
                path: PathBuf::from(path),
                title: title.clone(),
                taken_at: None,
            }),
            [_, path, title, taken_at] => Ok(Command::UploadPhoto {
                path: PathBuf::from(path),
                title: title.clone(),
                taken_at: Some(taken_at.clone()),
            }),
            _ => bail!("--upload-photo needs PATH and TITLE\n\n{}", USAGE),
        },
        Some(flag) if flag.starts_with("--") => bail!("Unknown option '{}'\n\n{}", flag, USAGE),
        Some(query) => Ok(Command::Tui {
            query: Some(query.to_string()),
        }),
    }
}

/// Initialize the tracing subscriber.
///
/// With a log directory, output goes to a daily file there so the terminal
/// UI is not overwritten; otherwise to stderr.
fn init_tracing(log_dir: Option<&Path>) -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(writer).with_ansi(false))
                .with(filter)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::registry()
                .with(fmt::layer().with_writer(io::stderr))
                .with(filter)
                .init();
            None
        }
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let args: Vec<String> = std::env::args().collect();
    let command = parse_args(&args)?;

    match command {
        Command::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        Command::List { query } => {
            init_tracing(None);
            list_members(query.as_deref()).await
        }
        Command::Stats => {
            init_tracing(None);
            print_stats().await
        }
        Command::UploadPhoto { path, title, taken_at } => {
            init_tracing(None);
            upload_photo(&path, &title, taken_at.as_deref()).await
        }
        Command::Tui { query } => run_tui(query.as_deref()).await,
    }
}

async fn run_tui(query: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let log_dir = config.storage_dir()?;
    std::fs::create_dir_all(&log_dir)
        .with_context(|| format!("Failed to create {}", log_dir.display()))?;
    let _guard = init_tracing(Some(&log_dir));
    info!("Alumnae directory starting");

    let mut app = App::new(config, today())?;
    if let Some(query) = query {
        let link = DeepLink::parse(query);
        if !link.is_empty() {
            app.open_directory_with(&link);
        }
    }
    app.refresh_all_background();

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Alumnae directory shutting down");
    Ok(())
}

async fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Poll for events with timeout to allow background updates
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
                    return Ok(());
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        app.check_background_tasks().await;

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}

/// Load the configured roster into a fresh view state.
async fn load_state() -> Result<DirectoryState> {
    let config = Config::load()?;
    let roster_store = store::open(&config)?;
    let roster = roster_store
        .load()
        .await
        .with_context(|| format!("Failed to load roster from the {} store", roster_store.name()))?;

    let mut state = DirectoryState::new(today());
    state.set_roster(roster);
    Ok(state)
}

async fn list_members(query: Option<&str>) -> Result<()> {
    let mut state = load_state().await?;
    if let Some(query) = query {
        state.apply_deep_link(&DeepLink::parse(query));
    }

    let members = state.filtered();
    info!(count = members.len(), "Listing members");
    println!("{}", serde_json::to_string_pretty(&members)?);
    Ok(())
}

async fn print_stats() -> Result<()> {
    let state = load_state().await?;
    let stats = DashboardStats::compute(state.roster(), state.today());
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

async fn upload_photo(path: &Path, title: &str, taken_at: Option<&str>) -> Result<()> {
    let config = Config::load()?;
    let api = store::api_client(&config)?;

    let taken_at = taken_at
        .map(|s| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
        })
        .transpose()?;

    let title = title.trim();
    if title.is_empty() {
        bail!("A photo title is required");
    }

    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("photo");

    let photo = api
        .upload_photo(&config.photo_bucket, file_name, bytes, title, None, taken_at)
        .await
        .context("Upload failed")?;

    println!("{}", serde_json::to_string_pretty(&photo)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("alumnae")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_parse_args_defaults_to_tui() {
        assert_eq!(parse_args(&args(&[])).unwrap(), Command::Tui { query: None });
        assert_eq!(
            parse_args(&args(&["cohort=25"])).unwrap(),
            Command::Tui {
                query: Some("cohort=25".to_string())
            }
        );
    }

    #[test]
    fn test_parse_args_list_with_query() {
        assert_eq!(
            parse_args(&args(&["--list", "?payment=unpaid"])).unwrap(),
            Command::List {
                query: Some("?payment=unpaid".to_string())
            }
        );
        assert_eq!(parse_args(&args(&["--list"])).unwrap(), Command::List { query: None });
    }

    #[test]
    fn test_parse_args_upload_photo() {
        assert_eq!(
            parse_args(&args(&["--upload-photo", "a.jpg", "Sports Day", "2023-10-15"])).unwrap(),
            Command::UploadPhoto {
                path: PathBuf::from("a.jpg"),
                title: "Sports Day".to_string(),
                taken_at: Some("2023-10-15".to_string()),
            }
        );
        assert!(parse_args(&args(&["--upload-photo", "a.jpg"])).is_err());
    }

    #[test]
    fn test_parse_args_rejects_unknown_flag() {
        assert!(parse_args(&args(&["--frobnicate"])).is_err());
        assert_eq!(parse_args(&args(&["--stats"])).unwrap(), Command::Stats);
    }
}
