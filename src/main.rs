use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use std::{error::Error, fs, io, sync::Arc, sync::Mutex};
use tracing_subscriber::EnvFilter;

mod actions;
mod app;
mod auth;
mod config;
mod input;
mod models;
mod prompts;
mod runtime;
mod store;
mod ui;

use app::{App, ScreenParams};
use chrono::NaiveDate;
use config::Config;
use store::{HttpStore, JournalStore, MemoryStore};

#[derive(Parser, Debug)]
#[command(name = "inkleaf", about = "A journaling home screen for the terminal", version)]
struct Args {
    /// Open the create-entry modal for this date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,

    /// Open the view modal for this entry once loading completes
    #[arg(long, value_name = "ENTRY_ID")]
    view: Option<String>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = Config::load();
    init_logging();

    let store: Arc<dyn JournalStore> = if config.store.base_url.trim().is_empty() {
        tracing::info!("no store endpoint configured; entries are session-local");
        Arc::new(MemoryStore::new())
    } else {
        Arc::new(HttpStore::new(&config.store))
    };

    let params = ScreenParams {
        view_entry_id: args.view,
        selected_date: args.date,
    };
    let mut app = App::new(config, store, params);
    actions::fetch_entries(&mut app);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Logs go to a file; stderr would bleed into the alternate screen.
/// `INKLEAF_LOG` controls the filter.
fn init_logging() {
    let path = config::log_path();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let Ok(file) = fs::OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env("INKLEAF_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        runtime::tick(app);

        terminal.draw(|f| ui::ui(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            let event = event::read()?;
            input::handle_event(app, event);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
