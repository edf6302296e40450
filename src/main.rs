//! feed-delve: checks a list of RSS feeds and reports only what is new.
//!
//! ## Architecture overview
//!
//! ```text
//! ┌───────────┐ registry ┌──────────┐ PollMsg  ┌─────────────┐
//! │ config.rs │ ───────► │ workers  │ ───────► │  poll.rs    │
//! └───────────┘          │ (source) │ (channel)│ coordinator │
//!                        └──────────┘          └─────────────┘
//!                                         dedup.rs │   │ index.rs
//!                                          seen.rs ▼   ▼
//!                                    guids.json   data_<micros>.json
//!                                                      │
//!                                  present.rs / app.rs + ui.rs + input.rs
//! ```
//!
//! * **`config`**: command line and the TOML sources file.
//! * **`registry`**: ordered, duplicate-free list of sources.
//! * **`source/`**: the `FeedFetcher` trait and the RSS implementation.
//! * **`dedup`**: keeps only entries not in the seen-set.
//! * **`seen`**: the durable seen-set file.
//! * **`poll`**: one concurrent run over every source.
//! * **`index`**: per-run results, queries and the output file.
//! * **`present`**, **`app`**, **`ui`**, **`input`**: showing the results.

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

use feed_delve::app::App;
use feed_delve::config::{Cli, SourcesFile};
use feed_delve::{input, poll, present, ui, ResultIndex, RssFetcher, SeenSet};

// ---------------------------------------------------------------------------
// RAII terminal guard
// ---------------------------------------------------------------------------

/// Manages terminal raw-mode and alternate-screen lifetime via [`Drop`].
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl TerminalGuard {
    fn new() -> Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

/// Restore the terminal before the panic message is printed.
fn install_panic_hook() {
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(info);
    }));
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // -- configuration -------------------------------------------------------
    let sources = SourcesFile::load(&cli.sources)?;
    let registry = sources.registry();
    let fetch_config = sources.fetch_config(&cli);
    info!(
        sources = registry.len(),
        timeout_secs = fetch_config.timeout_secs,
        "loaded configuration"
    );

    // -- durable state -------------------------------------------------------
    let mut seen = SeenSet::load(&cli.seen)
        .with_context(|| format!("loading seen-set from {}", cli.seen.display()))?;
    info!(known = seen.len(), "loaded seen-set");

    // -- run -----------------------------------------------------------------
    let run_micros = Utc::now().timestamp_micros();
    let fetcher = RssFetcher::new(&fetch_config).context("building HTTP client")?;
    let report = poll::run(&registry, &fetcher, &mut seen, fetch_config.workers);

    match report
        .persist(&registry, &seen, &cli.seen, &cli.output_dir, run_micros)
        .context("persisting run results; dedup progress from this run is lost")?
    {
        Some(path) => info!(path = %path.display(), known = seen.len(), "saved run"),
        None => info!("nothing new, state files left untouched"),
    }

    // -- presentation --------------------------------------------------------
    let mut stdout = io::stdout().lock();
    present::write_updates(&mut stdout, &report.index)?;
    if let Some(name) = &cli.show {
        present::write_source(&mut stdout, &report.index, name)?;
    }
    drop(stdout);

    if cli.browse && report.has_updates() {
        browse(&report.index)?;
    }
    Ok(())
}

/// Interactive browser over the run's results.
fn browse(index: &ResultIndex) -> Result<()> {
    install_panic_hook();

    let mut guard = TerminalGuard::new()?;
    let mut app = App::new(index);
    let tick_rate = Duration::from_millis(100);

    loop {
        guard.terminal.draw(|f| ui::draw(&mut app, f))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                input::handle_key_event(&mut app, key);
            }
        }

        if app.quit {
            break;
        }
    }

    // `guard` is dropped here, restoring the terminal.
    Ok(())
}
