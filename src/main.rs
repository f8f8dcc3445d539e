use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use solwatch::app::{App, View};
use solwatch::data::export::write_json;
use solwatch::{events, ui};
use solwatch::{Dashboard, DataSource, FileSource, Poller, Schemas, Settings};

/// Log filter used when RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "info";

/// How often the TUI asks its source for a new snapshot.
const SOURCE_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "solwatch", version)]
#[command(about = "Terminal dashboard for live space weather conditions")]
struct Args {
    /// Settings file (TOML, YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Replay a snapshot written by --record instead of polling
    #[arg(short, long, conflicts_with = "record")]
    file: Option<PathBuf>,

    /// Cache lifetime of NOAA feeds and images (e.g. "5m", "90s")
    #[arg(short, long)]
    refresh: Option<String>,

    /// Cache lifetime of the UV feed (e.g. "1h")
    #[arg(long)]
    uv_ttl: Option<String>,

    /// Fetch once, write the judged dashboard as JSON and exit ("-" for stdout)
    #[arg(short, long, conflicts_with = "record")]
    export: Option<PathBuf>,

    /// Fetch once, write the raw snapshot as JSON and exit ("-" for stdout)
    #[arg(long)]
    record: Option<PathBuf>,

    /// Write logs to this file while the TUI is running
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let headless = args.export.is_some() || args.record.is_some();
    init_logging(headless, args.log_file.as_deref())?;

    let mut settings = Settings::load(args.config.as_deref())?;
    if let Some(refresh) = args.refresh {
        settings.refresh = refresh;
    }
    if let Some(uv_ttl) = args.uv_ttl {
        settings.uv_ttl = uv_ttl;
    }

    // Non-interactive modes
    if let Some(ref path) = args.record {
        return record_snapshot(&settings, path);
    }
    if let Some(ref path) = args.export {
        return export_dashboard(&settings, args.file.as_deref(), path);
    }

    if let Some(ref path) = args.file {
        return run_with_file(path, &settings);
    }
    run_live(&settings)
}

/// Install the tracing subscriber.
///
/// The TUI owns the terminal, so it only logs when given a file. Headless
/// modes log to stderr and keep stdout for JSON.
fn init_logging(headless: bool, log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if let Some(path) = log_file {
        let file = File::create(path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if headless {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

/// Fetch every feed once.
fn collect_once(settings: &Settings) -> Result<solwatch::Snapshot> {
    let rt = tokio::runtime::Runtime::new()?;
    let mut poller = Poller::from_settings(settings)?;
    Ok(rt.block_on(poller.collect_once()))
}

/// Write the raw snapshot so it can be replayed with --file.
fn record_snapshot(settings: &Settings, path: &Path) -> Result<()> {
    let snapshot = collect_once(settings)?;
    write_json(&snapshot, path)?;
    info!(path = %path.display(), "recorded snapshot");
    Ok(())
}

/// Write the judged dashboard, from a recording or a fresh fetch.
fn export_dashboard(settings: &Settings, replay: Option<&Path>, path: &Path) -> Result<()> {
    let snapshot = match replay {
        Some(replay) => {
            let mut source = FileSource::new(replay);
            match source.poll() {
                Some(snapshot) => snapshot,
                None => bail!("{}", source.error().unwrap_or("No snapshot in recording")),
            }
        }
        None => collect_once(settings)?,
    };

    let dashboard = Dashboard::from_snapshot(&snapshot, &settings.schemas);
    write_json(&dashboard, path)?;
    info!(path = %path.display(), overall = %dashboard.overall.tier, "exported dashboard");
    Ok(())
}

/// Run with a recorded snapshot
fn run_with_file(path: &Path, settings: &Settings) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, settings.schemas.clone(), None)
}

/// Run against the live feeds
fn run_live(settings: &Settings) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    let poller = Poller::from_settings(settings)?;
    let refresh = poller.config().refresh;

    // The poller task keeps running on the runtime's workers after block_on returns
    let (source, handle) = rt.block_on(async { poller.spawn("NOAA SWPC") });

    let result = run_tui(Box::new(source), settings.schemas.clone(), Some(refresh));

    // Signal shutdown
    handle.abort();

    result
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    schemas: Schemas,
    refresh_interval: Option<Duration>,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, schemas);
    app.refresh_interval = refresh_interval;
    let _ = app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    let mut last_poll = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let top = (area.height / 2).saturating_sub(2);
                let centered = ratatui::layout::Rect::new(0, top, area.width, 5.min(area.height));
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with the overall condition
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Metrics => ui::metrics::render(frame, app, chunks[2]),
                View::Imagery => ui::imagery::render(frame, app, chunks[2]),
                View::Notices => ui::notices::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Rows start after header (1) + tabs (1) + block border (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Pick up new snapshots; the header countdown redraws every loop
        if last_poll.elapsed() >= SOURCE_POLL_INTERVAL {
            let _ = app.reload_data();
            last_poll = Instant::now();
        }
    }

    Ok(())
}
