use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
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
use tracing_subscriber::EnvFilter;

use slawatch::events::{self, DEFAULT_EXPORT_PATH};
use slawatch::{
    ui, App, DataSource, Encoding, FileSource, HostSelection, Report, Settings, SharedDataset,
    View,
};

#[derive(Parser, Debug)]
#[command(name = "slawatch")]
#[command(about = "Check network monitoring exports against service-level agreements")]
struct Args {
    /// CSV export or folder of exports (repeatable)
    #[arg(short, long, required = true)]
    file: Vec<PathBuf>,

    /// Text encoding of the exports (utf-8 or latin-1)
    #[arg(long)]
    encoding: Option<Encoding>,

    /// Service-agreement and column configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Service profile used for color-coding
    #[arg(short, long)]
    profile: Option<String>,

    /// Refresh interval in seconds for re-reading changed files
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Number of hosts selected when data is first loaded
    #[arg(short, long, default_value_t = slawatch::data::DEFAULT_SELECTION)]
    select: usize,

    /// Classify every file, write a JSON report and exit
    #[arg(short, long)]
    export: Option<PathBuf>,

    /// Write logs to this file (level from RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(ref path) = args.log_file {
        init_logging(path)?;
    }

    let settings = Settings::load(args.config.as_deref())
        .context("Failed to load service-agreement configuration")?;

    // An unknown profile on the command line is fatal; never fall back
    settings.profiles.resolve(args.profile.as_deref())?;

    let dataset = SharedDataset::with_mapping(settings.columns.clone());
    let mut source = FileSource::new(&args.file);
    if let Some(encoding) = args.encoding {
        source = source.with_encoding(encoding);
    }

    if let Some(ref export_path) = args.export {
        return export_to_file(source, &dataset, &settings, args.profile.as_deref(), export_path);
    }

    let mut app = App::new(Box::new(source), dataset, settings.profiles)
        .with_initial_selection(args.select);
    if let Some(ref profile) = args.profile {
        app = app.with_profile(profile)?;
    }

    let refresh = Duration::from_secs(args.refresh.max(1));
    let export_path = PathBuf::from(DEFAULT_EXPORT_PATH);
    run_tui(app, refresh, &export_path)
}

/// Send tracing output to a file; the terminal belongs to the TUI.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slawatch=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Run the TUI until the user quits
fn run_tui(mut app: App, refresh_interval: Duration, export_path: &Path) -> Result<()> {
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
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    if let Err(e) = app.reload_data() {
        app.set_status_message(format!("Load failed: {}", e));
    }

    let result = run_app(&mut terminal, &mut app, refresh_interval, export_path);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
    export_path: &Path,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 16;

    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();

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
                Constraint::Min(12),   // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            ui::common::render_header(frame, app, chunks[0]);
            ui::common::render_tabs(frame, app, chunks[1]);

            match app.current_view {
                View::Charts => ui::charts::render(frame, app, chunks[2]),
                View::Hosts => ui::hosts::render(frame, app, chunks[2]),
            }

            ui::common::render_status_bar(frame, app, chunks[3]);

            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key, export_path),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                _ => {}
            }
        }

        // Pick up new or changed exports
        if last_refresh.elapsed() >= refresh_interval {
            if let Err(e) = app.reload_data() {
                app.set_status_message(format!("Reload failed: {}", e));
            }
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Ingest every export once and write the classified report
fn export_to_file(
    mut source: FileSource,
    dataset: &SharedDataset,
    settings: &Settings,
    profile: Option<&str>,
    export_path: &Path,
) -> Result<()> {
    let ingest = dataset.ingest_batch(source.poll());
    if let Some(err) = source.error() {
        eprintln!("Warning: {}", err);
    }

    let errors: Vec<(String, String)> = ingest
        .failed()
        .filter_map(|o| o.result.as_ref().err().map(|e| (o.file_name.clone(), e.to_string())))
        .collect();
    for (file, err) in &errors {
        eprintln!("Skipped {}: {}", file, err);
    }

    let report = Report::build(dataset, &settings.profiles, profile, None::<&HostSelection>)?
        .with_errors(errors);
    report.write_to(export_path)?;

    println!(
        "Exported {} records from {} files to: {}",
        report.records.len(),
        report.sources.len(),
        export_path.display()
    );
    Ok(())
}
