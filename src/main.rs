use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::EnvFilter;

use tankwatch::app::export_view;
use tankwatch::{events, ui, App, Dashboard, FileFeed, Settings, StreamFeed, Subscription};

#[derive(Parser, Debug)]
#[command(name = "tankwatch")]
#[command(about = "Terminal dashboard for live water-tank sensor readings")]
struct Args {
    /// Path to a JSON file holding the current sensor record
    #[arg(short, long, default_value = "reading.json", conflicts_with = "connect")]
    file: PathBuf,

    /// Connect to a TCP endpoint streaming newline-delimited JSON (host:port)
    #[arg(short, long, conflicts_with = "file")]
    connect: Option<String>,

    /// Config file (TOML, YAML or JSON); TANKWATCH_* env vars also apply
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh interval in milliseconds
    #[arg(short, long)]
    refresh: Option<u64>,

    /// Highest safe TDS value (mg/L)
    #[arg(long)]
    tds_max: Option<f64>,

    /// Lowest safe temperature (°C)
    #[arg(long)]
    temp_min: Option<f64>,

    /// Highest safe temperature (°C)
    #[arg(long)]
    temp_max: Option<f64>,

    /// Read the file once, export the dashboard state to JSON and exit
    #[arg(short, long, conflicts_with = "connect")]
    export: Option<PathBuf>,

    /// Log file (the terminal is used by the UI)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of loaded settings.
    fn apply(&self, mut settings: Settings) -> Settings {
        if let Some(refresh) = self.refresh {
            settings.refresh_ms = refresh;
        }
        if let Some(tds_max) = self.tds_max {
            settings.thresholds.tds_max = tds_max;
        }
        if let Some(temp_min) = self.temp_min {
            settings.thresholds.temp_min = temp_min;
        }
        if let Some(temp_max) = self.temp_max {
            settings.thresholds.temp_max = temp_max;
        }
        if let Some(ref log_file) = self.log_file {
            settings.log_file = log_file.clone();
        }
        settings
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let settings = args.apply(Settings::load(args.config.as_deref())?);

    init_logging(&settings.log_file)?;
    info!("Starting tankwatch with {:?}", settings.thresholds);

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(&args.file, export_path, &settings);
    }

    // Handle TCP connection mode
    if let Some(ref addr) = args.connect {
        return run_with_tcp(addr, &settings);
    }

    // Default: file-based mode
    run_with_file(&args.file, &settings)
}

/// Send logs to a file, filtered by `RUST_LOG` (default `tankwatch=info`).
fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tankwatch=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

/// Run with a file-based feed
fn run_with_file(path: &Path, settings: &Settings) -> Result<()> {
    let subscription = Subscription::new(Box::new(FileFeed::new(path)));
    run_tui(subscription, settings)
}

/// Run with a TCP stream feed
fn run_with_tcp(addr: &str, settings: &Settings) -> Result<()> {
    // The runtime must outlive the TUI so the reader task keeps running
    let rt = tokio::runtime::Runtime::new()?;

    let subscription = rt.block_on(async {
        use tokio::net::TcpStream;

        println!("Connecting to {}...", addr);
        let stream = TcpStream::connect(addr)
            .await
            .with_context(|| format!("Failed to connect to {}", addr))?;
        println!("Connected!");
        info!("Connected to {}", addr);
        Ok::<_, anyhow::Error>(Subscription::new(Box::new(StreamFeed::spawn(stream, addr))))
    })?;

    run_tui(subscription, settings)
}

/// Run the TUI with the given subscription
fn run_tui(subscription: Subscription, settings: &Settings) -> Result<()> {
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

    let mut app = App::new(subscription, settings.thresholds.clone());
    app.reload_data();

    let result = run_app(&mut terminal, &mut app, settings.refresh_interval());

    // Release the feed before tearing the terminal down
    app.quit();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();
    let poll_timeout = refresh_interval.min(Duration::from_millis(100));

    while app.running {
        terminal.draw(|frame| ui::render(frame, app))?;

        if let Some(event) = events::poll_event(poll_timeout)? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => events::handle_mouse_event(app, mouse),
                // Terminal will redraw on next iteration
                _ => {}
            }
        }

        if last_refresh.elapsed() >= refresh_interval {
            app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Read the file feed once and write the resulting dashboard view as JSON
fn export_to_file(file: &Path, export_path: &Path, settings: &Settings) -> Result<()> {
    let mut subscription = Subscription::new(Box::new(FileFeed::new(file)));
    let mut dashboard = Dashboard::new(settings.thresholds.clone());

    subscription.dispatch(|event| {
        dashboard.ingest(event, Utc::now());
    });
    subscription.unsubscribe();

    if let Some(err) = dashboard.last_error() {
        anyhow::bail!("Failed to read {}: {}", file.display(), err);
    }

    export_view(&dashboard, export_path)?;
    println!("Exported dashboard state to: {}", export_path.display());
    Ok(())
}
