// gridsync CLI - scripted replays and an interactive terminal grid

mod exit_codes;
mod replay;
mod tui;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use gridsync_config::Settings;
use gridsync_core::GridBounds;
use gridsync_interact::{GridSession, ManualClock, MemorySurface, RecordingSession, SessionConfig};
use gridsync_protocol::{parse_script, RemoteSession};
use gridsync_session_client::{BackgroundSession, SessionClient};

use exit_codes::{EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "gridsync")]
#[command(about = "Grid interaction engine: replay event scripts or drive a terminal grid")]
#[command(version)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Settings file (default: <config dir>/gridsync/settings.json)
    #[arg(long, global = true, env = "GRIDSYNC_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by commands that open a session.
#[derive(clap::Args)]
struct SessionArgs {
    /// Session service base URL (overrides sync.endpoint)
    #[arg(long, conflicts_with = "dry_run")]
    endpoint: Option<String>,

    /// Record remote calls instead of sending them
    #[arg(long)]
    dry_run: bool,

    /// Grid rows (overrides grid.rows)
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns (overrides grid.cols)
    #[arg(long)]
    cols: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a JSONL event script headlessly and print the final state as JSON
    #[command(after_help = "\
Examples:
  gridsync replay drag.jsonl --dry-run
  gridsync replay session.jsonl --endpoint http://127.0.0.1:5000")]
    Replay {
        /// Script file, one JSON event per line
        script: PathBuf,

        #[command(flatten)]
        session: SessionArgs,
    },

    /// Open an interactive grid in the terminal
    Grid {
        #[command(flatten)]
        session: SessionArgs,
    },

    /// Show the effective settings
    Config {
        /// Write a commented default settings file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    // The grid owns the terminal; only log there when asked to.
    let interactive = matches!(cli.command, Commands::Grid { .. });
    init_logging(cli.verbose, interactive);

    let settings_path = cli.config.unwrap_or_else(Settings::config_path);
    let result = match cli.command {
        Commands::Replay { script, session } => cmd_replay(&settings_path, &script, session),
        Commands::Grid { session } => cmd_grid(&settings_path, session),
        Commands::Config { init } => cmd_config(&settings_path, init),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: bool, interactive: bool) {
    let explicit = std::env::var_os("RUST_LOG").is_some();
    if interactive && !verbose && !explicit {
        return;
    }
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_millis()
        .init();
}

/// Settings file values with command-line overrides applied.
fn effective_settings(path: &Path, args: &SessionArgs) -> Result<Settings, CliError> {
    let mut settings = Settings::load_from(path);
    if let Some(endpoint) = &args.endpoint {
        settings.endpoint = endpoint.clone();
    }
    if let Some(rows) = args.rows {
        settings.rows = rows;
    }
    if let Some(cols) = args.cols {
        settings.cols = cols;
    }
    if settings.rows == 0 || settings.cols == 0 {
        return Err(CliError::args("grid must have at least one row and one column"));
    }
    Ok(settings)
}

fn http_client(settings: &Settings) -> Result<SessionClient, CliError> {
    SessionClient::new(&settings.endpoint, settings.request_timeout()).map_err(|e| {
        CliError::runtime(e.to_string()).with_hint("set sync.endpoint or pass --endpoint")
    })
}

fn cmd_replay(settings_path: &Path, script: &Path, args: SessionArgs) -> Result<(), CliError> {
    let settings = effective_settings(settings_path, &args)?;
    let text = std::fs::read_to_string(script)
        .map_err(|e| CliError::args(format!("cannot read {}: {}", script.display(), e)))?;
    let events = parse_script(&text)
        .map_err(|e| CliError::args(format!("{}: {}", script.display(), e)))?;

    let surface = MemorySurface::new(GridBounds::new(settings.rows, settings.cols));
    let config = SessionConfig::from(&settings);
    let clock = ManualClock::new();

    let output = if args.dry_run {
        let mut session = GridSession::new(surface, RecordingSession::new(), config);
        let summary = replay::run(&events, &mut session, &clock);
        serde_json::json!({
            "summary": summary,
            "requests": session.remote().requests(),
        })
    } else {
        // Replays stay deterministic: calls go out in order on this thread.
        let mut session = GridSession::new(surface, http_client(&settings)?, config);
        let summary = replay::run(&events, &mut session, &clock);
        if summary.remote_failures > 0 {
            log::warn!("{} of {} remote calls failed", summary.remote_failures, summary.remote_calls);
        }
        serde_json::json!({ "summary": summary })
    };

    let rendered = serde_json::to_string_pretty(&output)
        .map_err(|e| CliError::runtime(e.to_string()))?;
    println!("{}", rendered);
    Ok(())
}

fn cmd_grid(settings_path: &Path, args: SessionArgs) -> Result<(), CliError> {
    let settings = effective_settings(settings_path, &args)?;
    let remote: Box<dyn RemoteSession> = if args.dry_run {
        Box::new(RecordingSession::new())
    } else {
        let client = http_client(&settings)?;
        let worker = BackgroundSession::spawn(client)
            .map_err(|e| CliError::runtime(format!("failed to start sync worker: {}", e)))?;
        Box::new(worker)
    };

    let surface = MemorySurface::new(GridBounds::new(settings.rows, settings.cols));
    let session = GridSession::new(surface, remote, SessionConfig::from(&settings));
    let label = if args.dry_run { "dry run".to_string() } else { settings.endpoint.clone() };
    tui::run(session, label).map_err(CliError::runtime)
}

fn cmd_config(settings_path: &Path, init: bool) -> Result<(), CliError> {
    if init {
        let created = Settings::create_default_file(settings_path)
            .map_err(|e| CliError::args(format!("{}: {}", settings_path.display(), e)))?;
        if created {
            eprintln!("wrote {}", settings_path.display());
        } else {
            eprintln!("{} already exists, left unchanged", settings_path.display());
        }
    }

    let settings = Settings::load_from(settings_path);
    let rendered = serde_json::to_string_pretty(&settings)
        .map_err(|e| CliError::runtime(e.to_string()))?;
    println!("// {}", settings_path.display());
    println!("{}", rendered);
    Ok(())
}
