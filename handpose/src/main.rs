//! handpose - hand pose tracking session
//!
//! Reads hand-landmark frames as JSON lines and publishes skeleton snapshots.

use std::io;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing::info;

use handpose::backend;
use handpose::config::SessionConfig;
use handpose::mapper::{JsonLinesSink, LogSink, NullSink, RenderSink};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Emit {
    /// One JSON object per frame on stdout
    Json,
    /// Per-frame summary at debug level
    Log,
    /// Discard output
    None,
}

#[derive(Parser, Debug)]
#[command(name = "handpose", about = "Hand skeleton tracking and pose classification")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON-lines frame source (default: stdin)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Where processed frames go
    #[arg(long, value_enum, default_value = "json")]
    emit: Emit,

    /// Exit after N seconds
    #[arg(long)]
    exit_after: Option<u64>,

    /// Show version and exit
    #[arg(long)]
    version: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("handpose {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    // Logs go to stderr so stdout stays clean for frame output.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "handpose=info".into()),
        )
        .init();

    info!("handpose v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match &cli.config {
        Some(path) => {
            info!("loading config from {}", path.display());
            SessionConfig::load(path)?
        }
        None => SessionConfig::default(),
    };

    let sink: Box<dyn RenderSink> = match cli.emit {
        Emit::Json => Box::new(JsonLinesSink::new(io::stdout())),
        Emit::Log => Box::new(LogSink),
        Emit::None => Box::new(NullSink),
    };

    let summary = backend::run(&config, cli.input, sink, cli.exit_after)?;
    info!(
        "session ended: {} frame(s) processed, {} dropped",
        summary.stats.processed, summary.stats.dropped
    );
    Ok(())
}
