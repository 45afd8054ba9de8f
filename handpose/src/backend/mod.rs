//! Session backend: frame source, signal handling and the event loop.

pub mod stream;

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use anyhow::Context;
use tracing::info;

use crate::config::SessionConfig;
use crate::mapper::RenderSink;
use crate::pipeline::FramePipeline;

pub use stream::{drive, StreamSummary};

/// Global shutdown flag for signal handling.
static SHUTDOWN_REQUESTED: AtomicBool = AtomicBool::new(false);

/// Install signal handlers for graceful shutdown (SIGTERM, SIGINT).
fn install_signal_handlers() {
    unsafe {
        libc::signal(libc::SIGTERM, signal_handler as libc::sighandler_t);
        libc::signal(libc::SIGINT, signal_handler as libc::sighandler_t);
    }
}

extern "C" fn signal_handler(_sig: libc::c_int) {
    SHUTDOWN_REQUESTED.store(true, Ordering::SeqCst);
}

/// Open the frame source: a file of JSON lines, or stdin.
fn open_input(input: Option<&PathBuf>) -> anyhow::Result<Box<dyn BufRead + Send>> {
    match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open input {}", path.display()))?;
            info!("reading frames from {}", path.display());
            Ok(Box::new(BufReader::new(file)))
        }
        None => {
            info!("reading frames from stdin");
            Ok(Box::new(BufReader::new(io::stdin())))
        }
    }
}

/// Run a tracking session until the source closes or a signal arrives.
///
/// Parameters:
/// - `input`: JSON-lines file to read frames from (stdin when `None`)
/// - `sink`: where each processed frame is published
/// - `exit_after`: optional session timeout in seconds
pub fn run(
    config: &SessionConfig,
    input: Option<PathBuf>,
    sink: Box<dyn RenderSink>,
    exit_after: Option<u64>,
) -> anyhow::Result<StreamSummary> {
    config.validate()?;
    install_signal_handlers();

    let reader = open_input(input.as_ref())?;
    let pipeline = FramePipeline::new(config.pose.clone());

    let (summary, state) = drive(
        reader,
        pipeline,
        sink,
        &config.stream,
        exit_after.map(Duration::from_secs),
        &SHUTDOWN_REQUESTED,
    )?;
    info!("final status: {}", state.pipeline.status_sexp());
    Ok(summary)
}
