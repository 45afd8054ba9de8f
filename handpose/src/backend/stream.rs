//! Stream backend: single-consumer frame queue on a calloop event loop.
//!
//! A transport thread pushes raw payloads into a calloop channel; the event
//! loop is the only consumer and runs each payload through the pipeline to
//! completion before taking the next.  Teardown stops draining and drops
//! the store.

use std::io::BufRead;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use calloop::channel::{self, Channel, Event};
use calloop::EventLoop;
use tracing::{debug, info, warn};

use crate::config::StreamConfig;
use crate::mapper::RenderSink;
use crate::pipeline::{FramePipeline, PipelineStats};

/// Producer end of the frame queue, bounded or not.
#[derive(Clone)]
pub enum FrameSender {
    Unbounded(channel::Sender<Vec<u8>>),
    Bounded(channel::SyncSender<Vec<u8>>),
}

impl FrameSender {
    /// Enqueue a payload. Blocks when a bounded queue is full.
    /// Returns false once the consumer is gone.
    pub fn send(&self, payload: Vec<u8>) -> bool {
        match self {
            Self::Unbounded(tx) => tx.send(payload).is_ok(),
            Self::Bounded(tx) => tx.send(payload).is_ok(),
        }
    }
}

/// Create the frame queue. `capacity == 0` means unbounded.
pub fn frame_queue(capacity: usize) -> (FrameSender, Channel<Vec<u8>>) {
    if capacity == 0 {
        let (tx, rx) = channel::channel();
        (FrameSender::Unbounded(tx), rx)
    } else {
        let (tx, rx) = channel::sync_channel(capacity);
        (FrameSender::Bounded(tx), rx)
    }
}

/// Transport stand-in: one JSON payload per non-empty line.
///
/// The thread ends at EOF, on a read error, or when the queue is closed.
pub fn spawn_line_reader<R>(reader: R, tx: FrameSender) -> JoinHandle<u64>
where
    R: BufRead + Send + 'static,
{
    thread::spawn(move || {
        let mut sent = 0u64;
        for line in reader.lines() {
            let line = match line {
                Ok(l) => l,
                Err(e) => {
                    warn!("frame source read error: {}", e);
                    break;
                }
            };
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !tx.send(trimmed.as_bytes().to_vec()) {
                debug!("frame queue closed, stopping reader");
                break;
            }
            sent += 1;
        }
        debug!("frame source finished after {} payload(s)", sent);
        sent
    })
}

/// Event loop state: the pipeline plus where its output goes.
pub struct StreamState<S: RenderSink> {
    pub pipeline: FramePipeline,
    pub sink: S,
    pub running: bool,
    pub sink_errors: u64,
}

impl<S: RenderSink> StreamState<S> {
    pub fn new(pipeline: FramePipeline, sink: S) -> Self {
        Self {
            pipeline,
            sink,
            running: true,
            sink_errors: 0,
        }
    }

    /// Run one payload through the pipeline and publish the result.
    fn handle_payload(&mut self, payload: &[u8]) {
        // Dropped frames are already logged and counted by the pipeline.
        let Ok(frame) = self.pipeline.process(payload) else {
            return;
        };
        if let Err(e) = self.sink.publish(&frame) {
            self.sink_errors += 1;
            warn!("render sink rejected frame {}: {}", frame.frame, e);
        }
    }
}

/// Totals reported when a stream ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamSummary {
    pub stats: PipelineStats,
    pub sink_errors: u64,
}

/// Drive the queue until the source closes, `shutdown` is raised, or
/// `exit_after` elapses.
///
/// Returns the final state so callers can inspect the sink.
pub fn drive<R, S>(
    reader: R,
    pipeline: FramePipeline,
    sink: S,
    config: &StreamConfig,
    exit_after: Option<Duration>,
    shutdown: &AtomicBool,
) -> anyhow::Result<(StreamSummary, StreamState<S>)>
where
    R: BufRead + Send + 'static,
    S: RenderSink,
{
    let mut event_loop: EventLoop<StreamState<S>> = EventLoop::try_new()?;
    let mut state = StreamState::new(pipeline, sink);

    let (tx, rx) = frame_queue(config.queue_capacity);
    event_loop
        .handle()
        .insert_source(rx, |event, _, state: &mut StreamState<S>| match event {
            Event::Msg(payload) => state.handle_payload(&payload),
            Event::Closed => {
                info!("frame source closed");
                state.running = false;
            }
        })
        .map_err(|e| anyhow::anyhow!("failed to register frame queue: {}", e.error))?;

    // Not joined: a reader blocked on stdin must not hold up teardown.
    let _reader = spawn_line_reader(reader, tx);

    let start_time = Instant::now();
    let mut last_status_log = Instant::now();
    let status_interval = Duration::from_secs(config.status_interval_secs);
    let poll_interval = Duration::from_millis(config.poll_interval_ms);
    info!(
        "Stream backend initialized (poll interval: {}ms, queue: {}), entering event loop",
        config.poll_interval_ms,
        if config.queue_capacity == 0 {
            "unbounded".to_string()
        } else {
            config.queue_capacity.to_string()
        }
    );

    while state.running {
        if shutdown.load(Ordering::SeqCst) {
            info!("Shutdown signal received, exiting");
            state.running = false;
            break;
        }

        if let Some(dur) = exit_after {
            if start_time.elapsed() >= dur {
                info!("Exit timer fired after {}s", dur.as_secs());
                state.running = false;
                break;
            }
        }

        if config.status_interval_secs > 0 && last_status_log.elapsed() >= status_interval {
            let stats = state.pipeline.stats();
            info!(
                "Stream status: {} frame(s) processed, {} dropped",
                stats.processed, stats.dropped
            );
            last_status_log = Instant::now();
        }

        event_loop.dispatch(Some(poll_interval), &mut state)?;
    }

    let summary = StreamSummary {
        stats: state.pipeline.stats(),
        sink_errors: state.sink_errors,
    };
    info!(
        "Stream backend shutting down ({} processed, {} dropped, {} sink error(s))",
        summary.stats.processed, summary.stats.dropped, summary.sink_errors
    );
    Ok((summary, state))
}
