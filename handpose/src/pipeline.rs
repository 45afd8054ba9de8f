//! Per-frame pipeline: decode → store → normalize → classify → map.
//!
//! One call to [`FramePipeline::process`] is one atomic unit of work against
//! the store.  Decoding completes before anything is written, so a dropped
//! frame leaves the store untouched.

use tracing::{debug, warn};

use crate::config::PoseConfig;
use crate::frame::{self, FrameError};
use crate::mapper::RenderFrame;
use crate::skeleton::SkeletonStore;

/// Frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineStats {
    pub processed: u64,
    pub dropped: u64,
}

/// Owns the session's skeleton store and runs frames through it.
pub struct FramePipeline {
    store: SkeletonStore,
    stats: PipelineStats,
}

impl FramePipeline {
    pub fn new(config: PoseConfig) -> Self {
        Self {
            store: SkeletonStore::new(config),
            stats: PipelineStats::default(),
        }
    }

    /// Read-only view of the store for renderers and diagnostics.
    pub fn store(&self) -> &SkeletonStore {
        &self.store
    }

    pub fn stats(&self) -> PipelineStats {
        self.stats
    }

    /// Process one raw payload and return the snapshot to publish.
    pub fn process(&mut self, payload: &[u8]) -> Result<RenderFrame, FrameError> {
        let decoded = match frame::decode(payload) {
            Ok(f) => f,
            Err(e) => {
                self.stats.dropped += 1;
                warn!("dropping frame: {}", e);
                return Err(e);
            }
        };

        self.store.apply_frame(&decoded);
        self.stats.processed += 1;
        debug!("{}", self.store.status_sexp());

        Ok(RenderFrame::from_store(&self.store, self.stats.processed))
    }

    /// Re-initialize the store; counters are kept.
    pub fn reset(&mut self) {
        self.store.reset();
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:processed {} :dropped {} :store {})",
            self.stats.processed,
            self.stats.dropped,
            self.store.status_sexp()
        )
    }
}
