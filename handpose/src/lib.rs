//! handpose - hand skeleton tracking and pose classification
//!
//! Consumes per-frame hand-landmark payloads (up to two hands, 21 joints
//! each), keeps a per-hand skeleton, derives a scale factor and orientation,
//! classifies a small set of static poses and publishes world-space joint
//! snapshots to a render sink.

pub mod backend;
pub mod config;
pub mod frame;
pub mod mapper;
pub mod pipeline;
pub mod pose;
pub mod skeleton;

pub use config::{PoseConfig, SessionConfig, StreamConfig};
pub use frame::{FrameError, LandmarkFrame};
pub use mapper::{RenderFrame, RenderSink};
pub use pipeline::FramePipeline;
pub use skeleton::{HandSlot, JointLabel, Pose, SkeletonStore};

/// Crate-level error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
