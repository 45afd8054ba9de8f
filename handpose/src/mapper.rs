//! World-position mapping and the render-facing frame snapshot.
//!
//! After each frame the pipeline publishes a [`RenderFrame`] with 42 joint
//! slots (21 per hand).  A slot is enabled only when its landmark arrived in
//! that frame; disabled slots carry no position and must not be moved.

use serde::Serialize;
use std::io::Write;
use tracing::debug;

use crate::skeleton::{Hand, HandSlot, JointLabel, SkeletonStore, JOINT_COUNT};

/// Map a tracker-space position to world space.
///
/// x and y are flipped about 0.5; z is shifted one unit back.
pub fn world_position(p: [f64; 3]) -> [f32; 3] {
    [
        (0.5 - p[0]) as f32,
        (0.5 - p[1]) as f32,
        ((0.5 + p[2]) - 1.0) as f32,
    ]
}

// ── Snapshot types ─────────────────────────────────────────

/// One joint slot as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JointOutput {
    pub label: JointLabel,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world: Option<[f32; 3]>,
}

/// One hand's slots plus its labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HandOutput {
    pub slot: HandSlot,
    pub chirality: String,
    pub pose: String,
    pub joints: Vec<JointOutput>,
}

impl HandOutput {
    fn from_hand(hand: &Hand) -> Self {
        let joints = hand
            .joints
            .iter()
            .map(|j| JointOutput {
                label: j.label,
                enabled: j.tracked,
                world: j.tracked.then(|| world_position(j.position)),
            })
            .collect();
        Self {
            slot: hand.slot,
            chirality: hand.chirality.as_str().to_string(),
            pose: hand.pose.as_str().to_string(),
            joints,
        }
    }

    /// Number of enabled joint slots.
    pub fn enabled_count(&self) -> usize {
        self.joints.iter().filter(|j| j.enabled).count()
    }
}

/// Snapshot published once per processed frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Sequence number of the frame within the session.
    pub frame: u64,
    pub left: HandOutput,
    pub right: HandOutput,
}

impl RenderFrame {
    /// Build the snapshot from the store's current state.
    ///
    /// `frame` is the session sequence number the pipeline assigned.
    pub fn from_store(store: &SkeletonStore, frame: u64) -> Self {
        let left = HandOutput::from_hand(&store.left);
        let right = HandOutput::from_hand(&store.right);
        debug_assert_eq!(left.joints.len(), JOINT_COUNT);
        debug_assert_eq!(right.joints.len(), JOINT_COUNT);
        Self {
            frame,
            left,
            right,
        }
    }

    pub fn hand(&self, slot: HandSlot) -> &HandOutput {
        match slot {
            HandSlot::Left => &self.left,
            HandSlot::Right => &self.right,
        }
    }
}

// ── Sinks ──────────────────────────────────────────────────

/// Consumer of published frames (the rendering side).
pub trait RenderSink {
    fn publish(&mut self, frame: &RenderFrame) -> std::io::Result<()>;
}

/// Writes one JSON object per frame, newline-terminated.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> RenderSink for JsonLinesSink<W> {
    fn publish(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        serde_json::to_writer(&mut self.writer, frame)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()
    }
}

/// Logs a one-line summary per frame at debug level.
#[derive(Debug, Default)]
pub struct LogSink;

impl RenderSink for LogSink {
    fn publish(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        debug!(
            "frame {}: left {} ({} joints), right {} ({} joints)",
            frame.frame,
            frame.left.pose,
            frame.left.enabled_count(),
            frame.right.pose,
            frame.right.enabled_count(),
        );
        Ok(())
    }
}

/// Discards every frame.
#[derive(Debug, Default)]
pub struct NullSink;

impl RenderSink for NullSink {
    fn publish(&mut self, _frame: &RenderFrame) -> std::io::Result<()> {
        Ok(())
    }
}

/// Keeps every published frame in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    pub frames: Vec<RenderFrame>,
}

impl RenderSink for CollectingSink {
    fn publish(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

impl<S: RenderSink + ?Sized> RenderSink for Box<S> {
    fn publish(&mut self, frame: &RenderFrame) -> std::io::Result<()> {
        (**self).publish(frame)
    }
}
