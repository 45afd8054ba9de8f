//! Hand joint labels and per-joint position records.
//!
//! Models the 21 landmarks per hand delivered by the upstream tracker.
//! The landmark index fixes the label; labels are never recomputed.

use serde::Serialize;

// ── Joint labels ───────────────────────────────────────────

/// The 21 tracked hand landmarks, in landmark-index order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum JointLabel {
    Wrist,
    ThumbKnuckle,
    ThumbIntermediateBase,
    ThumbIntermediateTip,
    ThumbTip,
    IndexKnuckle,
    IndexIntermediateBase,
    IndexIntermediateTip,
    IndexTip,
    MiddleKnuckle,
    MiddleIntermediateBase,
    MiddleIntermediateTip,
    MiddleTip,
    RingKnuckle,
    RingIntermediateBase,
    RingIntermediateTip,
    RingTip,
    LittleKnuckle,
    LittleIntermediateBase,
    LittleIntermediateTip,
    LittleTip,
    /// Any index outside 0-20.
    Unknown,
}

/// Total number of joints per hand.
pub const JOINT_COUNT: usize = 21;

/// All labels in landmark-index order.
const LABELS: [JointLabel; JOINT_COUNT] = [
    JointLabel::Wrist,
    JointLabel::ThumbKnuckle,
    JointLabel::ThumbIntermediateBase,
    JointLabel::ThumbIntermediateTip,
    JointLabel::ThumbTip,
    JointLabel::IndexKnuckle,
    JointLabel::IndexIntermediateBase,
    JointLabel::IndexIntermediateTip,
    JointLabel::IndexTip,
    JointLabel::MiddleKnuckle,
    JointLabel::MiddleIntermediateBase,
    JointLabel::MiddleIntermediateTip,
    JointLabel::MiddleTip,
    JointLabel::RingKnuckle,
    JointLabel::RingIntermediateBase,
    JointLabel::RingIntermediateTip,
    JointLabel::RingTip,
    JointLabel::LittleKnuckle,
    JointLabel::LittleIntermediateBase,
    JointLabel::LittleIntermediateTip,
    JointLabel::LittleTip,
];

impl JointLabel {
    /// Map a landmark index to its label. Total: out-of-range is `Unknown`.
    pub fn from_index(index: usize) -> Self {
        LABELS.get(index).copied().unwrap_or(Self::Unknown)
    }

    /// Landmark index (0-20), or `None` for `Unknown`.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Unknown => None,
            other => Some(*other as usize),
        }
    }

    /// All 21 real labels in index order.
    pub fn all() -> &'static [JointLabel; JOINT_COUNT] {
        &LABELS
    }

    /// String representation for status output and name lookups.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbKnuckle => "thumb-knuckle",
            Self::ThumbIntermediateBase => "thumb-intermediate-base",
            Self::ThumbIntermediateTip => "thumb-intermediate-tip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexKnuckle => "index-knuckle",
            Self::IndexIntermediateBase => "index-intermediate-base",
            Self::IndexIntermediateTip => "index-intermediate-tip",
            Self::IndexTip => "index-tip",
            Self::MiddleKnuckle => "middle-knuckle",
            Self::MiddleIntermediateBase => "middle-intermediate-base",
            Self::MiddleIntermediateTip => "middle-intermediate-tip",
            Self::MiddleTip => "middle-tip",
            Self::RingKnuckle => "ring-knuckle",
            Self::RingIntermediateBase => "ring-intermediate-base",
            Self::RingIntermediateTip => "ring-intermediate-tip",
            Self::RingTip => "ring-tip",
            Self::LittleKnuckle => "little-knuckle",
            Self::LittleIntermediateBase => "little-intermediate-base",
            Self::LittleIntermediateTip => "little-intermediate-tip",
            Self::LittleTip => "little-tip",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a joint name as produced by [`JointLabel::as_str`].
    pub fn from_name(name: &str) -> Option<Self> {
        LABELS.iter().copied().find(|label| label.as_str() == name)
    }
}

// ── Joint ──────────────────────────────────────────────────

/// Position data for a single joint slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Joint {
    /// Label fixed by slot index at construction.
    pub label: JointLabel,
    /// Raw tracker-space position (x, y, z).
    pub position: [f64; 3],
    /// Whether this slot has ever received a landmark.
    pub valid: bool,
    /// Whether this slot was supplied by the latest frame for its hand.
    pub tracked: bool,
}

impl Joint {
    /// Placeholder joint: zero position, label pre-assigned.
    pub fn placeholder(label: JointLabel) -> Self {
        Self {
            label,
            position: [0.0; 3],
            valid: false,
            tracked: false,
        }
    }
}

/// Euclidean distance between two 3D points.
pub fn distance(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    let dx = b[0] - a[0];
    let dy = b[1] - a[1];
    let dz = b[2] - a[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}
