//! Per-hand aggregate: joints, chirality, pose and scale state.

use serde::Serialize;

use super::joint::{Joint, JointLabel, JOINT_COUNT};

// ── Slot ───────────────────────────────────────────────────

/// Which of the two store slots a hand occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandSlot {
    Left,
    Right,
}

impl HandSlot {
    /// Slot for a hand index within a frame (0 = left, 1 = right).
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    /// Parse slot string ("left" or "right").
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

// ── Chirality ──────────────────────────────────────────────

/// Physical handedness as reported (after mirror correction) upstream.
///
/// Not validated: a consistently wrong upstream label is undetectable here.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Chirality {
    Left,
    Right,
    #[default]
    Unknown,
    /// A label other than Left/Right, kept verbatim.
    Other(String),
}

impl Chirality {
    /// Build from a decoded handedness label. Empty means unknown.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Left" => Self::Left,
            "Right" => Self::Right,
            "" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Unknown => "unknown",
            Self::Other(label) => label,
        }
    }
}

// ── Pose ───────────────────────────────────────────────────

/// Static pose vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pose {
    OpenPalm,
    Fist,
    Pointing,
    Peace,
    /// Middle finger extended, the others folded.
    MiddleFinger,
    #[default]
    Unknown,
}

impl Pose {
    /// String representation for status output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenPalm => "open-palm",
            Self::Fist => "fist",
            Self::Pointing => "pointing",
            Self::Peace => "peace",
            Self::MiddleFinger => "middle-finger",
            Self::Unknown => "unknown",
        }
    }
}

// ── Hand ───────────────────────────────────────────────────

/// Default upper bound for "folded" distances, after normalization.
pub const DEFAULT_CLOSE_THRESHOLD: f64 = 0.31;
/// Default lower bound for "extended" distances, after normalization.
pub const DEFAULT_APART_THRESHOLD: f64 = 0.75;

/// Complete state for one hand slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    /// Slot this hand lives in.
    pub slot: HandSlot,
    /// Last reported chirality.
    pub chirality: Chirality,
    /// 21 joints indexed by landmark index.
    pub joints: [Joint; JOINT_COUNT],
    /// Last classified pose.
    pub pose: Pose,
    /// Multiplier applied to raw distances before threshold comparison.
    pub normalization_factor: f64,
    /// Upper bound for a folded finger, after normalization.
    pub close_threshold: f64,
    /// Lower bound for an extended finger, after normalization.
    pub apart_threshold: f64,
    /// Unit vector, `None` until the first frame that can produce one.
    pub orientation: Option<[f64; 3]>,
    /// Whether the latest frame carried this hand.
    pub present: bool,
}

impl Hand {
    /// Fresh hand with 21 placeholder joints and default thresholds.
    pub fn new(slot: HandSlot) -> Self {
        Self::with_thresholds(slot, DEFAULT_CLOSE_THRESHOLD, DEFAULT_APART_THRESHOLD)
    }

    pub fn with_thresholds(slot: HandSlot, close_threshold: f64, apart_threshold: f64) -> Self {
        Self {
            slot,
            chirality: Chirality::Unknown,
            joints: std::array::from_fn(|i| Joint::placeholder(JointLabel::from_index(i))),
            pose: Pose::Unknown,
            normalization_factor: 1.0,
            close_threshold,
            apart_threshold,
            orientation: None,
            present: false,
        }
    }

    /// Direct indexed access by label.
    pub fn joint(&self, label: JointLabel) -> Option<&Joint> {
        label.index().map(|i| &self.joints[i])
    }

    /// Position of a joint supplied by the latest frame, if it was.
    pub fn tracked_position(&self, label: JointLabel) -> Option<[f64; 3]> {
        self.joint(label)
            .filter(|j| j.tracked)
            .map(|j| j.position)
    }

    /// Number of joints supplied by the latest frame.
    pub fn tracked_count(&self) -> usize {
        self.joints.iter().filter(|j| j.tracked).count()
    }
}
