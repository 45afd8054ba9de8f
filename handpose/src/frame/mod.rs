//! Landmark frames: typed result of decoding one tracker payload.
//!
//! Provides:
//! - `decoder`: payload bytes → `LandmarkFrame`
//! - `FrameError`: why a payload was dropped

pub mod decoder;

pub use decoder::{decode, mirror_handedness};

/// Maximum hands carried by one frame.
pub const MAX_HANDS: usize = 2;

/// One decoded landmark: which hand, which joint, where.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkTuple {
    pub hand_index: usize,
    pub joint_index: usize,
    pub position: [f64; 3],
}

/// Structured content of one frame payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LandmarkFrame {
    /// Landmarks in (hand, joint) order.
    pub landmarks: Vec<LandmarkTuple>,
    /// Mirror-corrected handedness labels, indexed by hand.
    pub handedness: Vec<String>,
    /// Number of hands carried (at most `MAX_HANDS`).
    pub hand_count: usize,
}

impl LandmarkFrame {
    /// Handedness label for a hand index, if the payload gave one.
    pub fn handedness_for(&self, hand_index: usize) -> Option<&str> {
        self.handedness.get(hand_index).map(String::as_str)
    }

    /// Landmarks belonging to one hand.
    pub fn hand_landmarks(&self, hand_index: usize) -> impl Iterator<Item = &LandmarkTuple> {
        self.landmarks
            .iter()
            .filter(move |l| l.hand_index == hand_index)
    }
}

/// Reasons a payload is discarded whole.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("payload shape is not a list of hands of joint records: {0}")]
    Shape(String),
}
