//! Static pose classification from fingertip distances.
//!
//! Five predicates are evaluated in priority order; the first match wins.
//! Every distance is raw Euclidean, multiplied by the hand's normalization
//! factor before it meets a threshold.

use crate::skeleton::{distance, Hand, JointLabel, Pose};

/// Normalized distances the predicates read.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FingerDistances {
    pub wrist_index: f64,
    pub wrist_middle: f64,
    pub wrist_ring: f64,
    pub wrist_little: f64,
    pub little_ring: f64,
    pub little_index: f64,
    pub ring_middle: f64,
    pub middle_index: f64,
}

/// Threshold pair applied to normalized distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Upper bound for "folded".
    pub close: f64,
    /// Lower bound for "extended".
    pub apart: f64,
}

type Predicate = fn(&FingerDistances, &Thresholds) -> bool;

/// Priority-ordered predicate table.
const PREDICATES: [(Pose, Predicate); 5] = [
    (Pose::Peace, is_peace),
    (Pose::Pointing, is_pointing),
    (Pose::MiddleFinger, is_middle_finger),
    (Pose::Fist, is_fist),
    (Pose::OpenPalm, is_open_palm),
];

// The folded ring and little fingers are bounded by `apart`, not `close`.
fn is_peace(d: &FingerDistances, t: &Thresholds) -> bool {
    d.wrist_index >= t.apart
        && d.wrist_middle >= t.apart
        && d.wrist_little <= t.apart
        && d.wrist_ring <= t.apart
}

fn is_pointing(d: &FingerDistances, t: &Thresholds) -> bool {
    d.wrist_index >= t.apart
        && d.wrist_little <= t.close
        && d.little_ring <= t.close
        && d.ring_middle <= t.close
}

fn is_middle_finger(d: &FingerDistances, t: &Thresholds) -> bool {
    d.wrist_middle >= t.apart
        && d.wrist_little <= t.close
        && d.little_ring <= t.close
        && d.little_index <= t.close
}

fn is_fist(d: &FingerDistances, t: &Thresholds) -> bool {
    d.wrist_little <= t.close
        && d.little_ring <= t.close
        && d.middle_index <= t.close
        && d.ring_middle <= t.close
}

fn is_open_palm(d: &FingerDistances, t: &Thresholds) -> bool {
    d.wrist_index >= t.apart
        && d.wrist_middle >= t.apart
        && d.wrist_little >= t.apart
        && d.wrist_ring >= t.apart
}

/// Compute normalized distances from the five required joints.
///
/// `None` if any of wrist, index, middle, ring or little tip was not in the
/// latest frame.
pub fn finger_distances(hand: &Hand) -> Option<FingerDistances> {
    let wrist = hand.tracked_position(JointLabel::Wrist)?;
    let index = hand.tracked_position(JointLabel::IndexTip)?;
    let middle = hand.tracked_position(JointLabel::MiddleTip)?;
    let ring = hand.tracked_position(JointLabel::RingTip)?;
    let little = hand.tracked_position(JointLabel::LittleTip)?;

    let k = hand.normalization_factor;
    Some(FingerDistances {
        wrist_index: distance(&wrist, &index) * k,
        wrist_middle: distance(&wrist, &middle) * k,
        wrist_ring: distance(&wrist, &ring) * k,
        wrist_little: distance(&wrist, &little) * k,
        little_ring: distance(&little, &ring) * k,
        little_index: distance(&little, &index) * k,
        ring_middle: distance(&ring, &middle) * k,
        middle_index: distance(&middle, &index) * k,
    })
}

/// Evaluate the predicate table against precomputed distances.
pub fn classify_distances(d: &FingerDistances, t: &Thresholds) -> Pose {
    PREDICATES
        .iter()
        .find(|(_, matches)| matches(d, t))
        .map(|(pose, _)| *pose)
        .unwrap_or(Pose::Unknown)
}

/// Classify a hand's current pose. Never cached: always from latest joints.
pub fn classify(hand: &Hand) -> Pose {
    let Some(d) = finger_distances(hand) else {
        return Pose::Unknown;
    };
    let t = Thresholds {
        close: hand.close_threshold,
        apart: hand.apart_threshold,
    };
    classify_distances(&d, &t)
}
