//! Per-hand scale normalization.
//!
//! The wrist-to-middle-knuckle distance, multiplied by an empirical extent
//! ratio, approximates the full hand length.  Its reciprocal rescales every
//! distance the classifier compares, making thresholds scale-invariant.

use tracing::debug;

use crate::skeleton::{distance, Hand, JointLabel};

/// Default ratio of wrist-to-middle-tip over wrist-to-middle-knuckle.
pub const DEFAULT_EXTENT_RATIO: f64 = 2.0;

/// Normalization factor for a wrist/knuckle pair, `None` when degenerate.
pub fn scale_factor(wrist: &[f64; 3], middle_knuckle: &[f64; 3], extent_ratio: f64) -> Option<f64> {
    let d = distance(wrist, middle_knuckle);
    let max_extent = d * extent_ratio;
    if max_extent <= 0.0 || !max_extent.is_finite() {
        return None;
    }
    Some(1.0 / max_extent)
}

/// Unit cross product of the two position vectors, taken from the origin.
///
/// This is not the anatomical palm normal: it is orthogonal to the plane
/// through the origin, the wrist and the knuckle.
pub fn orientation(wrist: &[f64; 3], middle_knuckle: &[f64; 3]) -> Option<[f64; 3]> {
    let c = cross(wrist, middle_knuckle);
    let len = (c[0] * c[0] + c[1] * c[1] + c[2] * c[2]).sqrt();
    if len <= 0.0 || !len.is_finite() {
        return None;
    }
    Some([c[0] / len, c[1] / len, c[2] / len])
}

fn cross(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Recompute a hand's normalization factor and orientation.
///
/// Skipped (prior values kept) when the wrist or middle knuckle was not in
/// the latest frame, or when the two coincide.  Returns whether the factor
/// was updated.
pub fn update(hand: &mut Hand, extent_ratio: f64) -> bool {
    let (Some(wrist), Some(knuckle)) = (
        hand.tracked_position(JointLabel::Wrist),
        hand.tracked_position(JointLabel::MiddleKnuckle),
    ) else {
        debug!("{} hand: wrist or middle knuckle missing, keeping scale", hand.slot.as_str());
        return false;
    };

    let Some(factor) = scale_factor(&wrist, &knuckle, extent_ratio) else {
        debug!("{} hand: wrist and middle knuckle coincide, keeping scale", hand.slot.as_str());
        return false;
    };
    hand.normalization_factor = factor;

    // Collinear with the origin: no plane, keep the previous vector.
    if let Some(o) = orientation(&wrist, &knuckle) {
        hand.orientation = Some(o);
    }
    true
}
