//! Two-slot skeleton store.
//!
//! Owns the left and right `Hand` records for a session.  The only
//! mutation path is [`SkeletonStore::apply_frame`], which writes joints and
//! chirality and then re-derives scale and pose for every hand the frame
//! carried.

use tracing::{debug, trace};

use super::hand::{Chirality, Hand, HandSlot, Pose};
use super::joint::{distance, Joint, JointLabel, JOINT_COUNT};
use crate::config::PoseConfig;
use crate::frame::LandmarkFrame;
use crate::pose::{classifier, normalizer};

/// Central skeleton state for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct SkeletonStore {
    /// Thresholds and scale constants in effect.
    pub config: PoseConfig,
    /// Left slot (frame hand index 0).
    pub left: Hand,
    /// Right slot (frame hand index 1).
    pub right: Hand,
}

impl Default for SkeletonStore {
    fn default() -> Self {
        Self::new(PoseConfig::default())
    }
}

impl SkeletonStore {
    /// Create a store with placeholder joints in both slots.
    pub fn new(config: PoseConfig) -> Self {
        let left = Hand::with_thresholds(
            HandSlot::Left,
            config.close_threshold,
            config.apart_threshold,
        );
        let right = Hand::with_thresholds(
            HandSlot::Right,
            config.close_threshold,
            config.apart_threshold,
        );
        Self {
            config,
            left,
            right,
        }
    }

    /// Get the hand in a given slot.
    pub fn hand(&self, slot: HandSlot) -> &Hand {
        match slot {
            HandSlot::Left => &self.left,
            HandSlot::Right => &self.right,
        }
    }

    /// Get a mutable reference to the hand in a given slot.
    fn hand_mut(&mut self, slot: HandSlot) -> &mut Hand {
        match slot {
            HandSlot::Left => &mut self.left,
            HandSlot::Right => &mut self.right,
        }
    }

    /// Apply a decoded frame, then re-normalize and re-classify.
    ///
    /// Hands the frame does not carry keep their joints, factor and pose.
    pub fn apply_frame(&mut self, frame: &LandmarkFrame) {
        for slot in [HandSlot::Left, HandSlot::Right] {
            let hand = self.hand_mut(slot);
            hand.present = false;
            for joint in hand.joints.iter_mut() {
                joint.tracked = false;
            }
        }

        for hand_index in 0..frame.hand_count {
            let Some(slot) = HandSlot::from_index(hand_index) else {
                continue;
            };
            let hand = self.hand_mut(slot);
            for landmark in frame.hand_landmarks(hand_index) {
                if landmark.joint_index >= JOINT_COUNT {
                    continue;
                }
                let joint = &mut hand.joints[landmark.joint_index];
                joint.position = landmark.position;
                joint.valid = true;
                joint.tracked = true;
                hand.present = true;
            }
            hand.chirality = frame
                .handedness_for(hand_index)
                .map(Chirality::from_label)
                .unwrap_or_default();
        }

        let extent_ratio = self.config.extent_ratio;
        for slot in [HandSlot::Left, HandSlot::Right] {
            let hand = self.hand_mut(slot);
            if !hand.present {
                continue;
            }
            normalizer::update(hand, extent_ratio);
            hand.pose = classifier::classify(hand);
            trace!(
                "{} hand: {} joints tracked, factor {:.3}",
                slot.as_str(),
                hand.tracked_count(),
                hand.normalization_factor
            );
        }

        debug!(
            left_pose = self.left.pose.as_str(),
            left_chirality = self.left.chirality.as_str(),
            right_pose = self.right.pose.as_str(),
            right_chirality = self.right.chirality.as_str(),
            "frame applied"
        );
    }

    /// Current pose for a slot.
    pub fn pose(&self, slot: HandSlot) -> Pose {
        self.hand(slot).pose
    }

    /// Euclidean distance between two joints on the same hand, raw units.
    pub fn joint_distance(&self, slot: HandSlot, a: JointLabel, b: JointLabel) -> Option<f64> {
        let hand = self.hand(slot);
        let pa = hand.joint(a)?;
        let pb = hand.joint(b)?;
        Some(distance(&pa.position, &pb.position))
    }

    /// Look up a joint by slot and joint name strings.
    pub fn joint_by_name(&self, slot: &str, joint: &str) -> Option<&Joint> {
        let slot = HandSlot::from_name(slot)?;
        let label = JointLabel::from_name(joint)?;
        self.hand(slot).joint(label)
    }

    /// Re-run initialization: placeholder joints, default pose and scale.
    pub fn reset(&mut self) {
        *self = Self::new(self.config.clone());
    }

    /// Generate s-expression for status output.
    pub fn status_sexp(&self) -> String {
        format!(
            "(:left {} :right {})",
            hand_sexp(&self.left),
            hand_sexp(&self.right),
        )
    }
}

fn hand_sexp(hand: &Hand) -> String {
    format!(
        "(:present {} :chirality \"{}\" :pose {} :factor {:.3} :tracked {})",
        if hand.present { "t" } else { "nil" },
        hand.chirality.as_str(),
        hand.pose.as_str(),
        hand.normalization_factor,
        hand.tracked_count(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::LandmarkTuple;

    /// Build a frame for one hand from (joint index, position) pairs.
    fn frame_with(hand_index: usize, joints: &[(usize, [f64; 3])], label: &str) -> LandmarkFrame {
        let landmarks = joints
            .iter()
            .map(|(j, p)| LandmarkTuple {
                hand_index,
                joint_index: *j,
                position: *p,
            })
            .collect();
        let mut handedness = vec![String::new(); hand_index + 1];
        handedness[hand_index] = label.to_string();
        LandmarkFrame {
            landmarks,
            handedness,
            hand_count: hand_index + 1,
        }
    }

    fn fist_joints() -> Vec<(usize, [f64; 3])> {
        vec![
            (0, [0.0, 0.0, 0.0]),
            (9, [0.0, 0.15, 0.0]),
            (20, [0.05, 0.0, 0.0]),
            (16, [0.06, 0.0, 0.0]),
            (12, [0.07, 0.0, 0.0]),
            (8, [0.08, 0.0, 0.0]),
        ]
    }

    #[test]
    fn test_new_store() {
        let store = SkeletonStore::default();
        assert_eq!(store.left.joints.len(), JOINT_COUNT);
        assert_eq!(store.right.joints.len(), JOINT_COUNT);
        assert_eq!(store.left.slot, HandSlot::Left);
        assert_eq!(store.right.slot, HandSlot::Right);
        assert!(!store.left.present && !store.right.present);
    }

    #[test]
    fn test_apply_fist_frame() {
        let mut store = SkeletonStore::default();
        store.apply_frame(&frame_with(0, &fist_joints(), "Right"));

        assert!(store.left.present);
        assert!(!store.right.present);
        assert_eq!(store.left.pose, Pose::Fist);
        assert_eq!(store.left.chirality, Chirality::Right);
        assert!((store.left.normalization_factor - 1.0 / 0.3).abs() < 1e-9);
        assert_eq!(store.right.pose, Pose::Unknown);
    }

    #[test]
    fn test_absent_hand_keeps_state() {
        let mut store = SkeletonStore::default();
        let mut two_hands = frame_with(1, &fist_joints(), "Left");
        two_hands.landmarks.extend(frame_with(0, &fist_joints(), "").landmarks);
        store.apply_frame(&two_hands);
        assert_eq!(store.right.pose, Pose::Fist);
        let right_before = store.right.joints.clone();

        store.apply_frame(&frame_with(0, &fist_joints(), "Right"));
        assert!(!store.right.present);
        assert_eq!(store.right.pose, Pose::Fist);
        assert_eq!(store.right.chirality, Chirality::Left);
        for (before, after) in right_before.iter().zip(store.right.joints.iter()) {
            assert_eq!(before.position, after.position);
        }
    }

    #[test]
    fn test_landmarks_applied_per_hand() {
        let mut store = SkeletonStore::default();
        let mut frame = frame_with(1, &fist_joints(), "Left");
        frame.landmarks.extend(frame_with(0, &[(0, [0.4, 0.4, 0.0])], "").landmarks);
        store.apply_frame(&frame);
        assert_eq!(store.left.tracked_count(), 1);
        assert_eq!(store.left.joints[0].position, [0.4, 0.4, 0.0]);
        assert_eq!(store.right.tracked_count(), fist_joints().len());

        // A hand index past the frame's hand count has no slot data.
        frame.hand_count = 1;
        let mut fresh = SkeletonStore::default();
        fresh.apply_frame(&frame);
        assert!(!fresh.right.present);
        assert_eq!(fresh.right.tracked_count(), 0);
    }

    #[test]
    fn test_missing_joint_keeps_position() {
        let mut store = SkeletonStore::default();
        store.apply_frame(&frame_with(0, &fist_joints(), "Left"));
        store.apply_frame(&frame_with(0, &[(0, [0.5, 0.5, 0.0])], "Left"));

        let tip = &store.left.joints[JointLabel::IndexTip.index().unwrap()];
        assert_eq!(tip.position, [0.08, 0.0, 0.0]);
        assert!(tip.valid);
        assert!(!tip.tracked);
        assert_eq!(store.left.joints[0].position, [0.5, 0.5, 0.0]);
        // Classifier joints missing this frame.
        assert_eq!(store.left.pose, Pose::Unknown);
    }

    #[test]
    fn test_missing_handedness_is_unknown() {
        let mut store = SkeletonStore::default();
        store.apply_frame(&frame_with(0, &fist_joints(), "Right"));
        assert_eq!(store.left.chirality, Chirality::Right);

        let mut frame = frame_with(0, &fist_joints(), "");
        frame.handedness.clear();
        store.apply_frame(&frame);
        assert_eq!(store.left.chirality, Chirality::Unknown);
    }

    #[test]
    fn test_idempotent_apply() {
        let mut store = SkeletonStore::default();
        let frame = frame_with(0, &fist_joints(), "Left");
        store.apply_frame(&frame);
        let first = store.clone();
        store.apply_frame(&frame);
        assert_eq!(first, store);
    }

    #[test]
    fn test_joint_distance() {
        let mut store = SkeletonStore::default();
        store.apply_frame(&frame_with(
            1,
            &[(4, [0.0, 0.0, 0.0]), (8, [3.0, 4.0, 0.0])],
            "Left",
        ));
        let d = store
            .joint_distance(HandSlot::Right, JointLabel::ThumbTip, JointLabel::IndexTip)
            .unwrap();
        assert!((d - 5.0).abs() < 1e-9, "Expected 5.0, got {}", d);
        assert!(store
            .joint_distance(HandSlot::Right, JointLabel::Unknown, JointLabel::IndexTip)
            .is_none());
    }

    #[test]
    fn test_joint_by_name() {
        let mut store = SkeletonStore::default();
        store.apply_frame(&frame_with(0, &fist_joints(), "Left"));
        let joint = store.joint_by_name("left", "index-tip").unwrap();
        assert_eq!(joint.position, [0.08, 0.0, 0.0]);
        assert!(store.joint_by_name("middle", "index-tip").is_none());
        assert!(store.joint_by_name("left", "palm").is_none());
    }

    #[test]
    fn test_reset() {
        let mut store = SkeletonStore::default();
        store.apply_frame(&frame_with(0, &fist_joints(), "Left"));
        store.reset();
        assert_eq!(store, SkeletonStore::default());
    }

    #[test]
    fn test_custom_thresholds_reach_hands() {
        let config = PoseConfig {
            close_threshold: 0.2,
            apart_threshold: 0.9,
            ..PoseConfig::default()
        };
        let store = SkeletonStore::new(config);
        assert_eq!(store.left.close_threshold, 0.2);
        assert_eq!(store.right.apart_threshold, 0.9);
    }

    #[test]
    fn test_status_sexp() {
        let mut store = SkeletonStore::default();
        let sexp = store.status_sexp();
        assert!(sexp.starts_with("(:left (:present nil"));
        assert!(sexp.contains(":left (:present nil :chirality \"unknown\" :pose unknown"));

        store.apply_frame(&frame_with(0, &fist_joints(), "Left"));
        let sexp = store.status_sexp();
        assert!(sexp.contains(":left (:present t :chirality \"left\" :pose fist"));
        assert!(sexp.contains(":tracked 6"));
    }
}
