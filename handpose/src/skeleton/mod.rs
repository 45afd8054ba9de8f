//! Skeletal data model: joints, hands, and the two-slot store.

pub mod hand;
pub mod joint;
pub mod store;

pub use hand::{Chirality, Hand, HandSlot, Pose};
pub use joint::{distance, Joint, JointLabel, JOINT_COUNT};
pub use store::SkeletonStore;
