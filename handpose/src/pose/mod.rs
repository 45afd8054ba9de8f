//! Pose derivation: scale normalization and static pose classification.
//!
//! Both are pure functions of a `Hand`'s latest joints; the store runs
//! them after every applied frame.

pub mod classifier;
pub mod normalizer;

pub use classifier::classify;
