//! Session configuration.
//!
//! Loaded from TOML; every section and field falls back to its default.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pose::normalizer::DEFAULT_EXTENT_RATIO;
use crate::skeleton::hand::{DEFAULT_APART_THRESHOLD, DEFAULT_CLOSE_THRESHOLD};
use crate::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Classifier thresholds and scale constants.
    pub pose: PoseConfig,
    /// Frame queue and event loop settings.
    pub stream: StreamConfig,
}

/// Pose classification configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Maximum normalized distance for a "folded" finger.
    pub close_threshold: f64,
    /// Minimum normalized distance for an "extended" finger.
    pub apart_threshold: f64,
    /// Hand length over wrist-to-middle-knuckle length.
    pub extent_ratio: f64,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            close_threshold: DEFAULT_CLOSE_THRESHOLD,
            apart_threshold: DEFAULT_APART_THRESHOLD,
            extent_ratio: DEFAULT_EXTENT_RATIO,
        }
    }
}

/// Stream configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Event loop dispatch timeout in milliseconds.
    pub poll_interval_ms: u64,
    /// Seconds between periodic status lines (0 = never).
    pub status_interval_secs: u64,
    /// Pending frame limit; 0 means unbounded.
    pub queue_capacity: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 100,
            status_interval_secs: 60,
            queue_capacity: 0,
        }
    }
}

impl SessionConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        let pose = &self.pose;
        for (name, value) in [
            ("close_threshold", pose.close_threshold),
            ("apart_threshold", pose.apart_threshold),
            ("extent_ratio", pose.extent_ratio),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::Config(format!(
                    "{} must be positive and finite, got {}",
                    name, value
                )));
            }
        }
        if pose.close_threshold >= pose.apart_threshold {
            return Err(Error::Config(format!(
                "close_threshold ({}) must be below apart_threshold ({})",
                pose.close_threshold, pose.apart_threshold
            )));
        }
        if self.stream.poll_interval_ms == 0 {
            return Err(Error::Config("poll_interval_ms must be > 0".to_string()));
        }
        Ok(())
    }

    /// Load and validate config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Generate TOML representation.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
