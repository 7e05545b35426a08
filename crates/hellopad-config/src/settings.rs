//! Tunable settings for input filtering, capture and file locations

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::USER_CONFIG_DIR;

/// Thresholds used when filtering raw events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Minimum |value| for an axis event to be processed or captured
    #[serde(default = "default_axis_threshold")]
    pub axis_threshold: f32,

    /// Minimum |value| for a live axis to be shown as active on the debug screen
    #[serde(default = "default_display_threshold")]
    pub display_threshold: f32,

    /// Number of recent events kept for diagnostics
    #[serde(default = "default_log_capacity")]
    pub input_log_capacity: usize,
}

fn default_axis_threshold() -> f32 {
    0.5
}

fn default_display_threshold() -> f32 {
    0.05
}

fn default_log_capacity() -> usize {
    50
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            axis_threshold: default_axis_threshold(),
            display_threshold: default_display_threshold(),
            input_log_capacity: default_log_capacity(),
        }
    }
}

/// Capture wizard settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Pause after each accepted capture before the next step listens (ms)
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

fn default_cooldown_ms() -> u64 {
    500
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl MapperConfig {
    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}

/// File locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Persisted button mapping
    #[serde(default = "default_mapping_file")]
    pub mapping_file: PathBuf,

    /// Log output for the launcher
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,
}

fn default_mapping_file() -> PathBuf {
    PathBuf::from(USER_CONFIG_DIR).join("mapping.toml")
}

fn default_log_file() -> PathBuf {
    PathBuf::from(USER_CONFIG_DIR).join("hellopad.log")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            mapping_file: default_mapping_file(),
            log_file: default_log_file(),
        }
    }
}
