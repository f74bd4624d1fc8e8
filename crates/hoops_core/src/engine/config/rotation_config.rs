//! Rotation (Substitution) Configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RotationConfig {
    /// Seconds on court before a player may be rested (default: 240)
    pub min_stint_seconds: f32,
    /// Rest when stamina drops below this (default: 70)
    pub rest_threshold: f32,
    /// Below this the minimum stint is waived (default: 45)
    pub forced_rest_threshold: f32,
    /// Bench players need at least this stamina to check in (default: 82)
    pub return_threshold: f32,

    // === Closers ===
    pub closer_window_seconds: f32,
    pub closer_margin: i32,
    /// Closers below this stamina are still rested (default: 35)
    pub closer_min_stamina: f32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        Self {
            min_stint_seconds: 240.0,
            rest_threshold: 70.0,
            forced_rest_threshold: 45.0,
            return_threshold: 82.0,

            closer_window_seconds: 300.0,
            closer_margin: 10,
            closer_min_stamina: 35.0,
        }
    }
}

impl RotationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let in_range = |v: f32| (0.0..=100.0).contains(&v);
        if !in_range(self.rest_threshold)
            || !in_range(self.forced_rest_threshold)
            || !in_range(self.return_threshold)
            || !in_range(self.closer_min_stamina)
        {
            return Err(ConfigError::parameter("rotation", "stamina thresholds must be 0-100"));
        }
        if self.forced_rest_threshold > self.rest_threshold {
            return Err(ConfigError::parameter(
                "rotation.forced_rest_threshold",
                "must not exceed rest_threshold",
            ));
        }
        if self.return_threshold < self.rest_threshold {
            return Err(ConfigError::parameter(
                "rotation.return_threshold",
                "must be at least rest_threshold",
            ));
        }
        if !(self.min_stint_seconds >= 0.0) || !(self.closer_window_seconds >= 0.0) {
            return Err(ConfigError::parameter("rotation", "durations must be >= 0"));
        }
        Ok(())
    }
}
