//! Stamina Configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StaminaConfig {
    // === Drain / Recovery ===
    /// Points lost per second on court (default: 0.06)
    pub drain_per_second: f32,
    /// Points regained per second on the bench (default: 0.12)
    pub recovery_per_second: f32,
    /// Drain multiplier = clamp(offset - attr/100) (default: 1.5)
    pub drain_attr_offset: f32,
    /// Recovery multiplier = clamp(offset + attr/100) (default: 0.5)
    pub recovery_attr_offset: f32,
    /// Lower bound of both attribute multipliers (default: 0.7)
    pub multiplier_min: f32,
    /// Upper bound of both attribute multipliers (default: 1.3)
    pub multiplier_max: f32,

    // === Pace ===
    pub fast_pace_drain: f32,
    pub standard_pace_drain: f32,
    pub slow_pace_drain: f32,

    // === Performance penalty ===
    /// No penalty at or above this stamina (default: 80)
    pub penalty_threshold: f32,
    /// Penalty at zero stamina (default: 0.25)
    pub max_penalty: f32,
    /// Curve shape below the threshold (default: 1.3)
    pub penalty_exponent: f32,

    // === Breaks ===
    /// Share of missing stamina restored at halftime (default: 0.6)
    pub halftime_recovery_fraction: f32,
    /// Flat restore for every player on a timeout (default: 5)
    pub timeout_recovery: f32,
}

impl Default for StaminaConfig {
    fn default() -> Self {
        Self {
            drain_per_second: 0.06,
            recovery_per_second: 0.12,
            drain_attr_offset: 1.5,
            recovery_attr_offset: 0.5,
            multiplier_min: 0.7,
            multiplier_max: 1.3,

            fast_pace_drain: 1.1,
            standard_pace_drain: 1.0,
            slow_pace_drain: 0.92,

            penalty_threshold: 80.0,
            max_penalty: 0.25,
            penalty_exponent: 1.3,

            halftime_recovery_fraction: 0.6,
            timeout_recovery: 5.0,
        }
    }
}

impl StaminaConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("stamina.drain_per_second", self.drain_per_second),
            ("stamina.recovery_per_second", self.recovery_per_second),
            ("stamina.fast_pace_drain", self.fast_pace_drain),
            ("stamina.standard_pace_drain", self.standard_pace_drain),
            ("stamina.slow_pace_drain", self.slow_pace_drain),
            ("stamina.timeout_recovery", self.timeout_recovery),
            ("stamina.penalty_exponent", self.penalty_exponent),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::parameter(name, format!("must be >= 0, got {}", value)));
            }
        }
        if !(self.multiplier_min > 0.0 && self.multiplier_min <= self.multiplier_max) {
            return Err(ConfigError::parameter(
                "stamina.multiplier_min",
                "need 0 < multiplier_min <= multiplier_max",
            ));
        }
        if !(0.0..=1.0).contains(&self.max_penalty) {
            return Err(ConfigError::parameter("stamina.max_penalty", "must be in [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.halftime_recovery_fraction) {
            return Err(ConfigError::parameter(
                "stamina.halftime_recovery_fraction",
                "must be in [0, 1]",
            ));
        }
        if !(self.penalty_threshold > 0.0 && self.penalty_threshold <= 100.0) {
            return Err(ConfigError::parameter("stamina.penalty_threshold", "must be in (0, 100]"));
        }
        Ok(())
    }
}
