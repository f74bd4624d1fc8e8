//! Clock Configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Triangular possession-length profile, in seconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DurationProfile {
    pub min: f32,
    pub mode: f32,
    pub max: f32,
}

impl DurationProfile {
    pub const fn new(min: f32, mode: f32, max: f32) -> Self {
        Self { min, mode, max }
    }

    pub fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let finite = self.min.is_finite() && self.mode.is_finite() && self.max.is_finite();
        if !finite || self.min <= 0.0 || self.min >= self.max {
            return Err(ConfigError::parameter(
                name,
                format!("expected 0 < min < max, got ({}, {}, {})", self.min, self.mode, self.max),
            ));
        }
        if self.mode < self.min || self.mode > self.max {
            return Err(ConfigError::parameter(
                name,
                format!("mode {} outside [{}, {}]", self.mode, self.min, self.max),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    // === Periods ===
    /// Regulation period length (default: 720)
    pub period_seconds: f32,
    /// Overtime period length (default: 300)
    pub overtime_seconds: f32,
    /// Overtime periods played before the game is called a tie (default: 10)
    pub max_overtime_periods: u8,

    // === Shot clock ===
    /// Full shot clock (default: 24)
    pub shot_clock_seconds: f32,
    /// Shot clock after an offensive rebound or side-out (default: 14)
    pub reset_shot_clock_seconds: f32,

    // === Possession length ===
    pub fast: DurationProfile,
    pub standard: DurationProfile,
    pub slow: DurationProfile,
    pub transition: DurationProfile,
    /// Floor on any sampled possession (default: 1.0)
    pub min_possession_seconds: f32,

    // === Safety ===
    /// Runaway-loop guard per period (default: 400)
    pub max_possessions_per_period: u32,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            period_seconds: 720.0,
            overtime_seconds: 300.0,
            max_overtime_periods: 10,

            shot_clock_seconds: 24.0,
            reset_shot_clock_seconds: 14.0,

            fast: DurationProfile::new(5.0, 10.0, 20.0),
            standard: DurationProfile::new(6.0, 14.0, 24.0),
            slow: DurationProfile::new(10.0, 20.0, 24.0),
            transition: DurationProfile::new(3.0, 5.0, 9.0),
            min_possession_seconds: 1.0,

            max_possessions_per_period: 400,
        }
    }
}

impl ClockConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.fast.validate("clock.fast")?;
        self.standard.validate("clock.standard")?;
        self.slow.validate("clock.slow")?;
        self.transition.validate("clock.transition")?;

        if !(self.period_seconds > 0.0) || !(self.overtime_seconds > 0.0) {
            return Err(ConfigError::parameter("clock.period_seconds", "periods must be positive"));
        }
        if !(self.shot_clock_seconds > 0.0)
            || !(self.reset_shot_clock_seconds > 0.0)
            || self.reset_shot_clock_seconds > self.shot_clock_seconds
        {
            return Err(ConfigError::parameter(
                "clock.shot_clock_seconds",
                "need 0 < reset_shot_clock_seconds <= shot_clock_seconds",
            ));
        }
        if !(self.min_possession_seconds > 0.0) {
            return Err(ConfigError::parameter("clock.min_possession_seconds", "must be positive"));
        }
        if self.max_possessions_per_period == 0 {
            return Err(ConfigError::parameter("clock.max_possessions_per_period", "must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(ClockConfig::default().validate().is_ok());
    }

    #[test]
    fn test_inverted_profile_rejected() {
        let mut cfg = ClockConfig::default();
        cfg.fast = DurationProfile::new(20.0, 10.0, 5.0);
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidParameter { .. })));
    }
}
