//! Rebound Configuration

use crate::error::ConfigError;
use crate::tactics::ReboundStrategy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReboundConfig {
    // === Who goes to the glass ===
    pub standard_crashers: usize,
    pub crash_glass_crashers: usize,
    pub prevent_transition_crashers: usize,
    pub boxers: usize,

    // === Offensive rebound probability ===
    /// Structural edge of the defense (default: 0.15)
    pub defensive_advantage: f32,
    /// Long misses bounce further out (default: +0.03)
    pub three_point_adjustment: f32,
    /// Lane positions favor the defense on free throws (default: -0.10)
    pub free_throw_adjustment: f32,
    pub min_offensive_probability: f32,
    pub max_offensive_probability: f32,

    // === Rebounder selection ===
    pub guard_long_miss_weight: f32,
    pub big_rim_miss_weight: f32,

    // === Putbacks ===
    /// Offensive rebounder height above this goes straight back up (default: 72)
    pub putback_height_threshold: f32,

    // === Transition ===
    pub transition_base: f32,
    pub prevent_transition_factor: f32,
    pub crash_glass_factor: f32,
}

impl Default for ReboundConfig {
    fn default() -> Self {
        Self {
            standard_crashers: 3,
            crash_glass_crashers: 4,
            prevent_transition_crashers: 2,
            boxers: 5,

            defensive_advantage: 0.15,
            three_point_adjustment: 0.03,
            free_throw_adjustment: -0.10,
            min_offensive_probability: 0.05,
            max_offensive_probability: 0.60,

            guard_long_miss_weight: 1.4,
            big_rim_miss_weight: 1.5,

            putback_height_threshold: 72.0,

            transition_base: 0.14,
            prevent_transition_factor: 0.5,
            crash_glass_factor: 1.35,
        }
    }
}

impl ReboundConfig {
    pub fn crashers(&self, strategy: ReboundStrategy) -> usize {
        match strategy {
            ReboundStrategy::Standard => self.standard_crashers,
            ReboundStrategy::CrashGlass => self.crash_glass_crashers,
            ReboundStrategy::PreventTransition => self.prevent_transition_crashers,
        }
    }

    /// Transition multiplier keyed on the shooting team's strategy.
    pub fn transition_factor(&self, shooting_strategy: ReboundStrategy) -> f32 {
        match shooting_strategy {
            ReboundStrategy::Standard => 1.0,
            ReboundStrategy::CrashGlass => self.crash_glass_factor,
            ReboundStrategy::PreventTransition => self.prevent_transition_factor,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, n) in [
            ("rebound.standard_crashers", self.standard_crashers),
            ("rebound.crash_glass_crashers", self.crash_glass_crashers),
            ("rebound.prevent_transition_crashers", self.prevent_transition_crashers),
            ("rebound.boxers", self.boxers),
        ] {
            if n == 0 || n > 5 {
                return Err(ConfigError::parameter(name, format!("must be 1-5, got {}", n)));
            }
        }
        if !(0.0..=1.0).contains(&self.min_offensive_probability)
            || !(0.0..=1.0).contains(&self.max_offensive_probability)
            || self.min_offensive_probability > self.max_offensive_probability
        {
            return Err(ConfigError::parameter(
                "rebound.offensive_probability",
                "need 0 <= min <= max <= 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.transition_base) {
            return Err(ConfigError::parameter("rebound.transition_base", "must be in [0, 1]"));
        }
        Ok(())
    }
}
