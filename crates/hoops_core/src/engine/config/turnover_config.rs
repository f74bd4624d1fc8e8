//! Turnover Configuration

use crate::error::ConfigError;
use crate::models::TurnoverType;
use crate::tactics::Pace;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TurnoverConfig {
    /// Base rate at an even matchup (default: 0.12)
    pub base_rate: f32,
    pub steepness: f32,

    // === Additive modifiers ===
    pub fast_pace_adjustment: f32,
    pub slow_pace_adjustment: f32,
    /// Scaled by the defense's zone fraction (default: 0.03)
    pub zone_adjustment: f32,
    pub transition_adjustment: f32,

    // === Type table ===
    pub bad_pass_weight: f32,
    pub lost_ball_weight: f32,
    pub offensive_foul_weight: f32,
    pub violation_weight: f32,

    // === Steals ===
    /// Steal chance on a live-ball turnover at an even steal composite
    pub steal_base: f32,
    /// Per composite point above 50 (default: 0.01)
    pub steal_slope: f32,
    pub steal_min: f32,
    pub steal_max: f32,

    // === Aftermath ===
    pub transition_after_steal: f32,
    pub transition_after_live_turnover: f32,
    /// Turnover possessions burn at least this share of the sampled length
    pub min_elapsed_fraction: f32,
}

impl Default for TurnoverConfig {
    fn default() -> Self {
        Self {
            base_rate: 0.12,
            steepness: 0.04,

            fast_pace_adjustment: 0.025,
            slow_pace_adjustment: -0.025,
            zone_adjustment: 0.03,
            transition_adjustment: -0.02,

            bad_pass_weight: 0.40,
            lost_ball_weight: 0.30,
            offensive_foul_weight: 0.15,
            violation_weight: 0.15,

            steal_base: 0.55,
            steal_slope: 0.01,
            steal_min: 0.20,
            steal_max: 0.85,

            transition_after_steal: 0.60,
            transition_after_live_turnover: 0.25,
            min_elapsed_fraction: 0.25,
        }
    }
}

impl TurnoverConfig {
    pub fn pace_adjustment(&self, pace: Pace) -> f32 {
        match pace {
            Pace::Fast => self.fast_pace_adjustment,
            Pace::Standard => 0.0,
            Pace::Slow => self.slow_pace_adjustment,
        }
    }

    pub fn type_weights(&self) -> [(TurnoverType, f32); 4] {
        [
            (TurnoverType::BadPass, self.bad_pass_weight),
            (TurnoverType::LostBall, self.lost_ball_weight),
            (TurnoverType::OffensiveFoul, self.offensive_foul_weight),
            (TurnoverType::Violation, self.violation_weight),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let weights = self.type_weights();
        if weights.iter().any(|(_, w)| !w.is_finite() || *w < 0.0) {
            return Err(ConfigError::parameter("turnover.type_weights", "weights must be >= 0"));
        }
        let sum: f32 = weights.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > 1e-3 {
            return Err(ConfigError::WeightSum { table: "turnover.type_weights".into(), sum });
        }
        if !(0.0..=1.0).contains(&self.base_rate) {
            return Err(ConfigError::parameter("turnover.base_rate", "must be in [0, 1]"));
        }
        if self.steal_min > self.steal_max {
            return Err(ConfigError::parameter("turnover.steal_min", "must not exceed steal_max"));
        }
        if !(0.0..=1.0).contains(&self.min_elapsed_fraction) {
            return Err(ConfigError::parameter("turnover.min_elapsed_fraction", "must be in [0, 1]"));
        }
        Ok(())
    }
}
