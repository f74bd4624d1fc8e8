//! Shot Configuration
//!
//! Selection, contest, resolution and block parameters.

use crate::error::ConfigError;
use crate::models::{ContestLevel, ShotType};
use serde::{Deserialize, Serialize};

/// One value per shot type.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ShotTypeValues {
    pub three_point: f32,
    pub midrange: f32,
    pub rim: f32,
}

impl ShotTypeValues {
    pub const fn new(three_point: f32, midrange: f32, rim: f32) -> Self {
        Self { three_point, midrange, rim }
    }

    #[inline]
    pub fn get(&self, shot_type: ShotType) -> f32 {
        match shot_type {
            ShotType::ThreePoint => self.three_point,
            ShotType::Midrange => self.midrange,
            ShotType::Rim => self.rim,
        }
    }

    fn validate_probabilities(&self, name: &str) -> Result<(), ConfigError> {
        for value in [self.three_point, self.midrange, self.rim] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::parameter(name, format!("{} is not a probability", value)));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShotConfig {
    // === Selection ===
    /// Baseline shot mix (default: .38 / .20 / .42)
    pub baseline_mix: ShotTypeValues,
    /// Share moved per composite point away from 50 (default: 0.004)
    pub composite_shift: f32,
    pub center_three_factor: f32,
    pub power_forward_three_factor: f32,
    pub guard_rim_factor: f32,
    /// Rim share per bravery point away from 50 (default: 0.003)
    pub bravery_rim_shift: f32,
    pub transition_rim_boost: f32,
    /// Floor on any type's share before sampling (default: 0.02)
    pub min_type_share: f32,

    // === Shooter selection ===
    /// Usage weight = (composite / 50) ^ exponent (default: 2.0)
    pub usage_exponent: f32,
    /// Multipliers for the declared scoring options, in order
    pub scoring_option_boosts: Vec<f32>,

    // === Resolution ===
    pub base_rate: ShotTypeValues,
    /// Sigmoid steepness for field goals (default: 0.065)
    pub steepness: f32,
    pub contested_penalty: ShotTypeValues,
    pub heavy_penalty: ShotTypeValues,
    pub transition_bonus: ShotTypeValues,

    // === Contest distance (feet) ===
    pub contest_base_distance: f32,
    pub contest_slope: f32,
    pub acceleration_effect: f32,
    pub help_base_probability: f32,
    pub help_zone_bonus: f32,
    pub help_rim_multiplier: f32,
    pub help_distance: f32,
    pub zone_three_loosen: f32,
    pub zone_rim_tighten: f32,
    pub patience_effect: f32,
    pub transition_space: f32,
    /// Symmetric uniform noise half-width (default: 1.75)
    pub contest_noise: f32,
    pub max_contest_distance: f32,
    /// Bucket edges: wide open at or above, heavy below
    pub wide_open_distance: f32,
    pub heavy_contest_distance: f32,

    // === Blocks ===
    pub block_base: ShotTypeValues,
    pub block_scale_divisor: f32,
    pub block_scale_min: f32,
    pub block_scale_max: f32,
    pub heavy_block_multiplier: f32,
    pub max_block_probability: f32,

    // === Assists ===
    pub assist_rate: ShotTypeValues,
}

impl Default for ShotConfig {
    fn default() -> Self {
        Self {
            baseline_mix: ShotTypeValues::new(0.38, 0.20, 0.42),
            composite_shift: 0.004,
            center_three_factor: 0.25,
            power_forward_three_factor: 0.6,
            guard_rim_factor: 0.9,
            bravery_rim_shift: 0.003,
            transition_rim_boost: 0.12,
            min_type_share: 0.02,

            usage_exponent: 2.0,
            scoring_option_boosts: vec![1.6, 1.35, 1.15],

            base_rate: ShotTypeValues::new(0.38, 0.44, 0.62),
            steepness: 0.065,
            contested_penalty: ShotTypeValues::new(0.05, 0.045, 0.035),
            heavy_penalty: ShotTypeValues::new(0.11, 0.09, 0.07),
            transition_bonus: ShotTypeValues::new(0.02, 0.02, 0.06),

            contest_base_distance: 9.5,
            contest_slope: 0.1,
            acceleration_effect: 0.02,
            help_base_probability: 0.18,
            help_zone_bonus: 0.15,
            help_rim_multiplier: 1.5,
            help_distance: 1.5,
            zone_three_loosen: 1.2,
            zone_rim_tighten: 0.6,
            patience_effect: 0.025,
            transition_space: 2.5,
            contest_noise: 1.75,
            max_contest_distance: 12.0,
            wide_open_distance: 6.0,
            heavy_contest_distance: 2.0,

            block_base: ShotTypeValues::new(0.0, 0.025, 0.075),
            block_scale_divisor: 50.0,
            block_scale_min: 0.25,
            block_scale_max: 2.0,
            heavy_block_multiplier: 1.4,
            max_block_probability: 0.3,

            assist_rate: ShotTypeValues::new(0.80, 0.60, 0.55),
        }
    }
}

impl ShotConfig {
    /// Contest penalty subtracted from the make probability.
    pub fn contest_penalty(&self, shot_type: ShotType, contest: ContestLevel) -> f32 {
        match contest {
            ContestLevel::WideOpen => 0.0,
            ContestLevel::Contested => self.contested_penalty.get(shot_type),
            ContestLevel::Heavy => self.heavy_penalty.get(shot_type),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.baseline_mix.validate_probabilities("shot.baseline_mix")?;
        self.base_rate.validate_probabilities("shot.base_rate")?;
        self.contested_penalty.validate_probabilities("shot.contested_penalty")?;
        self.heavy_penalty.validate_probabilities("shot.heavy_penalty")?;
        self.transition_bonus.validate_probabilities("shot.transition_bonus")?;
        self.block_base.validate_probabilities("shot.block_base")?;
        self.assist_rate.validate_probabilities("shot.assist_rate")?;

        let mix_sum =
            self.baseline_mix.three_point + self.baseline_mix.midrange + self.baseline_mix.rim;
        if (mix_sum - 1.0).abs() > 1e-3 {
            return Err(ConfigError::WeightSum { table: "shot.baseline_mix".into(), sum: mix_sum });
        }
        if !(self.steepness > 0.0) {
            return Err(ConfigError::parameter("shot.steepness", "must be positive"));
        }
        if !(self.heavy_contest_distance < self.wide_open_distance) {
            return Err(ConfigError::parameter(
                "shot.wide_open_distance",
                "wide-open edge must be above the heavy-contest edge",
            ));
        }
        if !(self.block_scale_divisor > 0.0) || self.block_scale_min > self.block_scale_max {
            return Err(ConfigError::parameter("shot.block_scale", "invalid block scale bounds"));
        }
        if !(0.0..=1.0).contains(&self.max_block_probability) {
            return Err(ConfigError::parameter("shot.max_block_probability", "must be in [0, 1]"));
        }
        if self.scoring_option_boosts.iter().any(|b| !b.is_finite() || *b <= 0.0) {
            return Err(ConfigError::parameter(
                "shot.scoring_option_boosts",
                "boosts must be positive",
            ));
        }
        Ok(())
    }
}
