//! Foul & Free-Throw Configuration

use crate::error::ConfigError;
use crate::models::ContestLevel;
use serde::{Deserialize, Serialize};

use super::shot_config::ShotTypeValues;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FoulConfig {
    // === Shooting fouls ===
    pub wide_open_foul_rate: f32,
    pub contested_foul_rate: f32,
    pub heavy_foul_rate: f32,
    /// 3pt fouls rare, drives frequent (default: .35 / .8 / 1.4)
    pub shot_type_multiplier: ShotTypeValues,

    // === Non-shooting fouls ===
    /// Flat per-possession rate (default: 0.065)
    pub non_shooting_rate: f32,
    /// Team fouls in a regulation period before the bonus (default: 5)
    pub bonus_threshold: u8,
    pub overtime_bonus_threshold: u8,
    pub bonus_free_throws: u8,

    /// Sixth foul disqualifies (default: 6)
    pub personal_foul_limit: u8,

    // === Free throws ===
    pub free_throw_base: f32,
    pub free_throw_steepness: f32,
    pub and_one_bonus: f32,
    pub bonus_penalty: f32,
    pub clutch_penalty: f32,
    pub clutch_seconds: f32,
    pub clutch_margin: i32,

    // === Intentional fouls ===
    pub intentional_min_seconds: f32,
    pub intentional_max_seconds: f32,
    /// Share of intentional fouls aimed at the best FT shooter on the floor
    pub intentional_best_shooter_share: f32,
}

impl Default for FoulConfig {
    fn default() -> Self {
        Self {
            wide_open_foul_rate: 0.02,
            contested_foul_rate: 0.07,
            heavy_foul_rate: 0.12,
            shot_type_multiplier: ShotTypeValues::new(0.35, 0.8, 1.4),

            non_shooting_rate: 0.065,
            bonus_threshold: 5,
            overtime_bonus_threshold: 4,
            bonus_free_throws: 2,

            personal_foul_limit: 6,

            free_throw_base: 0.74,
            free_throw_steepness: 0.04,
            and_one_bonus: 0.03,
            bonus_penalty: 0.02,
            clutch_penalty: 0.04,
            clutch_seconds: 120.0,
            clutch_margin: 5,

            intentional_min_seconds: 2.0,
            intentional_max_seconds: 4.0,
            intentional_best_shooter_share: 0.5,
        }
    }
}

impl FoulConfig {
    pub fn contest_foul_rate(&self, contest: ContestLevel) -> f32 {
        match contest {
            ContestLevel::WideOpen => self.wide_open_foul_rate,
            ContestLevel::Contested => self.contested_foul_rate,
            ContestLevel::Heavy => self.heavy_foul_rate,
        }
    }

    pub fn bonus_threshold_for(&self, is_overtime: bool) -> u8 {
        if is_overtime {
            self.overtime_bonus_threshold
        } else {
            self.bonus_threshold
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, p) in [
            ("foul.wide_open_foul_rate", self.wide_open_foul_rate),
            ("foul.contested_foul_rate", self.contested_foul_rate),
            ("foul.heavy_foul_rate", self.heavy_foul_rate),
            ("foul.non_shooting_rate", self.non_shooting_rate),
            ("foul.free_throw_base", self.free_throw_base),
            ("foul.intentional_best_shooter_share", self.intentional_best_shooter_share),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::parameter(name, format!("{} is not a probability", p)));
            }
        }
        if self.personal_foul_limit == 0 {
            return Err(ConfigError::parameter("foul.personal_foul_limit", "must be > 0"));
        }
        if !(self.intentional_min_seconds > 0.0)
            || self.intentional_min_seconds > self.intentional_max_seconds
        {
            return Err(ConfigError::parameter(
                "foul.intentional_min_seconds",
                "need 0 < min <= max",
            ));
        }
        Ok(())
    }
}
