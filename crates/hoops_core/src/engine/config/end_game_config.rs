//! End-Game Configuration

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndGameConfig {
    // === Blowout window (lead/deficit >= margin, floor < t <= ceiling) ===
    pub blowout_margin: i32,
    pub blowout_window_max_seconds: f32,
    pub blowout_window_min_seconds: f32,

    // === Desperation ===
    pub desperation_three_adjustment: f32,
    pub desperation_pace: f32,
    pub desperation_turnover: f32,

    // === Conserve lead ===
    pub conserve_three_adjustment: f32,
    pub conserve_pace: f32,
    pub conserve_turnover: f32,

    // === Clock kill ===
    pub clock_kill_max_lead: i32,
    pub clock_kill_seconds: f32,
    /// Seconds left on the shot clock when the offense shoots (default: 2)
    pub clock_kill_shot_clock_target: f32,

    // === Last shot ===
    pub last_shot_max_deficit: i32,
    pub last_shot_seconds: f32,
    /// Seconds left on the game clock when the offense shoots (default: 3)
    pub last_shot_game_clock_target: f32,

    // === Intentional foul ===
    pub intentional_foul_max_deficit: i32,
    pub intentional_foul_seconds: f32,
}

impl Default for EndGameConfig {
    fn default() -> Self {
        Self {
            blowout_margin: 15,
            blowout_window_max_seconds: 600.0,
            blowout_window_min_seconds: 60.0,

            desperation_three_adjustment: 0.15,
            desperation_pace: 1.25,
            desperation_turnover: 0.01,

            conserve_three_adjustment: -0.10,
            conserve_pace: 0.85,
            conserve_turnover: -0.01,

            clock_kill_max_lead: 6,
            clock_kill_seconds: 35.0,
            clock_kill_shot_clock_target: 2.0,

            last_shot_max_deficit: 3,
            last_shot_seconds: 24.0,
            last_shot_game_clock_target: 3.0,

            intentional_foul_max_deficit: 10,
            intentional_foul_seconds: 60.0,
        }
    }
}

impl EndGameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blowout_window_min_seconds >= self.blowout_window_max_seconds {
            return Err(ConfigError::parameter(
                "end_game.blowout_window",
                "min must be below max",
            ));
        }
        if !(self.desperation_pace > 0.0) || !(self.conserve_pace > 0.0) {
            return Err(ConfigError::parameter("end_game.pace", "pace multipliers must be positive"));
        }
        if !(self.clock_kill_shot_clock_target >= 0.0) || !(self.last_shot_game_clock_target >= 0.0)
        {
            return Err(ConfigError::parameter("end_game.targets", "clock targets must be >= 0"));
        }
        Ok(())
    }
}
