//! Timeout Configuration

use crate::error::ConfigError;
use crate::tactics::TimeoutStrategy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Flat per-team budget for the whole game (default: 7)
    pub timeouts_per_team: u8,

    // === Momentum ===
    pub aggressive_run_threshold: u32,
    pub standard_run_threshold: u32,
    pub conservative_run_threshold: u32,
    /// Timeouts kept back for the end of the game
    pub aggressive_reserve: u8,
    pub standard_reserve: u8,
    pub conservative_reserve: u8,

    // === End game ===
    pub play_design_seconds: f32,
    pub play_design_max_deficit: i32,
    pub clock_stop_seconds: f32,
    pub clock_stop_min_deficit: i32,
    pub clock_stop_max_deficit: i32,
    /// Clock-stop timeouts each team may spend per period (default: 2)
    pub clock_stops_per_period: u8,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            timeouts_per_team: 7,

            aggressive_run_threshold: 6,
            standard_run_threshold: 8,
            conservative_run_threshold: 10,
            aggressive_reserve: 0,
            standard_reserve: 1,
            conservative_reserve: 2,

            play_design_seconds: 24.0,
            play_design_max_deficit: 3,
            clock_stop_seconds: 60.0,
            clock_stop_min_deficit: 4,
            clock_stop_max_deficit: 10,
            clock_stops_per_period: 2,
        }
    }
}

impl TimeoutConfig {
    pub fn run_threshold(&self, strategy: TimeoutStrategy) -> u32 {
        match strategy {
            TimeoutStrategy::Aggressive => self.aggressive_run_threshold,
            TimeoutStrategy::Standard => self.standard_run_threshold,
            TimeoutStrategy::Conservative => self.conservative_run_threshold,
        }
    }

    pub fn reserve(&self, strategy: TimeoutStrategy) -> u8 {
        match strategy {
            TimeoutStrategy::Aggressive => self.aggressive_reserve,
            TimeoutStrategy::Standard => self.standard_reserve,
            TimeoutStrategy::Conservative => self.conservative_reserve,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.aggressive_run_threshold <= self.standard_run_threshold
            && self.standard_run_threshold <= self.conservative_run_threshold)
        {
            return Err(ConfigError::parameter(
                "timeout.run_threshold",
                "expected aggressive <= standard <= conservative",
            ));
        }
        if self.clock_stop_min_deficit > self.clock_stop_max_deficit {
            return Err(ConfigError::parameter(
                "timeout.clock_stop_min_deficit",
                "must not exceed clock_stop_max_deficit",
            ));
        }
        Ok(())
    }
}
