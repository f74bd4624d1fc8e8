//! Team-wide Tactical Settings
//!
//! Coach-level settings that shape how a team plays for the whole game:
//! tempo, defensive scheme, who gets shots, how hard the team crashes the
//! glass, the minutes plan, late-game closers and timeout temperament.

use crate::error::ConfigError;
use crate::models::Player;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Total player-minutes available to a team in regulation (5 × 48).
pub const REGULATION_MINUTES: u32 = 240;
pub const MAX_SCORING_OPTIONS: usize = 3;
pub const MAX_CLOSERS: usize = 5;

/// Team-wide tactical settings consumed by the engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TacticalSettings {
    #[serde(default)]
    pub pace: Pace,
    /// Share of possessions played in man-to-man (0-100); the rest is zone.
    #[serde(default = "default_man_defense_pct")]
    pub man_defense_pct: u8,
    /// Up to three players who get extra shot volume, in priority order.
    #[serde(default)]
    pub scoring_options: Vec<String>,
    #[serde(default, alias = "rebounding")]
    pub rebounding_strategy: ReboundStrategy,
    /// Player name -> planned minutes. Must sum to 240.
    pub minutes_allotment: BTreeMap<String, u32>,
    /// Players kept on the floor in late, close games.
    #[serde(default)]
    pub closers: Vec<String>,
    #[serde(default)]
    pub timeout_strategy: TimeoutStrategy,
}

fn default_man_defense_pct() -> u8 {
    100
}

impl TacticalSettings {
    /// Standard settings with a minutes plan generated from roster order.
    pub fn balanced(players: &[Player]) -> Self {
        Self {
            pace: Pace::Standard,
            man_defense_pct: default_man_defense_pct(),
            scoring_options: Vec::new(),
            rebounding_strategy: ReboundStrategy::Standard,
            minutes_allotment: balanced_minutes(players),
            closers: Vec::new(),
            timeout_strategy: TimeoutStrategy::Standard,
        }
    }

    pub fn with_pace(mut self, pace: Pace) -> Self {
        self.pace = pace;
        self
    }

    pub fn with_rebounding(mut self, strategy: ReboundStrategy) -> Self {
        self.rebounding_strategy = strategy;
        self
    }

    pub fn with_timeout_strategy(mut self, strategy: TimeoutStrategy) -> Self {
        self.timeout_strategy = strategy;
        self
    }

    /// Zone share as a 0.0-1.0 fraction.
    pub fn zone_fraction(&self) -> f32 {
        (100.0 - self.man_defense_pct.min(100) as f32) / 100.0
    }

    /// Saturating sum of the allotment.
    pub fn total_minutes(&self) -> u32 {
        self.minutes_allotment.values().fold(0u32, |acc, m| acc.saturating_add(*m))
    }

    pub fn minutes_for(&self, name: &str) -> u32 {
        self.minutes_allotment.get(name).copied().unwrap_or(0)
    }

    /// Validate against the roster. Errors are reported, never corrected.
    pub fn validate(&self, team_name: &str, players: &[Player]) -> Result<(), ConfigError> {
        let names: HashSet<&str> = players.iter().map(|p| p.name.as_str()).collect();
        let invalid = |reason: String| ConfigError::InvalidTactics {
            team: team_name.to_string(),
            reason,
        };

        if self.man_defense_pct > 100 {
            return Err(invalid(format!(
                "man_defense_pct must be 0-100, found {}",
                self.man_defense_pct
            )));
        }

        let total = self.total_minutes();
        if total != REGULATION_MINUTES {
            return Err(ConfigError::MinutesAllotment {
                team: team_name.to_string(),
                total,
                expected: REGULATION_MINUTES,
            });
        }

        for (name, minutes) in &self.minutes_allotment {
            if !names.contains(name.as_str()) {
                return Err(ConfigError::UnknownPlayer {
                    team: team_name.to_string(),
                    player: name.clone(),
                    context: "minutes_allotment",
                });
            }
            if *minutes > 48 {
                return Err(invalid(format!("{} is allotted {} minutes (max 48)", name, minutes)));
            }
        }

        if self.scoring_options.len() > MAX_SCORING_OPTIONS {
            return Err(invalid(format!(
                "at most {} scoring options allowed, found {}",
                MAX_SCORING_OPTIONS,
                self.scoring_options.len()
            )));
        }
        for name in &self.scoring_options {
            if !names.contains(name.as_str()) {
                return Err(ConfigError::UnknownPlayer {
                    team: team_name.to_string(),
                    player: name.clone(),
                    context: "scoring_options",
                });
            }
        }

        if self.closers.len() > MAX_CLOSERS {
            return Err(invalid(format!(
                "at most {} closers allowed, found {}",
                MAX_CLOSERS,
                self.closers.len()
            )));
        }
        for name in &self.closers {
            if !names.contains(name.as_str()) {
                return Err(ConfigError::UnknownPlayer {
                    team: team_name.to_string(),
                    player: name.clone(),
                    context: "closers",
                });
            }
        }

        Ok(())
    }
}

/// Minutes plan from roster order: five starters at 34, up to five bench
/// players sharing the remaining 70, everyone else at 0.
pub fn balanced_minutes(players: &[Player]) -> BTreeMap<String, u32> {
    let mut plan = BTreeMap::new();
    let n = players.len();
    if n == 0 {
        return plan;
    }

    if n <= 5 {
        let each = REGULATION_MINUTES / n as u32;
        let mut remainder = REGULATION_MINUTES - each * n as u32;
        for p in players {
            let extra = if remainder > 0 {
                remainder -= 1;
                1
            } else {
                0
            };
            plan.insert(p.name.clone(), each + extra);
        }
        return plan;
    }

    const STARTER_MINUTES: u32 = 34;
    let bench_pool = REGULATION_MINUTES - STARTER_MINUTES * 5;
    let rotation = (n - 5).min(5) as u32;
    let bench_each = bench_pool / rotation;
    let mut bench_remainder = bench_pool - bench_each * rotation;

    for (i, p) in players.iter().enumerate() {
        let minutes = if i < 5 {
            STARTER_MINUTES
        } else if ((i - 5) as u32) < rotation {
            let extra = if bench_remainder > 0 {
                bench_remainder -= 1;
                1
            } else {
                0
            };
            bench_each + extra
        } else {
            0
        };
        plan.insert(p.name.clone(), minutes);
    }
    plan
}

/// Tempo of play.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum Pace {
    Fast,
    #[default]
    Standard,
    Slow,
}

/// How many players chase offensive rebounds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum ReboundStrategy {
    #[default]
    Standard,
    CrashGlass,
    PreventTransition,
}

/// How readily the bench calls timeouts.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum TimeoutStrategy {
    Aggressive,
    #[default]
    Standard,
    Conservative,
}
