//! # hoops_core - Deterministic Basketball Game Simulation Engine
//!
//! Plays a full game possession by possession from two rosters, their
//! tactical settings and a seed.
//!
//! ## Features
//! - 100% deterministic simulation (same inputs and seed = same game)
//! - Attribute-driven probabilities through one weighted-sigmoid formula
//! - Stamina, fouls, rotations, timeouts and end-game tactics
//! - Box score, play-by-play and per-possession traces
//! - JSON API for hosts that only speak JSON

// Struct initialization pattern used in config presets
#![allow(clippy::field_reassign_with_default)]
#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod tactics;

#[cfg(test)]
mod test_support;

pub use api::{game_response_schema, simulate_game_json, GameRequest, GameResponse};
pub use engine::config::EngineConfig;
pub use engine::{simulate_series, GameEngine, GamePlan, SeriesSummary};
pub use error::{ConfigError, GameError, Result, StateError};
pub use models::{BoxScore, GameResult, Player, PlayerAttributes, Position, Team, TeamSide};
pub use tactics::{Pace, ReboundStrategy, TacticalSettings, TimeoutStrategy};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const SCHEMA_VERSION: u8 = 1;

/// Play one game with the given configuration.
pub fn simulate_game(home: Team, away: Team, seed: u64, config: &EngineConfig) -> Result<GameResult> {
    let plan = GamePlan::new(home, away, seed).with_config(config.clone());
    GameEngine::new(plan)?.simulate()
}
