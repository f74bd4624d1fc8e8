//! # Game Engine
//!
//! Possession-by-possession simulation. `game_sim` drives the game,
//! `quarter` runs the period loop and `possession` plays one trip down the
//! floor by composing the resolution systems below it.

pub mod batch;
pub mod clock;
pub mod config;
pub mod end_game;
pub mod fouls;
pub mod free_throws;
pub mod game_sim;
pub mod game_state;
pub mod play_by_play;
pub mod possession;
pub mod possession_state;
pub mod probability;
mod quarter;
pub mod rebound;
pub mod shot;
pub mod stamina;
pub mod stats;
pub mod substitutions;
pub mod timeouts;
pub mod turnover;

pub use batch::{simulate_series, SeriesSummary};
pub use clock::GameClock;
pub use config::{EngineConfig, DEFAULT_CONFIG};
pub use game_sim::{GameEngine, GamePlan};
pub use game_state::{GameState, PlayerGameState, TeamState};
pub use play_by_play::PlayByPlayWriter;
pub use possession::{PossessionContext, PossessionSimulator};
pub use possession_state::{BallState, PossessionState};
pub use stamina::StaminaManager;
pub use stats::StatsCalculator;
pub use substitutions::{RotationContext, SubstitutionManager};
pub use timeouts::{ScoringRun, TimeoutContext, TimeoutManager, TimeoutOutcome};
