use crate::engine::possession_state::BallState;
use crate::models::TeamSide;
use thiserror::Error;

/// Invalid input detected before a game starts. Never silently corrected.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("minutes allotment for {team} sums to {total}, expected {expected}")]
    MinutesAllotment { team: String, total: u32, expected: u32 },

    #[error("{context} for {team} references unknown player '{player}'")]
    UnknownPlayer { team: String, player: String, context: &'static str },

    #[error("weight table '{table}' sums to {sum:.4}, expected 1.0")]
    WeightSum { table: String, sum: f32 },

    #[error("weight table '{table}' has an invalid weight for {attribute}: {weight}")]
    InvalidWeight { table: String, attribute: String, weight: f32 },

    #[error("invalid roster for {team}: {reason}")]
    InvalidRoster { team: String, reason: String },

    #[error("invalid tactics for {team}: {reason}")]
    InvalidTactics { team: String, reason: String },

    #[error("invalid engine parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("failed to parse engine configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    pub fn parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::InvalidParameter { name: name.into(), reason: reason.into() }
    }
}

/// A request the possession state machine refused. State is left untouched.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    #[error("{team} cannot call a timeout while the ball is {state} ({possessing} ball)")]
    IllegalTimeout { team: TeamSide, state: BallState, possessing: TeamSide },

    #[error("substitutions are not allowed while the ball is {state}")]
    IllegalSubstitution { state: BallState },

    #[error("{player} is not eligible to enter the game")]
    IneligiblePlayer { player: String },
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    State(#[from] StateError),

    /// Runaway-loop guard tripped. Fatal for this game only.
    #[error(
        "possession cap of {cap} exceeded in period {period} with {seconds_remaining:.1}s still on the clock"
    )]
    PossessionCapExceeded { period: u8, cap: u32, seconds_remaining: f32 },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GameError {
    /// Configuration and state-machine issues can be fixed by the caller and
    /// retried; a tripped possession cap points at an engine fault.
    pub fn is_recoverable(&self) -> bool {
        match self {
            GameError::Config(_) | GameError::State(_) => true,
            GameError::PossessionCapExceeded { .. } => false,
            GameError::Serialization(_) => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
