//! Shared fixtures for unit tests.

use crate::models::{Player, Position, Team};

const POSITIONS: [Position; 5] =
    [Position::PG, Position::SG, Position::SF, Position::PF, Position::C];

/// Ten players named `{prefix}0`..`{prefix}9`, two at each position, every
/// attribute set to `value`.
pub fn roster(prefix: &str, value: f32) -> Vec<Player> {
    (0..10)
        .map(|i| Player::uniform(format!("{}{}", prefix, i), POSITIONS[i % 5], value))
        .collect()
}

pub fn balanced_team(name: &str) -> Team {
    Team::with_balanced_tactics(name, roster(name, 50.0))
}

pub fn rated_team(name: &str, value: f32) -> Team {
    Team::with_balanced_tactics(name, roster(name, value))
}
