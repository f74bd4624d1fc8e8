use super::Player;
use crate::error::ConfigError;
use crate::tactics::TacticalSettings;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

pub const LINEUP_SIZE: usize = 5;
pub const MAX_ROSTER_SIZE: usize = 15;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub name: String,
    /// Ordered roster; the first five start.
    pub players: Vec<Player>,
    pub tactics: TacticalSettings,
}

impl Team {
    pub fn new(name: impl Into<String>, players: Vec<Player>, tactics: TacticalSettings) -> Self {
        Self { name: name.into(), players, tactics }
    }

    /// Team with generated balanced tactics.
    pub fn with_balanced_tactics(name: impl Into<String>, players: Vec<Player>) -> Self {
        let tactics = TacticalSettings::balanced(&players);
        Self::new(name, players, tactics)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidRoster {
            team: self.name.clone(),
            reason,
        };

        if self.players.len() < LINEUP_SIZE {
            return Err(invalid(format!(
                "team needs at least {} players, found {}",
                LINEUP_SIZE,
                self.players.len()
            )));
        }
        if self.players.len() > MAX_ROSTER_SIZE {
            return Err(invalid(format!(
                "team may dress at most {} players, found {}",
                MAX_ROSTER_SIZE,
                self.players.len()
            )));
        }

        let mut seen = HashSet::new();
        for p in &self.players {
            if p.name.trim().is_empty() {
                return Err(invalid("player names must not be empty".to_string()));
            }
            if !seen.insert(p.name.as_str()) {
                return Err(invalid(format!("duplicate player name '{}'", p.name)));
            }
        }

        self.tactics.validate(&self.name, &self.players)
    }

    pub fn starters(&self) -> &[Player] {
        &self.players[..LINEUP_SIZE.min(self.players.len())]
    }

    pub fn bench(&self) -> &[Player] {
        &self.players[LINEUP_SIZE.min(self.players.len())..]
    }

    pub fn player_index(&self, name: &str) -> Option<usize> {
        self.players.iter().position(|p| p.name == name)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    Home,
    Away,
}

impl TeamSide {
    pub const BOTH: [TeamSide; 2] = [TeamSide::Home, TeamSide::Away];

    pub fn opponent(&self) -> TeamSide {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            TeamSide::Home => 0,
            TeamSide::Away => 1,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TeamSide::Home => f.write_str("home"),
            TeamSide::Away => f.write_str("away"),
        }
    }
}

/// Stable reference to a rostered player: side plus roster index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
pub struct PlayerRef {
    pub side: TeamSide,
    pub index: usize,
}

impl PlayerRef {
    pub fn new(side: TeamSide, index: usize) -> Self {
        Self { side, index }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Position;

    fn players(n: usize) -> Vec<Player> {
        (0..n).map(|i| Player::uniform(format!("P{}", i), Position::PG, 50.0)).collect()
    }

    #[test]
    fn test_validate_roster_size() {
        let short = Team::with_balanced_tactics("Short", players(4));
        assert!(matches!(short.validate(), Err(ConfigError::InvalidRoster { .. })));

        let ok = Team::with_balanced_tactics("Ok", players(12));
        assert!(ok.validate().is_ok());
        assert_eq!(ok.starters().len(), 5);
        assert_eq!(ok.bench().len(), 7);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut roster = players(6);
        roster[5].name = "P0".to_string();
        let team = Team::new("Dupes", roster.clone(), TacticalSettings::balanced(&roster[..5]));
        assert!(matches!(team.validate(), Err(ConfigError::InvalidRoster { .. })));
    }

    #[test]
    fn test_side_opponent() {
        assert_eq!(TeamSide::Home.opponent(), TeamSide::Away);
        assert_eq!(TeamSide::Away.opponent().index(), 0);
    }
}
