use super::box_score::BoxScore;
use super::events::{PlayByPlayEntry, SubstitutionEvent, TimeoutEvent};
use super::possession::PossessionResult;
use super::team::TeamSide;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
pub struct FinalScore {
    pub home: u16,
    pub away: u16,
}

impl FinalScore {
    pub fn get(&self, side: TeamSide) -> u16 {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }

    pub fn winner(&self) -> Option<TeamSide> {
        match self.home.cmp(&self.away) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Points scored in one period (regulation quarter or overtime).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct QuarterResult {
    pub period: u8,
    pub home_points: u16,
    pub away_points: u16,
    pub possessions: u32,
}

impl QuarterResult {
    pub fn points(&self, side: TeamSide) -> u16 {
        match side {
            TeamSide::Home => self.home_points,
            TeamSide::Away => self.away_points,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct DeterminismMeta {
    pub seed: u64,
    pub engine_version: String,
    /// Hex SHA-256 of the newline-joined play-by-play transcript
    pub transcript_sha256: String,
    pub possession_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct GameResult {
    pub home_team: String,
    pub away_team: String,
    pub final_score: FinalScore,
    pub quarter_scores: Vec<QuarterResult>,
    pub overtime_periods: u8,
    /// Still tied after the overtime cap
    pub ended_tied: bool,
    pub winner: Option<TeamSide>,
    pub play_by_play: Vec<PlayByPlayEntry>,
    pub box_score: BoxScore,
    pub timeouts: Vec<TimeoutEvent>,
    pub substitutions: Vec<SubstitutionEvent>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub possessions: Vec<PossessionResult>,
    pub determinism: DeterminismMeta,
}

impl GameResult {
    /// Plain-text transcript, one line per play.
    pub fn transcript(&self) -> String {
        self.play_by_play.iter().map(|e| e.line()).collect::<Vec<_>>().join("\n")
    }

    pub fn reconciles(&self) -> bool {
        self.box_score.reconciles(&self.quarter_scores, &self.final_score)
    }
}
