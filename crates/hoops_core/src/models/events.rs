use super::team::{PlayerRef, TeamSide};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Timeouts
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TimeoutReason {
    /// Opponent run of `run` unanswered points.
    Momentum { run: u32 },
    /// Draw up a final possession.
    PlayDesign,
    /// Stop the clock while trailing.
    ClockStop,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TimeoutEvent {
    pub side: TeamSide,
    pub period: u8,
    pub game_clock: f32,
    pub reason: TimeoutReason,
    /// Budget left after this timeout
    pub remaining: u8,
    pub home_score: u16,
    pub away_score: u16,
}

// ============================================================================
// Substitutions
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum SubstitutionReason {
    FoulOut,
    Fatigue,
    MinutesBudget,
    Closer,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct SubstitutionEvent {
    pub side: TeamSide,
    pub period: u8,
    pub game_clock: f32,
    pub player_out: PlayerRef,
    pub player_in: PlayerRef,
    pub player_out_name: String,
    pub player_in_name: String,
    pub reason: SubstitutionReason,
    /// Roster indices on the floor after the swap
    pub lineup_after: Vec<usize>,
}

// ============================================================================
// Play-by-play
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlayKind {
    PeriodStart,
    JumpBall,
    MadeShot,
    MissedShot,
    Block,
    Rebound,
    Turnover,
    Steal,
    Foul,
    FreeThrow,
    Timeout,
    Substitution,
    PeriodEnd,
    GameEnd,
}

/// One line of the transcript, stamped with the period, clock and the
/// score after the play.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PlayByPlayEntry {
    pub period: u8,
    /// Game clock as `mm:ss`
    pub clock: String,
    pub kind: PlayKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamSide>,
    pub text: String,
    pub home_score: u16,
    pub away_score: u16,
}

impl PlayByPlayEntry {
    /// Transcript line used for hashing and plain-text export.
    pub fn line(&self) -> String {
        format!(
            "{} {} [{}-{}] {}",
            period_label(self.period),
            self.clock,
            self.home_score,
            self.away_score,
            self.text
        )
    }
}

/// `Q1`..`Q4`, then `OT1`, `OT2`, ...
pub fn period_label(period: u8) -> String {
    if period <= 4 {
        format!("Q{}", period)
    } else {
        format!("OT{}", period - 4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_label() {
        assert_eq!(period_label(1), "Q1");
        assert_eq!(period_label(4), "Q4");
        assert_eq!(period_label(5), "OT1");
        assert_eq!(period_label(7), "OT3");
    }

    #[test]
    fn test_timeout_reason_is_tagged() {
        let json = serde_json::to_string(&TimeoutReason::Momentum { run: 8 }).unwrap();
        assert_eq!(json, r#"{"type":"momentum","run":8}"#);
    }
}
