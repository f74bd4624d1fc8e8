//! Possession-level records
//!
//! A `PossessionResult` is produced once per possession and never mutated.
//! Every shot carries its own rebound (present iff missed) and a free-throw
//! trip carries the rebound of a missed final attempt, so the rebound
//! invariant can be checked by walking the records alone.

use super::events::SubstitutionEvent;
use super::team::{PlayerRef, TeamSide};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bumped whenever a trace field changes meaning.
pub const TRACE_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum ShotType {
    ThreePoint,
    Midrange,
    Rim,
}

impl ShotType {
    pub const ALL: [ShotType; 3] = [ShotType::ThreePoint, ShotType::Midrange, ShotType::Rim];

    pub fn points(&self) -> u8 {
        match self {
            ShotType::ThreePoint => 3,
            ShotType::Midrange | ShotType::Rim => 2,
        }
    }

    pub fn is_three(&self) -> bool {
        matches!(self, ShotType::ThreePoint)
    }

    pub fn index(&self) -> usize {
        match self {
            ShotType::ThreePoint => 0,
            ShotType::Midrange => 1,
            ShotType::Rim => 2,
        }
    }
}

impl fmt::Display for ShotType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            ShotType::ThreePoint => "three-pointer",
            ShotType::Midrange => "mid-range jumper",
            ShotType::Rim => "shot at the rim",
        };
        f.write_str(label)
    }
}

/// Contest bucket of a shot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum ContestLevel {
    WideOpen,
    Contested,
    Heavy,
}

impl ContestLevel {
    pub fn is_contested(&self) -> bool {
        !matches!(self, ContestLevel::WideOpen)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum PossessionOutcome {
    MadeShot,
    MissedShot,
    Turnover,
    ShootingFoul,
    NonShootingFoul,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum TurnoverType {
    BadPass,
    LostBall,
    OffensiveFoul,
    Violation,
}

impl TurnoverType {
    /// Only these can be stolen or run out in transition.
    pub fn is_live_ball(&self) -> bool {
        matches!(self, TurnoverType::BadPass | TurnoverType::LostBall)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FoulKind {
    Shooting,
    NonShooting,
    Offensive,
}

/// Late-game tactical overrides active for a possession.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "snake_case")]
pub enum EndGameMode {
    Desperation,
    ConserveLead,
    ClockKill,
    LastShot,
    IntentionalFoul,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ReboundEvent {
    pub rebounder: PlayerRef,
    pub offensive: bool,
    /// Offensive-rebound probability the roll was made against
    pub offensive_probability: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct ShotAttempt {
    pub shooter: PlayerRef,
    pub defender: PlayerRef,
    pub shot_type: ShotType,
    pub contest_distance: f32,
    pub contest: ContestLevel,
    /// Make probability after contest and transition adjustments
    pub probability: f32,
    pub made: bool,
    pub blocked_by: Option<PlayerRef>,
    pub fouled: bool,
    pub is_putback: bool,
    pub assist: Option<PlayerRef>,
    /// Present iff the shot missed and was not fouled.
    pub rebound: Option<ReboundEvent>,
}

impl ShotAttempt {
    /// A fouled miss is not a field-goal attempt.
    pub fn counts_as_attempt(&self) -> bool {
        self.made || !self.fouled
    }

    pub fn points(&self) -> u8 {
        if self.made {
            self.shot_type.points()
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TurnoverEvent {
    pub kind: TurnoverType,
    pub committed_by: PlayerRef,
    pub stolen_by: Option<PlayerRef>,
    pub probability: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FoulEvent {
    pub kind: FoulKind,
    pub committed_by: PlayerRef,
    pub fouled: PlayerRef,
    /// Personal fouls of the fouler after this foul
    pub personal_fouls: u8,
    /// Team fouls this period after this foul (offensive fouls do not count)
    pub team_fouls: u8,
    pub free_throws: u8,
    pub and_one: bool,
    pub fouled_out: bool,
    pub intentional: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FreeThrowResult {
    pub shooter: PlayerRef,
    pub probability: f32,
    /// One entry per attempt, in order.
    pub results: Vec<bool>,
    /// Present iff the final attempt missed.
    pub rebound: Option<ReboundEvent>,
}

impl FreeThrowResult {
    pub fn attempts(&self) -> u8 {
        self.results.len() as u8
    }

    pub fn made(&self) -> u8 {
        self.results.iter().filter(|r| **r).count() as u8
    }

    pub fn final_made(&self) -> bool {
        self.results.last().copied().unwrap_or(false)
    }
}

/// Structured per-possession trace with explicit per-subsystem fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PossessionTrace {
    pub version: u32,
    pub is_transition: bool,
    pub shot_clock_at_start: f32,
    pub sampled_duration: f32,
    pub end_game_modes: Vec<EndGameMode>,
    pub turnover_probability: Option<f32>,
    /// Three / mid / rim shares the shot type was sampled from
    pub shot_mix: Option<[f32; 3]>,
    pub foul_probability: Option<f32>,
    pub block_probability: Option<f32>,
}

impl PossessionTrace {
    pub fn new(is_transition: bool, shot_clock_at_start: f32) -> Self {
        Self {
            version: TRACE_VERSION,
            is_transition,
            shot_clock_at_start,
            sampled_duration: 0.0,
            end_game_modes: Vec::new(),
            turnover_probability: None,
            shot_mix: None,
            foul_probability: None,
            block_probability: None,
        }
    }
}

/// Everything that happened in one possession.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PossessionResult {
    pub period: u8,
    pub offense: TeamSide,
    pub outcome: PossessionOutcome,
    pub points: u8,
    /// Game clock at the start of the possession
    pub start_clock: f32,
    pub elapsed: f32,
    pub shots: Vec<ShotAttempt>,
    pub turnover: Option<TurnoverEvent>,
    pub foul: Option<FoulEvent>,
    pub free_throws: Option<FreeThrowResult>,
    /// Lineups on the floor when the possession started
    pub offense_lineup: Vec<usize>,
    pub defense_lineup: Vec<usize>,
    /// Foul-out replacements made during the whistle, before free throws
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub substitutions: Vec<SubstitutionEvent>,
    pub next_offense: TeamSide,
    pub next_is_transition: bool,
    pub next_shot_clock: f32,
    pub trace: PossessionTrace,
}

impl PossessionResult {
    /// Rebounds in the order they happened.
    pub fn rebounds(&self) -> impl Iterator<Item = &ReboundEvent> {
        self.shots
            .iter()
            .filter_map(|s| s.rebound.as_ref())
            .chain(self.free_throws.iter().filter_map(|ft| ft.rebound.as_ref()))
    }

    pub fn field_goal_points(&self) -> u8 {
        self.shots.iter().map(|s| s.points()).sum()
    }

    pub fn free_throw_points(&self) -> u8 {
        self.free_throws.as_ref().map(|ft| ft.made()).unwrap_or(0)
    }
}
