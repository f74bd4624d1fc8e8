pub mod box_score;
pub mod events;
pub mod game_result;
pub mod player;
pub mod possession;
pub mod team;

pub use box_score::{BoxScore, PlayerBoxScore, StatLine, TeamBoxScore};
pub use events::{
    period_label, PlayByPlayEntry, PlayKind, SubstitutionEvent, SubstitutionReason, TimeoutEvent,
    TimeoutReason,
};
pub use game_result::{DeterminismMeta, FinalScore, GameResult, QuarterResult};
pub use player::{
    Attribute, AttributeCategory, Player, PlayerAttributes, Position, PositionGroup,
    DEFAULT_ATTRIBUTE,
};
pub use possession::{
    ContestLevel, EndGameMode, FoulEvent, FoulKind, FreeThrowResult, PossessionOutcome,
    PossessionResult, PossessionTrace, ReboundEvent, ShotAttempt, ShotType, TurnoverEvent,
    TurnoverType, TRACE_VERSION,
};
pub use team::{PlayerRef, Team, TeamSide, LINEUP_SIZE, MAX_ROSTER_SIZE};
