pub mod team_tactics;

pub use team_tactics::{
    balanced_minutes, Pace, ReboundStrategy, TacticalSettings, TimeoutStrategy, MAX_CLOSERS,
    MAX_SCORING_OPTIONS, REGULATION_MINUTES,
};
