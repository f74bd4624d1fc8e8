//! Foul System
//!
//! Shooting, non-shooting and offensive fouls, foul counters and foul-outs.
//! Free-throw shooting lives in [`super::free_throws`].

use super::config::{CompositeWeights, FoulConfig};
use super::game_state::TeamState;
use super::probability::roll;
use super::stamina::StaminaManager;
use crate::models::{ContestLevel, ShotType};
use rand::Rng;

/// Shooting-foul chance for a contest bucket and shot type.
pub fn shooting_foul_probability(contest: ContestLevel, shot_type: ShotType, cfg: &FoulConfig) -> f32 {
    (cfg.contest_foul_rate(contest) * cfg.shot_type_multiplier.get(shot_type)).clamp(0.0, 1.0)
}

/// Free throws for a shooting foul: one on a make, otherwise the shot's
/// point value.
pub fn shooting_foul_free_throws(shot_type: ShotType, made: bool) -> u8 {
    if made {
        1
    } else {
        shot_type.points()
    }
}

pub fn non_shooting_foul<R: Rng + ?Sized>(rng: &mut R, cfg: &FoulConfig) -> bool {
    roll(rng, cfg.non_shooting_rate)
}

/// Team is shooting bonus free throws once the period count, including the
/// foul just committed, reaches the threshold.
pub fn in_bonus(team_fouls_after: u8, is_overtime: bool, cfg: &FoulConfig) -> bool {
    team_fouls_after >= cfg.bonus_threshold_for(is_overtime)
}

/// Counters after a recorded foul.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoulTally {
    pub personal_fouls: u8,
    pub team_fouls: u8,
    pub fouled_out: bool,
}

/// Charge a foul to `fouler`. Offensive fouls skip the team count.
///
/// A player reaching the limit is flagged fouled out here; removal from
/// the lineup is the substitution manager's job.
pub fn record_foul(team: &mut TeamState, fouler: usize, counts_for_team: bool, cfg: &FoulConfig) -> FoulTally {
    if counts_for_team {
        team.period_fouls = team.period_fouls.saturating_add(1);
    }
    let player = &mut team.players[fouler];
    player.personal_fouls = player.personal_fouls.saturating_add(1);
    let newly_out = !player.fouled_out && player.personal_fouls >= cfg.personal_foul_limit;
    if newly_out {
        player.fouled_out = true;
        log::debug!(
            "{} fouled out with {} personal fouls",
            team.team.players[fouler].name,
            cfg.personal_foul_limit
        );
    }
    FoulTally {
        personal_fouls: team.players[fouler].personal_fouls,
        team_fouls: team.period_fouls,
        fouled_out: newly_out,
    }
}

/// Target of an intentional foul: the best free-throw shooter on the floor
/// with the configured share, otherwise one of the others uniformly.
pub fn intentional_foul_target<R: Rng + ?Sized>(
    rng: &mut R,
    offense: &TeamState,
    weights: &CompositeWeights,
    cfg: &FoulConfig,
    stamina: &StaminaManager,
) -> usize {
    let best = offense.best_on_court(&weights.free_throw, stamina);
    if roll(rng, cfg.intentional_best_shooter_share) {
        return best;
    }
    let rest: Vec<usize> = offense.lineup.iter().copied().filter(|i| *i != best).collect();
    if rest.is_empty() {
        return best;
    }
    rest[rng.gen_range(0..rest.len())]
}

/// Seconds burned before the intentional foul.
pub fn intentional_foul_elapsed<R: Rng + ?Sized>(rng: &mut R, cfg: &FoulConfig) -> f32 {
    rng.gen_range(cfg.intentional_min_seconds..=cfg.intentional_max_seconds)
}
