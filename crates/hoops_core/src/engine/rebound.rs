//! Rebounding System
//!
//! Exactly one rebound is resolved per missed (or blocked) field goal and
//! per missed final free throw.

use super::config::{CompositeWeights, ReboundConfig};
use super::game_state::TeamState;
use super::probability::{roll, weighted_choice};
use super::stamina::StaminaManager;
use crate::models::{Attribute, Player, PositionGroup, ReboundEvent, ShotType};
use crate::tactics::ReboundStrategy;
use rand::Rng;

/// What produced the loose ball.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissSource {
    FieldGoal(ShotType),
    FreeThrow,
}

/// Lineup members ranked by rebounding composite, best first; lineup order
/// breaks ties.
fn ranked(team: &TeamState, weights: &CompositeWeights, stamina: &StaminaManager) -> Vec<(usize, f32)> {
    let mut v: Vec<(usize, f32)> = team
        .lineup
        .iter()
        .map(|&i| (i, team.composite(i, &weights.rebounding, stamina)))
        .collect();
    v.sort_by(|a, b| b.1.total_cmp(&a.1));
    v
}

/// Offensive-rebound probability: crasher strength over total strength,
/// less the defense's structural edge, plus the miss-type adjustment.
pub fn offensive_rebound_probability(
    offense: &TeamState,
    defense: &TeamState,
    source: MissSource,
    weights: &CompositeWeights,
    cfg: &ReboundConfig,
    stamina: &StaminaManager,
) -> f32 {
    let crashers = cfg.crashers(offense.team.tactics.rebounding_strategy);
    let off: f32 = ranked(offense, weights, stamina).iter().take(crashers).map(|(_, c)| c).sum();
    let def: f32 = ranked(defense, weights, stamina).iter().take(cfg.boxers).map(|(_, c)| c).sum();

    let share = if off + def > 0.0 { off / (off + def) } else { 0.5 };
    let adjustment = match source {
        MissSource::FieldGoal(ShotType::ThreePoint) => cfg.three_point_adjustment,
        MissSource::FieldGoal(_) => 0.0,
        MissSource::FreeThrow => cfg.free_throw_adjustment,
    };
    (share - cfg.defensive_advantage + adjustment)
        .clamp(cfg.min_offensive_probability, cfg.max_offensive_probability)
}

fn position_weight(player: &Player, source: MissSource, cfg: &ReboundConfig) -> f32 {
    match (source, player.position.group()) {
        (MissSource::FieldGoal(ShotType::ThreePoint), PositionGroup::Guard) => {
            cfg.guard_long_miss_weight
        }
        (MissSource::FieldGoal(ShotType::Rim), PositionGroup::Big) => cfg.big_rim_miss_weight,
        _ => 1.0,
    }
}

fn pick_rebounder<R: Rng + ?Sized>(
    rng: &mut R,
    team: &TeamState,
    candidates: &[(usize, f32)],
    source: MissSource,
    cfg: &ReboundConfig,
) -> usize {
    let w: Vec<f32> = candidates
        .iter()
        .map(|(i, c)| c.max(1.0) * position_weight(team.player(*i), source, cfg))
        .collect();
    let k = weighted_choice(rng, &w).unwrap_or(0);
    candidates[k].0
}

/// Resolve a loose ball. Draws the offensive/defensive roll, then the
/// rebounder.
pub fn resolve_rebound<R: Rng + ?Sized>(
    rng: &mut R,
    offense: &TeamState,
    defense: &TeamState,
    source: MissSource,
    weights: &CompositeWeights,
    cfg: &ReboundConfig,
    stamina: &StaminaManager,
) -> ReboundEvent {
    let p = offensive_rebound_probability(offense, defense, source, weights, cfg, stamina);
    let offensive = roll(rng, p);

    let rebounder = if offensive {
        let crashers = cfg.crashers(offense.team.tactics.rebounding_strategy);
        let mut pool = ranked(offense, weights, stamina);
        pool.truncate(crashers.max(1));
        offense.player_ref(pick_rebounder(rng, offense, &pool, source, cfg))
    } else {
        let mut pool = ranked(defense, weights, stamina);
        pool.truncate(cfg.boxers.max(1));
        defense.player_ref(pick_rebounder(rng, defense, &pool, source, cfg))
    };

    ReboundEvent { rebounder, offensive, offensive_probability: p }
}

/// Tall offensive rebounders go straight back up.
pub fn is_putback_candidate(player: &Player, cfg: &ReboundConfig) -> bool {
    player.attr(Attribute::Height) > cfg.putback_height_threshold
}

/// Transition chance after a defensive rebound, keyed on how hard the
/// shooting team went to the glass.
pub fn transition_probability(shooting_strategy: ReboundStrategy, cfg: &ReboundConfig) -> f32 {
    (cfg.transition_base * cfg.transition_factor(shooting_strategy)).clamp(0.0, 1.0)
}
