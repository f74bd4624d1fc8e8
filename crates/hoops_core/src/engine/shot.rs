//! Shot System
//!
//! ## Steps
//! 1. Shooter: usage-weighted pick from the lineup, scoring options boosted
//! 2. Shot type: baseline mix shifted by the shooter's composites, position,
//!    bravery, transition and end-game adjustments
//! 3. Contest distance from the matched defender, then bucketed by
//!    [`contest_level`], the only bucketing function in the engine
//! 4. Make probability, block check, assist credit

use super::config::{CompositeWeights, ShotConfig};
use super::game_state::TeamState;
use super::probability::{
    clamp_probability, effective_composite, roll, success_probability, weighted_choice,
};
use super::stamina::StaminaManager;
use crate::models::{Attribute, ContestLevel, Player, Position, ShotType};
use rand::Rng;

const THREE: usize = 0;
const MID: usize = 1;
const RIM: usize = 2;

/// Bucket a contest distance in feet.
///
/// Wide open at or above the wide-open edge, heavy below the heavy edge,
/// contested in between. Penalties, block eligibility and foul rates all
/// key off this one function.
pub fn contest_level(distance_ft: f32, cfg: &ShotConfig) -> ContestLevel {
    if distance_ft >= cfg.wide_open_distance {
        ContestLevel::WideOpen
    } else if distance_ft < cfg.heavy_contest_distance {
        ContestLevel::Heavy
    } else {
        ContestLevel::Contested
    }
}

// ============================================================================
// Shot type selection
// ============================================================================

/// Shot-type shares, always kept normalized (three, mid, rim).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotDistribution {
    shares: [f32; 3],
}

impl ShotDistribution {
    pub fn new(three_point: f32, midrange: f32, rim: f32) -> Self {
        let mut d = Self { shares: [three_point, midrange, rim] };
        d.normalize();
        d
    }

    pub fn shares(&self) -> [f32; 3] {
        self.shares
    }

    pub fn share(&self, shot_type: ShotType) -> f32 {
        self.shares[shot_type.index()]
    }

    fn normalize(&mut self) {
        for s in &mut self.shares {
            if !s.is_finite() || *s < 0.0 {
                *s = 0.0;
            }
        }
        let total: f32 = self.shares.iter().sum();
        if total <= 0.0 {
            self.shares = [1.0 / 3.0; 3];
        } else {
            for s in &mut self.shares {
                *s /= total;
            }
        }
    }

    /// Move `delta` of share into (or out of) one type, taking it from the
    /// other two in proportion to their current shares.
    pub fn shift(&mut self, index: usize, delta: f32) {
        if !delta.is_finite() || delta == 0.0 {
            return;
        }
        let current = self.shares[index];
        let target = (current + delta).clamp(0.0, 1.0);
        let moved = target - current;
        let others: f32 =
            self.shares.iter().enumerate().filter(|(i, _)| *i != index).map(|(_, s)| s).sum();

        if others <= 0.0 {
            // Nothing to take from; only a decrease can be redistributed
            if moved < 0.0 {
                let each = -moved / 2.0;
                for (i, s) in self.shares.iter_mut().enumerate() {
                    *s = if i == index { target } else { each };
                }
            }
            return;
        }
        for (i, s) in self.shares.iter_mut().enumerate() {
            if i == index {
                *s = target;
            } else {
                *s -= moved * (*s / others);
            }
        }
        self.normalize();
    }

    pub fn scale(&mut self, index: usize, factor: f32) {
        self.shares[index] *= factor.max(0.0);
        self.normalize();
    }

    fn apply_floor(&mut self, floor: f32) {
        for s in &mut self.shares {
            *s = s.max(floor);
        }
        self.normalize();
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ShotType {
        match weighted_choice(rng, &self.shares) {
            Some(THREE) => ShotType::ThreePoint,
            Some(MID) => ShotType::Midrange,
            _ => ShotType::Rim,
        }
    }
}

/// Inputs to shot-type selection that come from outside the shooter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShotSelectionModifiers {
    pub is_transition: bool,
    /// End-game additive change to the three-point share
    pub three_point_adjustment: f32,
    pub forced: Option<ShotType>,
}

/// Shot mix for one shooter before sampling.
pub fn shot_distribution(
    shooter: &Player,
    stamina_penalty: f32,
    weights: &CompositeWeights,
    cfg: &ShotConfig,
    modifiers: &ShotSelectionModifiers,
) -> ShotDistribution {
    let base = cfg.baseline_mix;
    let mut mix = ShotDistribution::new(base.three_point, base.midrange, base.rim);

    let three = effective_composite(shooter, &weights.three_point, stamina_penalty);
    let rim = effective_composite(shooter, &weights.rim, stamina_penalty);
    mix.shift(THREE, (three - 50.0) * cfg.composite_shift);
    mix.shift(RIM, (rim - 50.0) * cfg.composite_shift);

    match shooter.position {
        Position::C => mix.scale(THREE, cfg.center_three_factor),
        Position::PF => mix.scale(THREE, cfg.power_forward_three_factor),
        Position::PG | Position::SG => mix.scale(RIM, cfg.guard_rim_factor),
        Position::SF => {}
    }

    let bravery = shooter.attr(Attribute::Bravery);
    mix.shift(RIM, (bravery - 50.0) * cfg.bravery_rim_shift);

    if modifiers.is_transition {
        mix.shift(RIM, cfg.transition_rim_boost);
    }
    mix.shift(THREE, modifiers.three_point_adjustment);
    mix.apply_floor(cfg.min_type_share);
    mix
}

/// Pick a shot type. A forced type (end-game) skips sampling.
pub fn select_shot_type<R: Rng + ?Sized>(
    rng: &mut R,
    distribution: &ShotDistribution,
    modifiers: &ShotSelectionModifiers,
) -> ShotType {
    match modifiers.forced {
        Some(forced) => forced,
        None => distribution.sample(rng),
    }
}

// ============================================================================
// Shooter and assister selection
// ============================================================================

/// Mix-weighted shooting composite used for shot volume.
pub fn shooting_composite(
    team: &TeamState,
    index: usize,
    weights: &CompositeWeights,
    cfg: &ShotConfig,
    stamina: &StaminaManager,
) -> f32 {
    let mix = cfg.baseline_mix;
    mix.three_point * team.composite(index, &weights.three_point, stamina)
        + mix.midrange * team.composite(index, &weights.midrange, stamina)
        + mix.rim * team.composite(index, &weights.rim, stamina)
}

/// Usage weights for each lineup slot.
pub fn usage_weights(
    team: &TeamState,
    weights: &CompositeWeights,
    cfg: &ShotConfig,
    stamina: &StaminaManager,
) -> Vec<f32> {
    team.lineup
        .iter()
        .map(|&i| {
            let comp = shooting_composite(team, i, weights, cfg, stamina).max(1.0);
            let mut w = (comp / 50.0).powf(cfg.usage_exponent);
            if let Some(rank) = team.scoring_options.iter().position(|o| *o == i) {
                w *= cfg.scoring_option_boosts.get(rank).copied().unwrap_or(1.0);
            }
            w
        })
        .collect()
}

/// Roster index of the shooter.
pub fn select_shooter<R: Rng + ?Sized>(
    rng: &mut R,
    team: &TeamState,
    weights: &CompositeWeights,
    cfg: &ShotConfig,
    stamina: &StaminaManager,
) -> usize {
    let w = usage_weights(team, weights, cfg, stamina);
    let slot = weighted_choice(rng, &w).unwrap_or(0);
    team.lineup[slot]
}

/// Teammate credited with the assist on a made shot, if any.
pub fn select_assister<R: Rng + ?Sized>(
    rng: &mut R,
    team: &TeamState,
    shooter: usize,
    shot_type: ShotType,
    weights: &CompositeWeights,
    cfg: &ShotConfig,
    stamina: &StaminaManager,
) -> Option<usize> {
    if !roll(rng, cfg.assist_rate.get(shot_type)) {
        return None;
    }
    let candidates: Vec<usize> = team.lineup.iter().copied().filter(|i| *i != shooter).collect();
    let w: Vec<f32> =
        candidates.iter().map(|&i| team.composite(i, &weights.passing, stamina).max(1.0)).collect();
    weighted_choice(rng, &w).map(|k| candidates[k])
}

// ============================================================================
// Contest, make probability and blocks
// ============================================================================

/// Everything that moves the closest defender toward or away from the
/// shooter.
#[derive(Debug, Clone, Copy)]
pub struct ContestInputs {
    pub shot_type: ShotType,
    /// Defender's contest composite
    pub defender_contest: f32,
    pub defender_acceleration: f32,
    pub shooter_patience: f32,
    pub in_zone: bool,
    pub is_transition: bool,
}

/// Distance in feet from the closest defender at release.
///
/// Draws two values: the help-defense roll, then the noise.
pub fn contest_distance<R: Rng + ?Sized>(rng: &mut R, inputs: &ContestInputs, cfg: &ShotConfig) -> f32 {
    let mut d = cfg.contest_base_distance - cfg.contest_slope * inputs.defender_contest;
    d -= (inputs.defender_acceleration - 50.0) * cfg.acceleration_effect;

    let mut help = cfg.help_base_probability;
    if inputs.in_zone {
        help += cfg.help_zone_bonus;
    }
    if inputs.shot_type == ShotType::Rim {
        help *= cfg.help_rim_multiplier;
    }
    if roll(rng, help.clamp(0.0, 1.0)) {
        d -= cfg.help_distance;
    }

    if inputs.in_zone {
        match inputs.shot_type {
            ShotType::ThreePoint => d += cfg.zone_three_loosen,
            ShotType::Rim => d -= cfg.zone_rim_tighten,
            ShotType::Midrange => {}
        }
    }

    d += (inputs.shooter_patience - 50.0) * cfg.patience_effect;
    if inputs.is_transition {
        d += cfg.transition_space;
    }

    let noise = cfg.contest_noise.max(0.0);
    d += rng.gen_range(-noise..=noise);

    d.clamp(0.0, cfg.max_contest_distance)
}

/// Make probability after contest penalty and transition bonus.
pub fn make_probability(
    shot_type: ShotType,
    shooter_composite: f32,
    defender_composite: f32,
    contest: ContestLevel,
    is_transition: bool,
    cfg: &ShotConfig,
) -> f32 {
    let mut p = success_probability(
        cfg.base_rate.get(shot_type),
        shooter_composite - defender_composite,
        cfg.steepness,
    );
    p -= cfg.contest_penalty(shot_type, contest);
    if is_transition {
        p += cfg.transition_bonus.get(shot_type);
    }
    clamp_probability(p)
}

/// Block probability; zero for wide-open shots and for three-pointers at the
/// default base rate.
pub fn block_probability(
    shot_type: ShotType,
    contest: ContestLevel,
    blocker_composite: f32,
    shooter_composite: f32,
    cfg: &ShotConfig,
) -> f32 {
    if !contest.is_contested() {
        return 0.0;
    }
    let base = cfg.block_base.get(shot_type);
    if base <= 0.0 {
        return 0.0;
    }
    let scale = (1.0 + (blocker_composite - shooter_composite) / cfg.block_scale_divisor)
        .clamp(cfg.block_scale_min, cfg.block_scale_max);
    let heavy = if contest == ContestLevel::Heavy { cfg.heavy_block_multiplier } else { 1.0 };
    (base * scale * heavy).clamp(0.0, cfg.max_block_probability)
}
