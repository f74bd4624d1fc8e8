//! Turnover System
//!
//! Checked before any shot; a turnover ends the possession.

use super::config::TurnoverConfig;
use super::probability::{clamp_probability, roll, success_probability, weighted_choice};
use crate::models::TurnoverType;
use crate::tactics::Pace;
use rand::Rng;

/// Situational inputs to the turnover check.
#[derive(Debug, Clone, Copy)]
pub struct TurnoverSituation {
    pub pace: Pace,
    /// Defense's zone share, 0.0-1.0
    pub zone_fraction: f32,
    pub is_transition: bool,
    pub end_game_adjustment: f32,
}

/// `success_probability(base, defender - handler)` plus additive pace,
/// zone, transition and end-game terms.
pub fn turnover_probability(
    handler_composite: f32,
    defender_composite: f32,
    situation: &TurnoverSituation,
    cfg: &TurnoverConfig,
) -> f32 {
    let mut p = success_probability(
        cfg.base_rate,
        defender_composite - handler_composite,
        cfg.steepness,
    );
    p += cfg.pace_adjustment(situation.pace);
    p += cfg.zone_adjustment * situation.zone_fraction.clamp(0.0, 1.0);
    if situation.is_transition {
        p += cfg.transition_adjustment;
    }
    p += situation.end_game_adjustment;
    clamp_probability(p)
}

pub fn select_turnover_type<R: Rng + ?Sized>(rng: &mut R, cfg: &TurnoverConfig) -> TurnoverType {
    let table = cfg.type_weights();
    let weights: Vec<f32> = table.iter().map(|(_, w)| *w).collect();
    let k = weighted_choice(rng, &weights).unwrap_or(0);
    table[k].0
}

/// Steal credit on a live-ball turnover; rises with the defender's steal
/// composite.
pub fn steal_probability(steal_composite: f32, cfg: &TurnoverConfig) -> f32 {
    (cfg.steal_base + (steal_composite - 50.0) * cfg.steal_slope).clamp(cfg.steal_min, cfg.steal_max)
}

/// Does the defense run after this turnover?
pub fn transition_after<R: Rng + ?Sized>(
    rng: &mut R,
    kind: TurnoverType,
    stolen: bool,
    cfg: &TurnoverConfig,
) -> bool {
    if stolen {
        roll(rng, cfg.transition_after_steal)
    } else if kind.is_live_ball() {
        roll(rng, cfg.transition_after_live_turnover)
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn situation(pace: Pace) -> TurnoverSituation {
        TurnoverSituation { pace, zone_fraction: 0.0, is_transition: false, end_game_adjustment: 0.0 }
    }

    #[test]
    fn test_base_rate_and_modifiers() {
        let cfg = TurnoverConfig::default();
        let even = turnover_probability(50.0, 50.0, &situation(Pace::Standard), &cfg);
        assert!((even - 0.12).abs() < 1e-6);

        let fast = turnover_probability(50.0, 50.0, &situation(Pace::Fast), &cfg);
        let slow = turnover_probability(50.0, 50.0, &situation(Pace::Slow), &cfg);
        assert!((fast - 0.145).abs() < 1e-6);
        assert!((slow - 0.095).abs() < 1e-6);

        let zone = TurnoverSituation { zone_fraction: 1.0, ..situation(Pace::Standard) };
        assert!((turnover_probability(50.0, 50.0, &zone, &cfg) - 0.15).abs() < 1e-6);

        let running = TurnoverSituation { is_transition: true, ..situation(Pace::Standard) };
        assert!((turnover_probability(50.0, 50.0, &running, &cfg) - 0.10).abs() < 1e-6);
    }

    #[test]
    fn test_ball_security_matters() {
        let cfg = TurnoverConfig::default();
        let s = situation(Pace::Standard);
        assert!(turnover_probability(85.0, 40.0, &s, &cfg) < turnover_probability(40.0, 85.0, &s, &cfg));
    }

    #[test]
    fn test_type_frequencies() {
        let cfg = TurnoverConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let mut counts: HashMap<TurnoverType, u32> = HashMap::new();
        for _ in 0..10_000 {
            *counts.entry(select_turnover_type(&mut rng, &cfg)).or_default() += 1;
        }
        let bad_pass = counts[&TurnoverType::BadPass] as f32 / 10_000.0;
        assert!((bad_pass - 0.40).abs() < 0.03);
        assert!(counts[&TurnoverType::Violation] > 1000);
    }

    #[test]
    fn test_steal_probability_bounds() {
        let cfg = TurnoverConfig::default();
        assert!((steal_probability(50.0, &cfg) - 0.55).abs() < 1e-6);
        assert_eq!(steal_probability(100.0, &cfg), 0.85);
        assert_eq!(steal_probability(0.0, &cfg), 0.20);
    }

    #[test]
    fn test_dead_ball_turnovers_never_run() {
        let cfg = TurnoverConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        for _ in 0..100 {
            assert!(!transition_after(&mut rng, TurnoverType::Violation, false, &cfg));
            assert!(!transition_after(&mut rng, TurnoverType::OffensiveFoul, false, &cfg));
        }
    }
}
