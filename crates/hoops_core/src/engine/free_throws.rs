//! Free-throw shooting.

use super::config::FoulConfig;
use super::probability::{clamp_probability, roll, success_probability};
use rand::Rng;

/// Pressure modifiers for a trip to the line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FreeThrowSituation {
    pub and_one: bool,
    pub in_bonus: bool,
    pub clutch: bool,
}

/// Last `clutch_seconds` of the final period or overtime, within
/// `clutch_margin` points.
pub fn is_clutch(period: u8, seconds_remaining: f32, margin: i32, cfg: &FoulConfig) -> bool {
    period >= 4 && seconds_remaining <= cfg.clutch_seconds && margin.abs() <= cfg.clutch_margin
}

/// Per-attempt make probability for a free-throw composite.
pub fn free_throw_probability(composite: f32, situation: &FreeThrowSituation, cfg: &FoulConfig) -> f32 {
    let mut p = success_probability(cfg.free_throw_base, composite - 50.0, cfg.free_throw_steepness);
    if situation.and_one {
        p += cfg.and_one_bonus;
    }
    if situation.in_bonus {
        p -= cfg.bonus_penalty;
    }
    if situation.clutch {
        p -= cfg.clutch_penalty;
    }
    clamp_probability(p)
}

/// Each attempt is rolled independently.
pub fn shoot<R: Rng + ?Sized>(rng: &mut R, attempts: u8, probability: f32) -> Vec<bool> {
    (0..attempts).map(|_| roll(rng, probability)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_average_shooter_hits_base() {
        let cfg = FoulConfig::default();
        let p = free_throw_probability(50.0, &FreeThrowSituation::default(), &cfg);
        assert!((p - 0.74).abs() < 1e-6);
    }

    #[test]
    fn test_pressure_modifiers() {
        let cfg = FoulConfig::default();
        let calm = free_throw_probability(60.0, &FreeThrowSituation::default(), &cfg);
        let and_one =
            free_throw_probability(60.0, &FreeThrowSituation { and_one: true, ..Default::default() }, &cfg);
        let pressure = free_throw_probability(
            60.0,
            &FreeThrowSituation { in_bonus: true, clutch: true, ..Default::default() },
            &cfg,
        );
        assert!((and_one - calm - 0.03).abs() < 1e-5);
        assert!((calm - pressure - 0.06).abs() < 1e-5);
    }

    #[test]
    fn test_clutch_window() {
        let cfg = FoulConfig::default();
        assert!(is_clutch(4, 90.0, -3, &cfg));
        assert!(is_clutch(6, 120.0, 5, &cfg));
        assert!(!is_clutch(3, 30.0, 0, &cfg));
        assert!(!is_clutch(4, 121.0, 0, &cfg));
        assert!(!is_clutch(4, 60.0, 6, &cfg));
    }

    #[test]
    fn test_ten_thousand_free_throws_cluster_on_prediction() {
        let cfg = FoulConfig::default();
        let p = free_throw_probability(90.0, &FreeThrowSituation::default(), &cfg);
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let makes = (0..5_000).flat_map(|_| shoot(&mut rng, 2, p)).filter(|m| *m).count();
        let rate = makes as f32 / 10_000.0;
        // Binomial standard deviation at n = 10,000
        let sd = (p * (1.0 - p) / 10_000.0).sqrt();
        assert!((rate - p).abs() < 4.0 * sd, "rate {} vs predicted {}", rate, p);
    }
}
