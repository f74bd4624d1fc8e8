//! Probability core
//!
//! Pure helpers shared by every subsystem. Randomness only enters through
//! the `rng` argument, so a game's single seeded stream is the sole source
//! of variation.

use super::config::WeightTable;
use crate::models::Player;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

pub const MIN_PROBABILITY: f32 = 0.05;
pub const MAX_PROBABILITY: f32 = 0.95;
/// Attribute differences beyond this are treated as this.
pub const MAX_ATTRIBUTE_DIFF: f32 = 40.0;

#[inline]
pub fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Weighted average of the player's attributes (0-100).
pub fn composite(player: &Player, table: &WeightTable) -> f32 {
    table.iter().map(|(attribute, weight)| player.attr(attribute) * weight).sum()
}

/// Composite scaled down by the current stamina penalty (0.0-0.25).
#[inline]
pub fn effective_composite(player: &Player, table: &WeightTable, stamina_penalty: f32) -> f32 {
    composite(player, table) * (1.0 - stamina_penalty.clamp(0.0, 1.0))
}

/// Weighted sigmoid anchored at `base_rate`.
///
/// `attr_diff` is clamped to ±40 and a non-finite diff counts as an even
/// matchup. Positive differences move the result toward 1, negative toward
/// 0; the result is clamped to [0.05, 0.95].
pub fn success_probability(base_rate: f32, attr_diff: f32, steepness: f32) -> f32 {
    let diff = if attr_diff.is_finite() {
        attr_diff.clamp(-MAX_ATTRIBUTE_DIFF, MAX_ATTRIBUTE_DIFF)
    } else {
        0.0
    };
    let base = if base_rate.is_finite() { base_rate.clamp(0.0, 1.0) } else { 0.5 };

    let centered = 2.0 * (sigmoid(steepness * diff) - 0.5);
    let p = if centered >= 0.0 { base + (1.0 - base) * centered } else { base * (1.0 + centered) };

    clamp_probability(p)
}

/// Clamp to [0.05, 0.95]; NaN reads as the midpoint.
#[inline]
pub fn clamp_probability(p: f32) -> f32 {
    if p.is_nan() {
        0.5
    } else {
        p.clamp(MIN_PROBABILITY, MAX_PROBABILITY)
    }
}

/// Bernoulli draw. Always consumes exactly one value from the stream.
#[inline]
pub fn roll<R: Rng + ?Sized>(rng: &mut R, p: f32) -> bool {
    rng.gen::<f32>() < p
}

/// Index drawn proportionally to `weights`.
///
/// Falls back to a uniform pick when every weight is zero or invalid.
/// Returns `None` only for an empty slice.
pub fn weighted_choice<R: Rng + ?Sized>(rng: &mut R, weights: &[f32]) -> Option<usize> {
    if weights.is_empty() {
        return None;
    }
    let cleaned: Vec<f32> =
        weights.iter().map(|w| if w.is_finite() && *w > 0.0 { *w } else { 0.0 }).collect();
    match WeightedIndex::new(&cleaned) {
        Ok(dist) => Some(dist.sample(rng)),
        Err(_) => Some(rng.gen_range(0..weights.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::CompositeWeights;
    use crate::models::{Attribute, Player, PlayerAttributes, Position};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_even_matchup_returns_base() {
        for base in [0.12, 0.33, 0.5, 0.74] {
            assert!((success_probability(base, 0.0, 0.065) - base).abs() < 1e-6);
        }
    }

    #[test]
    fn test_big_edge_nears_ceiling() {
        // 95 shooter vs 20 defender, wide open
        let p = success_probability(0.33, 95.0 - 20.0, 0.065);
        assert!(p > 0.9 && p <= MAX_PROBABILITY, "p = {}", p);
    }

    #[test]
    fn test_non_finite_diff_is_neutral() {
        assert!((success_probability(0.4, f32::NAN, 0.05) - 0.4).abs() < 1e-6);
        assert!((success_probability(0.4, f32::INFINITY, 0.05) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_composite_of_uniform_player() {
        let weights = CompositeWeights::default();
        let player = Player::uniform("Even", Position::SF, 70.0);
        for (_, table) in weights.tables() {
            assert!((composite(&player, table) - 70.0).abs() < 0.1);
        }
    }

    #[test]
    fn test_composite_tracks_weights() {
        let weights = CompositeWeights::default();
        let attrs = PlayerAttributes::default().with(Attribute::Height, 100.0);
        let tall = Player::new("Tall", Position::C, attrs);
        // block: height 0.35 -> 50 + 0.35 * 50
        assert!((composite(&tall, &weights.block) - 67.5).abs() < 0.01);
    }

    #[test]
    fn test_weighted_choice_fallbacks() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(weighted_choice(&mut rng, &[]), None);
        assert_eq!(weighted_choice(&mut rng, &[0.0, 0.0, 5.0]), Some(2));
        let pick = weighted_choice(&mut rng, &[0.0, 0.0]).unwrap();
        assert!(pick < 2);
    }

    proptest! {
        #[test]
        fn prop_probability_always_bounded(
            base in 0.0f32..=1.0,
            diff in -500.0f32..500.0,
            k in 0.0f32..1.0,
        ) {
            let p = success_probability(base, diff, k);
            prop_assert!((MIN_PROBABILITY..=MAX_PROBABILITY).contains(&p));
        }

        #[test]
        fn prop_monotone_in_diff(base in 0.1f32..0.9, a in -40.0f32..40.0, b in -40.0f32..40.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(success_probability(base, lo, 0.05) <= success_probability(base, hi, 0.05) + 1e-6);
        }
    }
}
