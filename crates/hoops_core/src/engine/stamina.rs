//! Stamina Manager
//!
//! ## Model
//! - On court: stamina drains per second, scaled by the stamina attribute
//!   (fitter players drain slower) and by team pace
//! - On the bench: stamina recovers per second, fitter players faster
//! - Below the penalty threshold every composite is scaled down
//! - Halftime restores a share of the missing stamina once per game
//!
//! Every result is clamped to [0, 100].

use super::config::StaminaConfig;
use crate::tactics::Pace;

pub const STAMINA_MIN: f32 = 0.0;
pub const STAMINA_MAX: f32 = 100.0;

#[inline]
fn clamp_stamina(value: f32) -> f32 {
    if value.is_nan() {
        STAMINA_MIN
    } else {
        value.clamp(STAMINA_MIN, STAMINA_MAX)
    }
}

#[derive(Debug, Clone)]
pub struct StaminaManager {
    config: StaminaConfig,
    halftime_applied: bool,
}

impl StaminaManager {
    pub fn new(config: StaminaConfig) -> Self {
        Self { config, halftime_applied: false }
    }

    fn drain_multiplier(&self, stamina_attr: f32) -> f32 {
        (self.config.drain_attr_offset - stamina_attr / 100.0)
            .clamp(self.config.multiplier_min, self.config.multiplier_max)
    }

    fn recovery_multiplier(&self, stamina_attr: f32) -> f32 {
        (self.config.recovery_attr_offset + stamina_attr / 100.0)
            .clamp(self.config.multiplier_min, self.config.multiplier_max)
    }

    pub fn pace_multiplier(&self, pace: Pace) -> f32 {
        match pace {
            Pace::Fast => self.config.fast_pace_drain,
            Pace::Standard => self.config.standard_pace_drain,
            Pace::Slow => self.config.slow_pace_drain,
        }
    }

    /// Stamina after `seconds` on court.
    pub fn drain(&self, current: f32, stamina_attr: f32, seconds: f32, pace: Pace) -> f32 {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        let loss = self.config.drain_per_second
            * seconds
            * self.drain_multiplier(stamina_attr)
            * self.pace_multiplier(pace);
        clamp_stamina(current - loss)
    }

    /// Stamina after `seconds` on the bench.
    pub fn recover(&self, current: f32, stamina_attr: f32, seconds: f32) -> f32 {
        let seconds = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        let gain =
            self.config.recovery_per_second * seconds * self.recovery_multiplier(stamina_attr);
        clamp_stamina(current + gain)
    }

    /// Multiplicative composite penalty: 0 at or above the threshold, rising
    /// monotonically to `max_penalty` at zero stamina.
    pub fn current_penalty(&self, stamina: f32) -> f32 {
        let stamina = clamp_stamina(stamina);
        let threshold = self.config.penalty_threshold;
        if stamina >= threshold {
            return 0.0;
        }
        let deficit = (threshold - stamina) / threshold;
        self.config.max_penalty * deficit.powf(self.config.penalty_exponent)
    }

    /// Restore a share of every player's missing stamina. Returns false (and
    /// does nothing) once it has already run this game.
    pub fn halftime_recovery<'a>(&mut self, staminas: impl IntoIterator<Item = &'a mut f32>) -> bool {
        if self.halftime_applied {
            return false;
        }
        self.halftime_applied = true;
        let fraction = self.config.halftime_recovery_fraction;
        for stamina in staminas {
            let missing = STAMINA_MAX - clamp_stamina(*stamina);
            *stamina = clamp_stamina(*stamina + missing * fraction);
        }
        true
    }

    pub fn timeout_recovery(&self, current: f32) -> f32 {
        clamp_stamina(current + self.config.timeout_recovery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn manager() -> StaminaManager {
        StaminaManager::new(StaminaConfig::default())
    }

    #[test]
    fn test_fitter_players_drain_slower() {
        let m = manager();
        let fit = m.drain(100.0, 90.0, 300.0, Pace::Standard);
        let unfit = m.drain(100.0, 20.0, 300.0, Pace::Standard);
        assert!(fit > unfit);
        assert!(m.drain(100.0, 50.0, 300.0, Pace::Fast) < m.drain(100.0, 50.0, 300.0, Pace::Slow));
    }

    #[test]
    fn test_penalty_curve() {
        let m = manager();
        assert_eq!(m.current_penalty(100.0), 0.0);
        assert_eq!(m.current_penalty(80.0), 0.0);
        assert!((m.current_penalty(0.0) - 0.25).abs() < 1e-6);
        let mut last = 0.0;
        for s in (0..80).rev() {
            let p = m.current_penalty(s as f32);
            assert!(p >= last);
            last = p;
        }
    }

    #[test]
    fn test_halftime_runs_once() {
        let mut m = manager();
        let mut staminas = vec![40.0, 100.0, 0.0];
        assert!(m.halftime_recovery(staminas.iter_mut()));
        assert!((staminas[0] - 76.0).abs() < 1e-4);
        assert_eq!(staminas[1], 100.0);
        assert!((staminas[2] - 60.0).abs() < 1e-4);

        assert!(!m.halftime_recovery(staminas.iter_mut()));
        assert!((staminas[0] - 76.0).abs() < 1e-4);
    }

    #[test]
    fn test_timeout_recovery_caps_at_100() {
        let m = manager();
        assert_eq!(m.timeout_recovery(98.0), 100.0);
        assert_eq!(m.timeout_recovery(50.0), 55.0);
    }

    proptest! {
        #[test]
        fn prop_stamina_stays_in_bounds(
            start in 0.0f32..=100.0,
            attr in 0.0f32..=100.0,
            steps in proptest::collection::vec((any::<bool>(), 0.0f32..2000.0), 1..50),
        ) {
            let m = manager();
            let mut s = start;
            for (on_court, secs) in steps {
                s = if on_court { m.drain(s, attr, secs, Pace::Fast) } else { m.recover(s, attr, secs) };
                prop_assert!((STAMINA_MIN..=STAMINA_MAX).contains(&s));
            }
        }
    }
}
