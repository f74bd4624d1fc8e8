//! Game clock and possession-length sampling.

use super::config::{ClockConfig, DurationProfile};
use crate::error::ConfigError;
use crate::tactics::Pace;
use rand::Rng;
use rand_distr::{Distribution, Triangular};

/// Remaining time below this is treated as zero.
const CLOCK_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone)]
pub struct GameClock {
    remaining: f32,
    fast: Triangular<f32>,
    standard: Triangular<f32>,
    slow: Triangular<f32>,
    transition: Triangular<f32>,
    min_possession: f32,
}

fn triangular(profile: &DurationProfile, name: &str) -> Result<Triangular<f32>, ConfigError> {
    Triangular::new(profile.min, profile.max, profile.mode)
        .map_err(|e| ConfigError::parameter(name, e.to_string()))
}

impl GameClock {
    pub fn new(cfg: &ClockConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            remaining: 0.0,
            fast: triangular(&cfg.fast, "clock.fast")?,
            standard: triangular(&cfg.standard, "clock.standard")?,
            slow: triangular(&cfg.slow, "clock.slow")?,
            transition: triangular(&cfg.transition, "clock.transition")?,
            min_possession: cfg.min_possession_seconds,
        })
    }

    pub fn start_period(&mut self, period: u8, length_seconds: f32) {
        log::trace!("clock: period {} starts with {:.0}s", period, length_seconds);
        self.remaining = length_seconds.max(0.0);
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Run the clock. Returns the seconds actually elapsed.
    pub fn tick(&mut self, seconds: f32) -> f32 {
        let elapsed = if seconds.is_finite() { seconds.clamp(0.0, self.remaining) } else { 0.0 };
        self.remaining -= elapsed;
        if self.remaining < CLOCK_EPSILON {
            self.remaining = 0.0;
        }
        elapsed
    }

    pub fn is_quarter_over(&self) -> bool {
        self.remaining <= 0.0
    }

    /// `m:ss`, rounding partial seconds up like an arena clock.
    pub fn display(&self) -> String {
        format_clock(self.remaining)
    }

    /// Possession length in seconds.
    ///
    /// `pace_multiplier` above 1 speeds play up. The result never exceeds
    /// the shot clock or the game clock and is at least the configured
    /// minimum unless less time than that remains.
    pub fn sample_possession_duration<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        pace: Pace,
        is_transition: bool,
        pace_multiplier: f32,
        shot_clock: f32,
    ) -> f32 {
        let dist = if is_transition {
            &self.transition
        } else {
            match pace {
                Pace::Fast => &self.fast,
                Pace::Standard => &self.standard,
                Pace::Slow => &self.slow,
            }
        };
        let multiplier = if pace_multiplier.is_finite() { pace_multiplier.max(0.1) } else { 1.0 };
        let raw = dist.sample(rng) / multiplier;
        self.bound_duration(raw, shot_clock)
    }

    pub fn bound_duration(&self, seconds: f32, shot_clock: f32) -> f32 {
        seconds.min(shot_clock).max(self.min_possession).min(self.remaining)
    }
}

pub fn format_clock(seconds: f32) -> String {
    let total = seconds.max(0.0).ceil() as u32;
    format!("{}:{:02}", total / 60, total % 60)
}
