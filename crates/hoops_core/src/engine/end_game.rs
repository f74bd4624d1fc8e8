//! End-Game Mode Detector
//!
//! Active only in the final regulation period and overtime. Produces a
//! per-possession bundle of modifiers consumed by the shot, clock, turnover
//! and foul systems.
//!
//! ## Modes
//! - Desperation: deep deficit with time left; more threes, faster
//! - ConserveLead: big lead with time left; fewer threes, slower
//! - ClockKill: small lead late with the ball; drain the shot clock
//! - LastShot: tied or down a possession with the ball; hold for the last shot
//! - IntentionalFoul: trailing late without the ball; foul immediately

use super::config::EndGameConfig;
use crate::models::{EndGameMode, ShotType};

/// First period in which the detector is active.
pub const FINAL_PERIOD: u8 = 4;

/// One team's view of the game state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndGameSituation {
    pub period: u8,
    pub seconds_remaining: f32,
    /// Positive when this team leads
    pub margin: i32,
    pub has_ball: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EndGameModifiers {
    pub modes: Vec<EndGameMode>,
    pub three_pt_adjustment: f32,
    /// Above 1 shortens possessions
    pub pace_multiplier: f32,
    pub turnover_adjustment: f32,
    /// Shoot with this much left on the shot clock
    pub shot_clock_target: Option<f32>,
    /// Shoot with this much left on the game clock
    pub game_clock_target: Option<f32>,
    pub force_shot_type: Option<ShotType>,
    /// The defense fouls before anything else happens
    pub intentional_foul: bool,
}

impl Default for EndGameModifiers {
    fn default() -> Self {
        Self {
            modes: Vec::new(),
            three_pt_adjustment: 0.0,
            pace_multiplier: 1.0,
            turnover_adjustment: 0.0,
            shot_clock_target: None,
            game_clock_target: None,
            force_shot_type: None,
            intentional_foul: false,
        }
    }
}

impl EndGameModifiers {
    pub fn is_active(&self, mode: EndGameMode) -> bool {
        self.modes.contains(&mode)
    }

    /// Stretch a sampled possession length to honor clock targets.
    pub fn target_duration(&self, sampled: f32, shot_clock: f32, game_remaining: f32) -> f32 {
        let mut d = sampled;
        if let Some(target) = self.game_clock_target {
            d = d.max(game_remaining - target);
        }
        if let Some(target) = self.shot_clock_target {
            d = d.max(shot_clock - target);
        }
        d.min(shot_clock).min(game_remaining).max(0.0)
    }
}

/// Modes for one team's situation.
pub fn detect(situation: &EndGameSituation, cfg: &EndGameConfig) -> EndGameModifiers {
    let mut m = EndGameModifiers::default();
    if situation.period < FINAL_PERIOD {
        return m;
    }
    let t = situation.seconds_remaining;
    let margin = situation.margin;
    let in_blowout_window =
        t > cfg.blowout_window_min_seconds && t <= cfg.blowout_window_max_seconds;

    if in_blowout_window && margin <= -cfg.blowout_margin {
        m.modes.push(EndGameMode::Desperation);
        m.three_pt_adjustment += cfg.desperation_three_adjustment;
        m.pace_multiplier *= cfg.desperation_pace;
        m.turnover_adjustment += cfg.desperation_turnover;
    }
    if in_blowout_window && margin >= cfg.blowout_margin {
        m.modes.push(EndGameMode::ConserveLead);
        m.three_pt_adjustment += cfg.conserve_three_adjustment;
        m.pace_multiplier *= cfg.conserve_pace;
        m.turnover_adjustment += cfg.conserve_turnover;
    }

    if situation.has_ball {
        if (1..=cfg.clock_kill_max_lead).contains(&margin) && t <= cfg.clock_kill_seconds {
            m.modes.push(EndGameMode::ClockKill);
            m.shot_clock_target = Some(cfg.clock_kill_shot_clock_target);
        }
        if (-cfg.last_shot_max_deficit..=0).contains(&margin) && t <= cfg.last_shot_seconds {
            m.modes.push(EndGameMode::LastShot);
            m.game_clock_target = Some(cfg.last_shot_game_clock_target);
            if margin == -3 {
                m.force_shot_type = Some(ShotType::ThreePoint);
            }
        }
    } else if (-cfg.intentional_foul_max_deficit..=-1).contains(&margin)
        && t <= cfg.intentional_foul_seconds
    {
        m.modes.push(EndGameMode::IntentionalFoul);
        m.intentional_foul = true;
    }
    m
}

/// Bundle for one possession: the offense's own modes plus an intentional
/// foul if the defense is trailing late.
pub fn possession_modifiers(
    period: u8,
    seconds_remaining: f32,
    offense_margin: i32,
    cfg: &EndGameConfig,
) -> EndGameModifiers {
    let mut m = detect(
        &EndGameSituation { period, seconds_remaining, margin: offense_margin, has_ball: true },
        cfg,
    );
    let defense = detect(
        &EndGameSituation { period, seconds_remaining, margin: -offense_margin, has_ball: false },
        cfg,
    );
    if defense.intentional_foul {
        m.modes.push(EndGameMode::IntentionalFoul);
        m.intentional_foul = true;
    }
    m
}
