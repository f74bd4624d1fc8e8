//! Timeout Manager
//!
//! Tracks the rolling scoring run and decides when a team stops play.
//!
//! ## Triggers
//! - Momentum: opponent's unanswered run reaches the strategy threshold,
//!   as long as the strategy's end-game reserve is kept
//! - Play design: final period or overtime, 24 s or less, tied or down by
//!   three or fewer, and the team has the ball next
//! - Clock stop: final period or overtime, a minute or less, down 4 to 10,
//!   the clock is running and the team has the ball next. Capped per period.
//!
//! Budget is a flat per-team count for the whole game. A call with nothing
//! left is a reported no-op.

use super::config::TimeoutConfig;
use super::end_game::FINAL_PERIOD;
use super::game_state::GameState;
use super::stamina::StaminaManager;
use crate::error::StateError;
use crate::models::{TeamSide, TimeoutEvent, TimeoutReason};

/// Unanswered points by the team currently on a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoringRun {
    side: Option<TeamSide>,
    points: u32,
}

impl ScoringRun {
    pub fn record(&mut self, side: TeamSide, points: u32) {
        if points == 0 {
            return;
        }
        if self.side == Some(side) {
            self.points += points;
        } else {
            self.side = Some(side);
            self.points = points;
        }
    }

    /// Points of the current run scored against `side`.
    pub fn against(&self, side: TeamSide) -> u32 {
        match self.side {
            Some(s) if s != side => self.points,
            _ => 0,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// End-of-game facts for one team when deciding on a timeout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeoutContext {
    pub period: u8,
    pub game_clock: f32,
    /// Positive when this team leads
    pub margin: i32,
    pub has_ball_next: bool,
    /// Play ended with the clock still running (live ball or made basket)
    pub clock_running: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeoutOutcome {
    Called(TimeoutEvent),
    /// Budget already spent; nothing changed.
    NoBudget,
}

#[derive(Debug, Clone)]
pub struct TimeoutManager {
    config: TimeoutConfig,
    run: ScoringRun,
    /// Period the clock-stop counts belong to
    clock_stop_period: u8,
    clock_stops: [u8; 2],
}

impl TimeoutManager {
    pub fn new(config: TimeoutConfig) -> Self {
        Self { config, run: ScoringRun::default(), clock_stop_period: 0, clock_stops: [0; 2] }
    }

    /// Clock-stop timeouts `side` has spent in `period`.
    pub fn clock_stops_used(&self, side: TeamSide, period: u8) -> u8 {
        if period == self.clock_stop_period {
            self.clock_stops[side.index()]
        } else {
            0
        }
    }

    pub fn record_score(&mut self, side: TeamSide, points: u32) {
        self.run.record(side, points);
    }

    pub fn check_momentum_timeout(&self, state: &GameState, side: TeamSide) -> Option<TimeoutReason> {
        let team = state.team(side);
        let strategy = team.team.tactics.timeout_strategy;
        let run = self.run.against(side);
        if run >= self.config.run_threshold(strategy)
            && team.timeouts_remaining > self.config.reserve(strategy)
        {
            Some(TimeoutReason::Momentum { run })
        } else {
            None
        }
    }

    pub fn check_end_game_timeout(&self, side: TeamSide, ctx: &TimeoutContext) -> Option<TimeoutReason> {
        let cfg = &self.config;
        if ctx.period < FINAL_PERIOD {
            return None;
        }
        if ctx.has_ball_next
            && ctx.game_clock <= cfg.play_design_seconds
            && (-cfg.play_design_max_deficit..=0).contains(&ctx.margin)
        {
            return Some(TimeoutReason::PlayDesign);
        }
        if ctx.clock_running
            && ctx.has_ball_next
            && ctx.game_clock <= cfg.clock_stop_seconds
            && (-cfg.clock_stop_max_deficit..=-cfg.clock_stop_min_deficit).contains(&ctx.margin)
            && self.clock_stops_used(side, ctx.period) < cfg.clock_stops_per_period
        {
            return Some(TimeoutReason::ClockStop);
        }
        None
    }

    /// End-game reasons take precedence over momentum.
    pub fn check(&self, state: &GameState, side: TeamSide, ctx: &TimeoutContext) -> Option<TimeoutReason> {
        self.check_end_game_timeout(side, ctx)
            .or_else(|| self.check_momentum_timeout(state, side))
    }

    /// Spend a timeout. Illegal calls are rejected without touching the
    /// budget; a legal call with no budget left is a no-op.
    pub fn call_timeout(
        &mut self,
        state: &mut GameState,
        side: TeamSide,
        reason: TimeoutReason,
        game_clock: f32,
        stamina: &StaminaManager,
    ) -> Result<TimeoutOutcome, StateError> {
        if !state.possession.can_call_timeout(side) {
            return Err(StateError::IllegalTimeout {
                team: side,
                state: state.possession.ball_state(),
                possessing: state.possession.possessing(),
            });
        }
        if state.team(side).timeouts_remaining == 0 {
            log::warn!("{} requested a timeout ({:?}) with none remaining", side, reason);
            return Ok(TimeoutOutcome::NoBudget);
        }

        state.possession.on_timeout(side)?;
        let team = state.team_mut(side);
        team.timeouts_remaining -= 1;
        let remaining = team.timeouts_remaining;

        for team in [&mut state.home, &mut state.away] {
            for p in &mut team.players {
                p.stamina = stamina.timeout_recovery(p.stamina);
            }
        }
        match reason {
            TimeoutReason::Momentum { .. } => self.run.reset(),
            TimeoutReason::ClockStop => {
                if self.clock_stop_period != state.period {
                    self.clock_stop_period = state.period;
                    self.clock_stops = [0; 2];
                }
                self.clock_stops[side.index()] += 1;
            }
            TimeoutReason::PlayDesign => {}
        }

        log::debug!("{} timeout ({:?}), {} left", side, reason, remaining);
        let (home_score, away_score) = state.scores();
        Ok(TimeoutOutcome::Called(TimeoutEvent {
            side,
            period: state.period,
            game_clock,
            reason,
            remaining,
            home_score,
            away_score,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{EngineConfig, StaminaConfig};
    use crate::engine::possession_state::BallState;
    use crate::tactics::TimeoutStrategy;
    use crate::test_support::balanced_team;

    fn state() -> GameState {
        GameState::new(balanced_team("H"), balanced_team("A"), &EngineConfig::default())
    }

    fn ctx(period: u8, clock: f32, margin: i32, has_ball_next: bool) -> TimeoutContext {
        TimeoutContext { period, game_clock: clock, margin, has_ball_next, clock_running: true }
    }

    #[test]
    fn test_scoring_run() {
        let mut run = ScoringRun::default();
        run.record(TeamSide::Away, 3);
        run.record(TeamSide::Away, 2);
        assert_eq!(run.against(TeamSide::Home), 5);
        assert_eq!(run.against(TeamSide::Away), 0);
        run.record(TeamSide::Home, 2);
        assert_eq!(run.against(TeamSide::Home), 0);
        assert_eq!(run.against(TeamSide::Away), 2);
    }

    #[test]
    fn test_momentum_thresholds_by_strategy() {
        let mut s = state();
        let mut tm = TimeoutManager::new(TimeoutConfig::default());
        tm.record_score(TeamSide::Away, 7);
        // Standard needs 8
        assert_eq!(tm.check_momentum_timeout(&s, TeamSide::Home), None);

        s.home.team.tactics.timeout_strategy = TimeoutStrategy::Aggressive;
        assert_eq!(
            tm.check_momentum_timeout(&s, TeamSide::Home),
            Some(TimeoutReason::Momentum { run: 7 })
        );
    }

    #[test]
    fn test_momentum_keeps_reserve() {
        let mut s = state();
        s.home.team.tactics.timeout_strategy = TimeoutStrategy::Conservative;
        let mut tm = TimeoutManager::new(TimeoutConfig::default());
        tm.record_score(TeamSide::Away, 12);
        s.home.timeouts_remaining = 2;
        assert_eq!(tm.check_momentum_timeout(&s, TeamSide::Home), None);
        s.home.timeouts_remaining = 3;
        assert!(tm.check_momentum_timeout(&s, TeamSide::Home).is_some());
    }

    #[test]
    fn test_end_game_triggers() {
        let tm = TimeoutManager::new(TimeoutConfig::default());
        let home = TeamSide::Home;
        assert_eq!(tm.check_end_game_timeout(home, &ctx(4, 20.0, -2, true)), Some(TimeoutReason::PlayDesign));
        assert_eq!(tm.check_end_game_timeout(home, &ctx(4, 20.0, 0, true)), Some(TimeoutReason::PlayDesign));
        assert_eq!(tm.check_end_game_timeout(home, &ctx(4, 20.0, -2, false)), None);
        assert_eq!(tm.check_end_game_timeout(home, &ctx(4, 50.0, -7, true)), Some(TimeoutReason::ClockStop));
        assert_eq!(tm.check_end_game_timeout(home, &ctx(4, 50.0, -12, true)), None);
        assert_eq!(tm.check_end_game_timeout(home, &ctx(3, 10.0, -2, true)), None);
    }

    #[test]
    fn test_clock_stop_needs_running_clock_and_the_ball() {
        let tm = TimeoutManager::new(TimeoutConfig::default());
        // Opponent ball: stopping now only wastes the timeout
        assert_eq!(tm.check_end_game_timeout(TeamSide::Home, &ctx(4, 50.0, -7, false)), None);

        // Clock already stopped by a foul or turnover
        let stopped = TimeoutContext { clock_running: false, ..ctx(4, 50.0, -7, true) };
        assert_eq!(tm.check_end_game_timeout(TeamSide::Home, &stopped), None);
    }

    #[test]
    fn test_clock_stops_capped_per_period() {
        let mut s = state();
        s.period = 4;
        let stamina = StaminaManager::new(StaminaConfig::default());
        let mut tm = TimeoutManager::new(TimeoutConfig::default());
        let late = ctx(4, 40.0, -6, true);

        for _ in 0..2 {
            assert_eq!(tm.check(&s, TeamSide::Home, &late), Some(TimeoutReason::ClockStop));
            s.possession.on_made_basket();
            tm.call_timeout(&mut s, TeamSide::Home, TimeoutReason::ClockStop, 40.0, &stamina).unwrap();
        }
        assert_eq!(tm.clock_stops_used(TeamSide::Home, 4), 2);
        assert_eq!(tm.check(&s, TeamSide::Home, &late), None);
        assert_eq!(s.home.timeouts_remaining, 5);

        // The other team and the next period start fresh
        assert_eq!(tm.check(&s, TeamSide::Away, &late), Some(TimeoutReason::ClockStop));
        assert_eq!(tm.check(&s, TeamSide::Home, &ctx(5, 40.0, -6, true)), Some(TimeoutReason::ClockStop));
    }

    #[test]
    fn test_call_timeout_spends_budget_and_recovers_stamina() {
        let mut s = state();
        s.possession.on_made_basket();
        s.away.players[0].stamina = 60.0;
        let stamina = StaminaManager::new(StaminaConfig::default());
        let mut tm = TimeoutManager::new(TimeoutConfig::default());

        let out = tm
            .call_timeout(&mut s, TeamSide::Home, TimeoutReason::PlayDesign, 30.0, &stamina)
            .unwrap();
        match out {
            TimeoutOutcome::Called(ev) => assert_eq!(ev.remaining, 6),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(s.home.timeouts_remaining, 6);
        assert_eq!(s.away.players[0].stamina, 65.0);
        assert_eq!(s.possession.ball_state(), BallState::DeadBallSubsAllowed);
    }

    #[test]
    fn test_no_budget_is_reported_noop() {
        let mut s = state();
        s.home.timeouts_remaining = 0;
        let stamina = StaminaManager::new(StaminaConfig::default());
        let mut tm = TimeoutManager::new(TimeoutConfig::default());
        let out = tm
            .call_timeout(&mut s, TeamSide::Home, TimeoutReason::ClockStop, 30.0, &stamina)
            .unwrap();
        assert_eq!(out, TimeoutOutcome::NoBudget);
        assert_eq!(s.home.timeouts_remaining, 0);
        assert_eq!(s.possession.ball_state(), BallState::LiveBall);
    }

    #[test]
    fn test_defense_cannot_stop_live_ball() {
        let mut s = state();
        let stamina = StaminaManager::new(StaminaConfig::default());
        let mut tm = TimeoutManager::new(TimeoutConfig::default());
        let before = s.away.timeouts_remaining;
        let err = tm.call_timeout(&mut s, TeamSide::Away, TimeoutReason::ClockStop, 30.0, &stamina);
        assert!(matches!(err, Err(StateError::IllegalTimeout { .. })));
        assert_eq!(s.away.timeouts_remaining, before);
    }
}
