//! Quarter loop
//!
//! Plays possessions until the period clock runs out. After every
//! possession, in order: clock tick, stamina and minutes, box score,
//! play-by-play and any foul-out replacement made during the whistle,
//! scoring run, timeouts, then the rotation pass when the ball is dead.

use super::game_sim::GameEngine;
use super::possession::{PossessionContext, PossessionSimulator};
use super::possession_state::BallState;
use super::substitutions::RotationContext;
use super::timeouts::{TimeoutContext, TimeoutOutcome};
use crate::error::GameError;
use crate::models::{PossessionResult, QuarterResult, TeamSide};

impl GameEngine {
    /// Play one period from an opening possession to 0:00.
    pub(crate) fn simulate_quarter(&mut self, period: u8, opening: TeamSide) -> Result<QuarterResult, GameError> {
        let cap = self.config.clock.max_possessions_per_period;
        let (home_start, away_start) = self.state.scores();
        let mut possessions = 0u32;

        let mut offense = opening;
        let mut is_transition = false;
        let mut shot_clock = self.config.clock.shot_clock_seconds;

        while !self.clock.is_quarter_over() {
            if possessions >= cap {
                log::error!(
                    "Possession cap {} hit in period {} with {:.1}s left",
                    cap,
                    period,
                    self.clock.remaining()
                );
                return Err(GameError::PossessionCapExceeded {
                    period,
                    cap,
                    seconds_remaining: self.clock.remaining(),
                });
            }

            let ctx = PossessionContext {
                period,
                offense,
                is_transition,
                shot_clock,
                score_differential: self.state.margin(offense),
                game_clock: self.clock.remaining(),
            };
            let result = PossessionSimulator::new(&self.config, &self.stamina).simulate(
                &mut self.rng,
                &mut self.state,
                &self.clock,
                &ctx,
            );
            possessions += 1;
            self.possession_count += 1;

            let elapsed = self.clock.tick(result.elapsed);
            self.apply_minutes(&result, elapsed);

            self.stats.record_possession(&result);
            self.writer.possession(&result, &self.state);
            self.log_substitutions(result.substitutions.clone());
            self.timeouts.record_score(result.offense, u32::from(result.points));

            let mut timeout_called = false;
            if !self.clock.is_quarter_over() {
                timeout_called = self.timeout_opportunity(period, result.next_offense)?;
                if self.state.possession.can_substitute() {
                    self.rotation_pass(period)?;
                }
            }

            offense = result.next_offense;
            is_transition = result.next_is_transition && !timeout_called;
            shot_clock = result.next_shot_clock;

            if self.record_possessions {
                self.possession_log.push(result);
            }
        }

        self.writer.period_end(period);
        let (home_end, away_end) = self.state.scores();
        log::debug!(
            "Period {} over: {}-{} ({} possessions)",
            period,
            home_end - home_start,
            away_end - away_start,
            possessions
        );

        Ok(QuarterResult {
            period,
            home_points: home_end - home_start,
            away_points: away_end - away_start,
            possessions,
        })
    }

    /// Drain the two lineups that played, rest everyone else, and add the
    /// elapsed time to the minutes counters.
    fn apply_minutes(&mut self, result: &PossessionResult, elapsed: f32) {
        for side in TeamSide::BOTH {
            let lineup = if side == result.offense { &result.offense_lineup } else { &result.defense_lineup };
            let team = self.state.team_mut(side);
            let pace = team.team.tactics.pace;

            for (index, player) in team.players.iter_mut().enumerate() {
                let stamina_attr = team.team.players[index].attributes.stamina;
                if lineup.contains(&index) {
                    player.stamina = self.stamina.drain(player.stamina, stamina_attr, elapsed, pace);
                    player.seconds_played += elapsed;
                    player.quarter_seconds += elapsed;
                    player.stint_seconds += elapsed;
                } else {
                    player.stamina = self.stamina.recover(player.stamina, stamina_attr, elapsed);
                }
            }
        }
    }

    fn rotation_context(&self, period: u8, side: TeamSide) -> RotationContext {
        RotationContext { period, game_clock: self.clock.remaining(), margin: self.state.margin(side) }
    }

    /// Give each team one chance to stop play. Returns true if anyone did.
    fn timeout_opportunity(&mut self, period: u8, next_offense: TeamSide) -> Result<bool, GameError> {
        // Fouls and dead-ball turnovers already stopped it
        let clock_running = self.state.possession.ball_state() != BallState::DeadBallSubsAllowed;
        let mut called = false;
        for side in TeamSide::BOTH {
            if !self.state.possession.can_call_timeout(side) || self.state.team(side).timeouts_remaining == 0 {
                continue;
            }
            let ctx = TimeoutContext {
                period,
                game_clock: self.clock.remaining(),
                margin: self.state.margin(side),
                has_ball_next: next_offense == side,
                clock_running,
            };
            let Some(reason) = self.timeouts.check(&self.state, side, &ctx) else {
                continue;
            };
            let outcome =
                self.timeouts.call_timeout(&mut self.state, side, reason, ctx.game_clock, &self.stamina)?;
            if let TimeoutOutcome::Called(event) = outcome {
                self.writer.timeout(&event, &self.state);
                self.timeout_log.push(event);
                called = true;
            }
        }
        Ok(called)
    }

    fn rotation_pass(&mut self, period: u8) -> Result<(), GameError> {
        let possession = self.state.possession;
        for side in TeamSide::BOTH {
            let ctx = self.rotation_context(period, side);
            let events = self.rotation.process_substitutions(self.state.team_mut(side), &ctx, &possession)?;
            self.log_substitutions(events);
        }
        Ok(())
    }
}
