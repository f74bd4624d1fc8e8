//! Game Simulator
//!
//! Drives a full game: jump ball, four regulation periods, halftime
//! recovery and overtime while tied. Each period is played by the quarter
//! loop in `quarter.rs`.
//!
//! ## Period openings
//! The jump-ball winner has the ball to open periods 1 and 4, the loser
//! periods 2 and 3. Every overtime opens with a fresh jump ball.
//!
//! ## Determinism
//! One `ChaCha8Rng` seeded from the plan drives every draw, so the same
//! rosters, tactics, configuration and seed always yield the same game.

use super::clock::GameClock;
use super::config::EngineConfig;
use super::end_game::FINAL_PERIOD;
use super::game_state::GameState;
use super::play_by_play::PlayByPlayWriter;
use super::probability::{roll, success_probability};
use super::stamina::StaminaManager;
use super::stats::StatsCalculator;
use super::substitutions::{RotationContext, SubstitutionManager};
use super::timeouts::TimeoutManager;
use crate::error::GameError;
use crate::models::{
    DeterminismMeta, FinalScore, GameResult, PlayerRef, PossessionResult, QuarterResult,
    SubstitutionEvent, Team, TeamSide, TimeoutEvent,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Even odds tilt for the jump ball per composite point of difference.
const JUMP_BALL_STEEPNESS: f32 = 0.05;

/// Everything needed to play one game.
#[derive(Debug, Clone)]
pub struct GamePlan {
    pub home: Team,
    pub away: Team,
    pub seed: u64,
    pub config: EngineConfig,
    /// Keep every `PossessionResult` in the output
    pub record_possessions: bool,
}

impl GamePlan {
    pub fn new(home: Team, away: Team, seed: u64) -> Self {
        Self { home, away, seed, config: EngineConfig::default(), record_possessions: false }
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_possessions(mut self, record: bool) -> Self {
        self.record_possessions = record;
        self
    }
}

pub struct GameEngine {
    pub(crate) rng: ChaCha8Rng,
    seed: u64,
    pub(crate) config: EngineConfig,
    pub(crate) state: GameState,
    pub(crate) clock: GameClock,
    pub(crate) stamina: StaminaManager,
    pub(crate) timeouts: TimeoutManager,
    pub(crate) rotation: SubstitutionManager,
    pub(crate) writer: PlayByPlayWriter,
    pub(crate) stats: StatsCalculator,

    // ========== Game logs ==========
    pub(crate) timeout_log: Vec<TimeoutEvent>,
    pub(crate) substitution_log: Vec<SubstitutionEvent>,
    pub(crate) possession_log: Vec<PossessionResult>,
    pub(crate) possession_count: u32,
    pub(crate) record_possessions: bool,
}

impl GameEngine {
    /// Validate the plan and set up a fresh game. Nothing is corrected
    /// silently: a bad roster, tactic or table is an error here.
    pub fn new(plan: GamePlan) -> Result<Self, GameError> {
        plan.config.validate()?;
        plan.home.validate()?;
        plan.away.validate()?;

        let clock = GameClock::new(&plan.config.clock)?;
        let stats = StatsCalculator::new(plan.home.players.len(), plan.away.players.len());
        log::info!(
            "New game: {} vs {} (seed {}, {} + {} players)",
            plan.home.name,
            plan.away.name,
            plan.seed,
            plan.home.players.len(),
            plan.away.players.len()
        );

        let state = GameState::new(plan.home, plan.away, &plan.config);
        Ok(Self {
            rng: ChaCha8Rng::seed_from_u64(plan.seed),
            seed: plan.seed,
            stamina: StaminaManager::new(plan.config.stamina.clone()),
            timeouts: TimeoutManager::new(plan.config.timeout.clone()),
            rotation: SubstitutionManager::new(plan.config.rotation.clone()),
            writer: PlayByPlayWriter::new(),
            stats,
            clock,
            state,
            config: plan.config,
            timeout_log: Vec::new(),
            substitution_log: Vec::new(),
            possession_log: Vec::new(),
            possession_count: 0,
            record_possessions: plan.record_possessions,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Play the whole game and assemble the result.
    pub fn simulate(mut self) -> Result<GameResult, GameError> {
        let mut quarters: Vec<QuarterResult> = Vec::new();

        // ========== Regulation ==========
        let mut tip_winner = TeamSide::Home;
        for period in 1..=FINAL_PERIOD {
            if period == 3 {
                self.halftime();
            }
            let length = self.config.clock.period_seconds;
            let opening = if period == 1 {
                self.begin_period(period, length, None);
                tip_winner = self.jump_ball(period);
                tip_winner
            } else {
                let opening = match period {
                    4 => tip_winner,
                    _ => tip_winner.opponent(),
                };
                self.begin_period(period, length, Some(opening));
                opening
            };
            quarters.push(self.simulate_quarter(period, opening)?);
        }

        // ========== Overtime ==========
        let mut overtime_periods = 0u8;
        while self.state.home.score == self.state.away.score
            && overtime_periods < self.config.clock.max_overtime_periods
        {
            overtime_periods += 1;
            let period = FINAL_PERIOD + overtime_periods;
            self.begin_period(period, self.config.clock.overtime_seconds, None);
            let opening = self.jump_ball(period);
            quarters.push(self.simulate_quarter(period, opening)?);
        }

        let ended_tied = self.state.home.score == self.state.away.score;
        if ended_tied {
            log::warn!(
                "Game still tied after {} overtime periods, ending as a tie",
                overtime_periods
            );
        }
        let last_period = FINAL_PERIOD + overtime_periods;
        self.writer.game_end(last_period, &self.state);

        Ok(self.into_result(quarters, overtime_periods, ended_tied))
    }

    /// Reset period counters, run the period-break rotation and open the
    /// play-by-play. `opening` is `None` when a jump ball decides the ball.
    fn begin_period(&mut self, period: u8, length_seconds: f32, opening: Option<TeamSide>) {
        self.state.period = period;
        self.clock.start_period(period, length_seconds);
        for side in TeamSide::BOTH {
            self.state.team_mut(side).start_period();
        }

        if period > 1 {
            for side in TeamSide::BOTH {
                let ctx = RotationContext {
                    period,
                    game_clock: length_seconds,
                    margin: self.state.margin(side),
                };
                let events = self.rotation.process_between_periods(self.state.team_mut(side), &ctx);
                self.log_substitutions(events);
            }
        }

        if let Some(side) = opening {
            self.state.possession.start_period(side);
            self.writer.period_start(period, length_seconds, &self.state, side);
        }
        log::debug!("Period {} starts, {} to {}", period, self.state.home.score, self.state.away.score);
    }

    /// Best jumper on each floor; the composite gap tilts even odds.
    fn jump_ball(&mut self, period: u8) -> TeamSide {
        let table = &self.config.weights.jump_ball;
        let home = self.state.home.best_on_court(table, &self.stamina);
        let away = self.state.away.best_on_court(table, &self.stamina);
        let diff = self.state.home.composite(home, table, &self.stamina)
            - self.state.away.composite(away, table, &self.stamina);
        let p_home = success_probability(0.5, diff, JUMP_BALL_STEEPNESS);

        let (winner, loser) = if roll(&mut self.rng, p_home) {
            (PlayerRef::new(TeamSide::Home, home), PlayerRef::new(TeamSide::Away, away))
        } else {
            (PlayerRef::new(TeamSide::Away, away), PlayerRef::new(TeamSide::Home, home))
        };

        let clock = self.clock.remaining();
        self.state.possession.start_period(winner.side);
        self.writer.period_start(period, clock, &self.state, winner.side);
        self.writer.jump_ball(period, clock, &self.state, winner, loser);
        log::debug!("Jump ball P{}: {} wins (p_home {:.3})", period, winner.side, p_home);
        winner.side
    }

    fn halftime(&mut self) {
        let players = self
            .state
            .home
            .players
            .iter_mut()
            .chain(self.state.away.players.iter_mut())
            .map(|p| &mut p.stamina);
        if self.stamina.halftime_recovery(players) {
            log::debug!("Halftime recovery applied");
        }
    }

    pub(crate) fn log_substitutions(&mut self, events: Vec<SubstitutionEvent>) {
        for event in events {
            self.writer.substitution(&event);
            self.substitution_log.push(event);
        }
    }

    fn into_result(self, quarter_scores: Vec<QuarterResult>, overtime_periods: u8, ended_tied: bool) -> GameResult {
        let final_score = FinalScore { home: self.state.home.score, away: self.state.away.score };
        let box_score = self.stats.finalize(&self.state);
        let play_by_play = self.writer.into_entries();

        let transcript = play_by_play.iter().map(|e| e.line()).collect::<Vec<_>>().join("\n");
        let mut hasher = Sha256::new();
        hasher.update(transcript.as_bytes());
        let transcript_sha256 = format!("{:x}", hasher.finalize());

        log::info!(
            "Final: {} {} - {} {} ({} possessions, {} OT)",
            self.state.home.team.name,
            final_score.home,
            final_score.away,
            self.state.away.team.name,
            self.possession_count,
            overtime_periods
        );

        GameResult {
            home_team: self.state.home.team.name.clone(),
            away_team: self.state.away.team.name.clone(),
            final_score,
            quarter_scores,
            overtime_periods,
            ended_tied,
            winner: final_score.winner(),
            play_by_play,
            box_score,
            timeouts: self.timeout_log,
            substitutions: self.substitution_log,
            possessions: self.possession_log,
            determinism: DeterminismMeta {
                seed: self.seed,
                engine_version: crate::VERSION.to_string(),
                transcript_sha256,
                possession_count: self.possession_count,
            },
        }
    }
}
