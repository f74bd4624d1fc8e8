//! Possession Orchestrator
//!
//! Plays one possession against the shared game state and returns an
//! immutable [`PossessionResult`]. The clock tick and stamina update are
//! left to the quarter loop.
//!
//! ## Draw order
//! The order of random draws is fixed so a seed always replays the same
//! game:
//! 1. possession length
//! 2. intentional-foul target and elapsed time (end game only; skips 3-6)
//! 3. ball handler
//! 4. turnover check, then type, elapsed time and steal
//! 5. non-shooting foul check
//! 6. shooter, shot type, zone coverage, contest, foul, block, make, assist
//! 7. rebound, then a putback when the offensive rebounder is tall enough
//! 8. free throws, then the rebound of a missed final attempt
//!
//! A player fouled out by the whistle is replaced right after the foul,
//! while the ball is dead, so the free throws and any rebound are played
//! by the new lineup.

use super::clock::GameClock;
use super::config::EngineConfig;
use super::end_game::{self, EndGameModifiers, FINAL_PERIOD};
use super::fouls::{self, FoulTally};
use super::free_throws::{self, FreeThrowSituation};
use super::game_state::GameState;
use super::probability::{roll, weighted_choice};
use super::rebound::{self, MissSource};
use super::shot::{self, ContestInputs, ShotSelectionModifiers};
use super::stamina::StaminaManager;
use super::substitutions::{RotationContext, SubstitutionManager};
use super::turnover::{self, TurnoverSituation};
use crate::models::{
    Attribute, FoulEvent, FoulKind, FreeThrowResult, PlayerRef, PossessionOutcome, PossessionResult,
    PossessionTrace, ReboundEvent, ShotAttempt, ShotType, SubstitutionEvent, TeamSide, TurnoverEvent,
    TurnoverType,
};
use rand::Rng;

/// Situation handed to the orchestrator at the start of a possession.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PossessionContext {
    pub period: u8,
    pub offense: TeamSide,
    pub is_transition: bool,
    pub shot_clock: f32,
    /// Positive when the offense leads
    pub score_differential: i32,
    /// Game clock remaining at the start
    pub game_clock: f32,
}

impl PossessionContext {
    pub fn defense(&self) -> TeamSide {
        self.offense.opponent()
    }

    pub fn is_overtime(&self) -> bool {
        self.period > FINAL_PERIOD
    }
}

/// How the ball changes hands at the end.
#[derive(Debug, Clone, Copy)]
struct Handover {
    outcome: PossessionOutcome,
    next_offense: TeamSide,
    next_is_transition: bool,
    next_shot_clock: f32,
}

#[derive(Debug, Default)]
struct Record {
    shots: Vec<ShotAttempt>,
    turnover: Option<TurnoverEvent>,
    foul: Option<FoulEvent>,
    free_throws: Option<FreeThrowResult>,
    substitutions: Vec<SubstitutionEvent>,
    points: u8,
}

impl Record {
    fn foul(&mut self, kind: FoulKind, committed_by: PlayerRef, fouled: PlayerRef, tally: FoulTally) {
        self.foul = Some(FoulEvent {
            kind,
            committed_by,
            fouled,
            personal_fouls: tally.personal_fouls,
            team_fouls: tally.team_fouls,
            free_throws: 0,
            and_one: false,
            fouled_out: tally.fouled_out,
            intentional: false,
        });
    }

    fn set_free_throws(&mut self, attempts: u8, and_one: bool, intentional: bool) {
        if let Some(foul) = self.foul.as_mut() {
            foul.free_throws = attempts;
            foul.and_one = and_one;
            foul.intentional = intentional;
        }
    }
}

pub struct PossessionSimulator<'a> {
    config: &'a EngineConfig,
    stamina: &'a StaminaManager,
}

impl<'a> PossessionSimulator<'a> {
    pub fn new(config: &'a EngineConfig, stamina: &'a StaminaManager) -> Self {
        Self { config, stamina }
    }

    pub fn simulate<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut GameState,
        clock: &GameClock,
        ctx: &PossessionContext,
    ) -> PossessionResult {
        state.possession.start_possession(ctx.offense);
        let modifiers = end_game::possession_modifiers(
            ctx.period,
            ctx.game_clock,
            ctx.score_differential,
            &self.config.end_game,
        );
        let mut trace = PossessionTrace::new(ctx.is_transition, ctx.shot_clock);
        trace.end_game_modes = modifiers.modes.clone();

        let offense_lineup = state.team(ctx.offense).lineup.clone();
        let defense_lineup = state.team(ctx.defense()).lineup.clone();

        // 1. Possession length
        let pace = state.team(ctx.offense).team.tactics.pace;
        let sampled = clock.sample_possession_duration(
            rng,
            pace,
            ctx.is_transition,
            modifiers.pace_multiplier,
            ctx.shot_clock,
        );
        trace.sampled_duration = sampled;
        let duration = clock.bound_duration(
            modifiers.target_duration(sampled, ctx.shot_clock, ctx.game_clock),
            ctx.shot_clock,
        );

        let mut record = Record::default();
        let (elapsed, handover) = if modifiers.intentional_foul {
            self.intentional_foul(rng, state, ctx, &mut record)
        } else {
            self.play(rng, state, ctx, &modifiers, duration, &mut record, &mut trace)
        };

        let offense = state.team_mut(ctx.offense);
        offense.score += u16::from(record.points);

        log::debug!(
            "P{} {:.0}s {} {:?} +{} ({:.1}s)",
            ctx.period,
            ctx.game_clock,
            ctx.offense,
            handover.outcome,
            record.points,
            elapsed
        );

        PossessionResult {
            period: ctx.period,
            offense: ctx.offense,
            outcome: handover.outcome,
            points: record.points,
            start_clock: ctx.game_clock,
            elapsed,
            shots: record.shots,
            turnover: record.turnover,
            foul: record.foul,
            free_throws: record.free_throws,
            offense_lineup,
            defense_lineup,
            substitutions: record.substitutions,
            next_offense: handover.next_offense,
            next_is_transition: handover.next_is_transition,
            next_shot_clock: handover.next_shot_clock,
            trace,
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn full_shot_clock(&self) -> f32 {
        self.config.clock.shot_clock_seconds
    }

    fn reset_shot_clock(&self) -> f32 {
        self.config.clock.reset_shot_clock_seconds
    }

    /// Defender in the same lineup slot as `attacker`.
    fn matched_defender(&self, state: &GameState, offense: TeamSide, attacker: usize) -> usize {
        let slot = state.team(offense).lineup.iter().position(|i| *i == attacker).unwrap_or(0);
        let defense = state.team(offense.opponent());
        defense.lineup.get(slot).copied().unwrap_or(defense.lineup[0])
    }

    /// Part of the sampled length that runs off before a turnover or
    /// non-shooting foul.
    fn partial_elapsed<R: Rng + ?Sized>(&self, rng: &mut R, duration: f32) -> f32 {
        let min = self.config.turnover.min_elapsed_fraction.clamp(0.0, 1.0);
        duration * rng.gen_range(min..=1.0)
    }

    fn rebound<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &GameState,
        offense: TeamSide,
        source: MissSource,
    ) -> ReboundEvent {
        rebound::resolve_rebound(
            rng,
            state.team(offense),
            state.team(offense.opponent()),
            source,
            &self.config.weights,
            &self.config.rebound,
            self.stamina,
        )
    }

    /// Apply a rebound to the possession state and decide who has the ball.
    fn after_rebound<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut GameState,
        offense: TeamSide,
        rebound: &ReboundEvent,
        outcome: PossessionOutcome,
        allow_transition: bool,
    ) -> Handover {
        if rebound.offensive {
            state.possession.on_offensive_rebound();
            return Handover {
                outcome,
                next_offense: offense,
                next_is_transition: false,
                next_shot_clock: self.reset_shot_clock(),
            };
        }
        let defense = offense.opponent();
        state.possession.on_defensive_rebound(defense);
        let running = allow_transition && {
            let strategy = state.team(offense).team.tactics.rebounding_strategy;
            roll(rng, rebound::transition_probability(strategy, &self.config.rebound))
        };
        Handover {
            outcome,
            next_offense: defense,
            next_is_transition: running,
            next_shot_clock: self.full_shot_clock(),
        }
    }

    /// Replace a player the last whistle fouled out. Runs while the ball is
    /// dead from that whistle.
    fn foul_out_substitution(
        &self,
        state: &mut GameState,
        ctx: &PossessionContext,
        fouler: PlayerRef,
        elapsed: f32,
        record: &mut Record,
    ) {
        let rotation = SubstitutionManager::new(self.config.rotation.clone());
        let rotation_ctx = RotationContext {
            period: ctx.period,
            game_clock: (ctx.game_clock - elapsed).max(0.0),
            margin: state.margin(fouler.side),
        };
        let possession = state.possession;
        match rotation.force_foul_out_substitution(
            state.team_mut(fouler.side),
            fouler.index,
            &rotation_ctx,
            &possession,
        ) {
            Ok(Some(event)) => record.substitutions.push(event),
            Ok(None) => {}
            Err(e) => log::error!("Foul-out replacement skipped: {}", e),
        }
    }

    // ========================================================================
    // Possession branches
    // ========================================================================

    /// Defense fouls straight away to stop the clock.
    fn intentional_foul<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut GameState,
        ctx: &PossessionContext,
        record: &mut Record,
    ) -> (f32, Handover) {
        let cfg = &self.config.foul;
        let target = fouls::intentional_foul_target(
            rng,
            state.team(ctx.offense),
            &self.config.weights,
            cfg,
            self.stamina,
        );
        let elapsed = fouls::intentional_foul_elapsed(rng, cfg).min(ctx.game_clock);
        let fouler = self.matched_defender(state, ctx.offense, target);

        let tally = fouls::record_foul(state.team_mut(ctx.defense()), fouler, true, cfg);
        state.possession.on_foul();
        record.foul(
            FoulKind::NonShooting,
            PlayerRef::new(ctx.defense(), fouler),
            PlayerRef::new(ctx.offense, target),
            tally,
        );
        if tally.fouled_out {
            self.foul_out_substitution(state, ctx, PlayerRef::new(ctx.defense(), fouler), elapsed, record);
        }
        record.set_free_throws(cfg.bonus_free_throws, false, true);

        let in_bonus = fouls::in_bonus(tally.team_fouls, ctx.is_overtime(), cfg);
        let handover = self.free_throw_trip(
            rng,
            state,
            ctx,
            target,
            cfg.bonus_free_throws,
            FreeThrowSituation { and_one: false, in_bonus, clutch: false },
            elapsed,
            record,
            PossessionOutcome::NonShootingFoul,
        );
        (elapsed, handover)
    }

    #[allow(clippy::too_many_arguments)]
    fn play<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut GameState,
        ctx: &PossessionContext,
        modifiers: &EndGameModifiers,
        duration: f32,
        record: &mut Record,
        trace: &mut PossessionTrace,
    ) -> (f32, Handover) {
        let weights = &self.config.weights;

        // 3. Ball handler
        let offense = state.team(ctx.offense);
        let defense = state.team(ctx.defense());
        let handling = offense.lineup_composites(&weights.ball_handling, self.stamina);
        let pick: Vec<f32> = handling.iter().map(|c| c.max(1.0)).collect();
        let slot = weighted_choice(rng, &pick).unwrap_or(0);
        let handler = offense.lineup[slot];
        let defender = defense.lineup[slot];

        // 4. Turnover
        let situation = TurnoverSituation {
            pace: offense.team.tactics.pace,
            zone_fraction: defense.team.tactics.zone_fraction(),
            is_transition: ctx.is_transition,
            end_game_adjustment: modifiers.turnover_adjustment,
        };
        let pressure = defense.composite(defender, &weights.steal, self.stamina);
        let p_turnover =
            turnover::turnover_probability(handling[slot], pressure, &situation, &self.config.turnover);
        trace.turnover_probability = Some(p_turnover);
        if roll(rng, p_turnover) {
            return self.turnover(rng, state, ctx, handler, defender, p_turnover, duration, record);
        }

        // 5. Non-shooting foul
        if fouls::non_shooting_foul(rng, &self.config.foul) {
            return self.non_shooting_foul(rng, state, ctx, handler, defender, duration, record);
        }

        // 6. Shot
        let shooter = shot::select_shooter(
            rng,
            state.team(ctx.offense),
            weights,
            &self.config.shot,
            self.stamina,
        );
        let handover = self.shot_sequence(rng, state, ctx, modifiers, shooter, duration, record, trace);
        (duration, handover)
    }

    #[allow(clippy::too_many_arguments)]
    fn turnover<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut GameState,
        ctx: &PossessionContext,
        handler: usize,
        defender: usize,
        probability: f32,
        duration: f32,
        record: &mut Record,
    ) -> (f32, Handover) {
        let cfg = &self.config.turnover;
        let kind = turnover::select_turnover_type(rng, cfg);
        let elapsed = self.partial_elapsed(rng, duration);

        let mut stolen_by = None;
        match kind {
            TurnoverType::OffensiveFoul => {
                let tally = fouls::record_foul(state.team_mut(ctx.offense), handler, false, &self.config.foul);
                record.foul(
                    FoulKind::Offensive,
                    PlayerRef::new(ctx.offense, handler),
                    PlayerRef::new(ctx.defense(), defender),
                    tally,
                );
                state.possession.on_turnover();
                if tally.fouled_out {
                    self.foul_out_substitution(state, ctx, PlayerRef::new(ctx.offense, handler), elapsed, record);
                }
            }
            k if k.is_live_ball() => {
                let steal = state.team(ctx.defense()).composite(
                    defender,
                    &self.config.weights.steal,
                    self.stamina,
                );
                if roll(rng, turnover::steal_probability(steal, cfg)) {
                    stolen_by = Some(PlayerRef::new(ctx.defense(), defender));
                    state.possession.on_steal();
                } else {
                    state.possession.on_live_ball_turnover();
                }
            }
            _ => state.possession.on_turnover(),
        }

        let running = turnover::transition_after(rng, kind, stolen_by.is_some(), cfg);
        record.turnover = Some(TurnoverEvent {
            kind,
            committed_by: PlayerRef::new(ctx.offense, handler),
            stolen_by,
            probability,
        });
        let handover = Handover {
            outcome: PossessionOutcome::Turnover,
            next_offense: ctx.defense(),
            next_is_transition: running,
            next_shot_clock: self.full_shot_clock(),
        };
        (elapsed, handover)
    }

    #[allow(clippy::too_many_arguments)]
    fn non_shooting_foul<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut GameState,
        ctx: &PossessionContext,
        handler: usize,
        defender: usize,
        duration: f32,
        record: &mut Record,
    ) -> (f32, Handover) {
        let cfg = &self.config.foul;
        let elapsed = self.partial_elapsed(rng, duration);
        let tally = fouls::record_foul(state.team_mut(ctx.defense()), defender, true, cfg);
        state.possession.on_foul();
        record.foul(
            FoulKind::NonShooting,
            PlayerRef::new(ctx.defense(), defender),
            PlayerRef::new(ctx.offense, handler),
            tally,
        );
        if tally.fouled_out {
            self.foul_out_substitution(state, ctx, PlayerRef::new(ctx.defense(), defender), elapsed, record);
        }

        if !fouls::in_bonus(tally.team_fouls, ctx.is_overtime(), cfg) {
            // Side-out: shot clock tops up to the reset value
            let handover = Handover {
                outcome: PossessionOutcome::NonShootingFoul,
                next_offense: ctx.offense,
                next_is_transition: false,
                next_shot_clock: (ctx.shot_clock - elapsed).max(self.reset_shot_clock()),
            };
            return (elapsed, handover);
        }

        record.set_free_throws(cfg.bonus_free_throws, false, false);
        let handover = self.free_throw_trip(
            rng,
            state,
            ctx,
            handler,
            cfg.bonus_free_throws,
            FreeThrowSituation { and_one: false, in_bonus: true, clutch: false },
            elapsed,
            record,
            PossessionOutcome::NonShootingFoul,
        );
        (elapsed, handover)
    }

    #[allow(clippy::too_many_arguments)]
    fn shot_sequence<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut GameState,
        ctx: &PossessionContext,
        modifiers: &EndGameModifiers,
        shooter: usize,
        duration: f32,
        record: &mut Record,
        trace: &mut PossessionTrace,
    ) -> Handover {
        let offense = state.team(ctx.offense);
        let penalty = self.stamina.current_penalty(offense.players[shooter].stamina);
        let selection = ShotSelectionModifiers {
            is_transition: ctx.is_transition,
            three_point_adjustment: modifiers.three_pt_adjustment,
            forced: modifiers.force_shot_type,
        };
        let mix = shot::shot_distribution(
            offense.player(shooter),
            penalty,
            &self.config.weights,
            &self.config.shot,
            &selection,
        );
        trace.shot_mix = Some(mix.shares());
        let shot_type = shot::select_shot_type(rng, &mix, &selection);

        let mut attempt = self.resolve_shot(rng, state, ctx, shooter, shot_type, false, trace);

        if attempt.fouled {
            let cfg = &self.config.foul;
            let tally = fouls::record_foul(state.team_mut(ctx.defense()), attempt.defender.index, true, cfg);
            state.possession.on_foul();
            record.foul(FoulKind::Shooting, attempt.defender, attempt.shooter, tally);
            if tally.fouled_out {
                self.foul_out_substitution(state, ctx, attempt.defender, duration, record);
            }
            let attempts = fouls::shooting_foul_free_throws(shot_type, attempt.made);
            record.set_free_throws(attempts, attempt.made, false);
            record.points += attempt.points();
            let and_one = attempt.made;
            record.shots.push(attempt);

            let in_bonus = fouls::in_bonus(tally.team_fouls, ctx.is_overtime(), cfg);
            return self.free_throw_trip(
                rng,
                state,
                ctx,
                shooter,
                attempts,
                FreeThrowSituation { and_one, in_bonus, clutch: false },
                duration,
                record,
                PossessionOutcome::ShootingFoul,
            );
        }

        if attempt.made {
            record.points += attempt.points();
            record.shots.push(attempt);
            state.possession.on_made_basket();
            return self.made_basket(ctx);
        }

        // 7. Rebound and putback
        let first = self.rebound(rng, state, ctx.offense, MissSource::FieldGoal(shot_type));
        attempt.rebound = Some(first.clone());
        record.shots.push(attempt);

        let rebounder = first.rebounder;
        let putback = first.offensive
            && rebound::is_putback_candidate(state.player(rebounder), &self.config.rebound);
        if !putback {
            return self.after_rebound(rng, state, ctx.offense, &first, PossessionOutcome::MissedShot, true);
        }

        state.possession.on_offensive_rebound();
        let mut second = self.resolve_shot(rng, state, ctx, rebounder.index, ShotType::Rim, true, trace);
        if second.made {
            record.points += second.points();
            record.shots.push(second);
            state.possession.on_made_basket();
            return self.made_basket(ctx);
        }
        let last = self.rebound(rng, state, ctx.offense, MissSource::FieldGoal(ShotType::Rim));
        second.rebound = Some(last.clone());
        record.shots.push(second);
        self.after_rebound(rng, state, ctx.offense, &last, PossessionOutcome::MissedShot, true)
    }

    fn made_basket(&self, ctx: &PossessionContext) -> Handover {
        Handover {
            outcome: PossessionOutcome::MadeShot,
            next_offense: ctx.defense(),
            next_is_transition: false,
            next_shot_clock: self.full_shot_clock(),
        }
    }

    /// Contest, foul, block, make and assist for one attempt. The rebound is
    /// filled in by the caller. Putbacks skip the foul check and the assist.
    #[allow(clippy::too_many_arguments)]
    fn resolve_shot<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &GameState,
        ctx: &PossessionContext,
        shooter: usize,
        shot_type: ShotType,
        is_putback: bool,
        trace: &mut PossessionTrace,
    ) -> ShotAttempt {
        let weights = &self.config.weights;
        let cfg = &self.config.shot;
        let offense = state.team(ctx.offense);
        let defense = state.team(ctx.defense());
        let defender = self.matched_defender(state, ctx.offense, shooter);

        let in_zone = roll(rng, defense.team.tactics.zone_fraction());
        let inputs = ContestInputs {
            shot_type,
            defender_contest: defense.composite(defender, &weights.contest, self.stamina),
            defender_acceleration: defense.player(defender).attr(Attribute::Acceleration),
            shooter_patience: offense.player(shooter).attr(Attribute::Patience),
            in_zone,
            is_transition: ctx.is_transition && !is_putback,
        };
        let distance = shot::contest_distance(rng, &inputs, cfg);
        let contest = shot::contest_level(distance, cfg);

        let fouled = if is_putback {
            false
        } else {
            let p = fouls::shooting_foul_probability(contest, shot_type, &self.config.foul);
            trace.foul_probability = Some(p);
            roll(rng, p)
        };

        let shooter_composite = offense.composite(shooter, weights.shot(shot_type), self.stamina);
        let p_block = shot::block_probability(
            shot_type,
            contest,
            defense.composite(defender, &weights.block, self.stamina),
            shooter_composite,
            cfg,
        );
        if !is_putback {
            trace.block_probability = Some(p_block);
        }
        let blocked = !fouled && roll(rng, p_block);

        let probability = shot::make_probability(
            shot_type,
            shooter_composite,
            inputs.defender_contest,
            contest,
            inputs.is_transition,
            cfg,
        );
        let made = !blocked && roll(rng, probability);

        let assist = if made && !is_putback {
            shot::select_assister(rng, offense, shooter, shot_type, weights, cfg, self.stamina)
                .map(|i| PlayerRef::new(ctx.offense, i))
        } else {
            None
        };

        ShotAttempt {
            shooter: PlayerRef::new(ctx.offense, shooter),
            defender: PlayerRef::new(ctx.defense(), defender),
            shot_type,
            contest_distance: distance,
            contest,
            probability,
            made,
            blocked_by: blocked.then(|| PlayerRef::new(ctx.defense(), defender)),
            fouled,
            is_putback,
            assist,
            rebound: None,
        }
    }

    /// Shoot a trip of free throws. A made final attempt hands the ball over;
    /// a miss is rebounded.
    #[allow(clippy::too_many_arguments)]
    fn free_throw_trip<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        state: &mut GameState,
        ctx: &PossessionContext,
        shooter: usize,
        attempts: u8,
        mut situation: FreeThrowSituation,
        elapsed: f32,
        record: &mut Record,
        outcome: PossessionOutcome,
    ) -> Handover {
        let cfg = &self.config.foul;
        let margin = ctx.score_differential + i32::from(record.points);
        situation.clutch = free_throws::is_clutch(ctx.period, ctx.game_clock - elapsed, margin, cfg);

        let composite =
            state.team(ctx.offense).composite(shooter, &self.config.weights.free_throw, self.stamina);
        let probability = free_throws::free_throw_probability(composite, &situation, cfg);
        let results = free_throws::shoot(rng, attempts, probability);

        let mut trip = FreeThrowResult {
            shooter: PlayerRef::new(ctx.offense, shooter),
            probability,
            results,
            rebound: None,
        };
        record.points += trip.made();

        let handover = if trip.final_made() {
            state.possession.on_made_basket();
            Handover {
                outcome,
                next_offense: ctx.defense(),
                next_is_transition: false,
                next_shot_clock: self.full_shot_clock(),
            }
        } else {
            state.possession.on_missed_final_ft();
            let rebound = self.rebound(rng, state, ctx.offense, MissSource::FreeThrow);
            let handover = self.after_rebound(rng, state, ctx.offense, &rebound, outcome, false);
            trip.rebound = Some(rebound);
            handover
        };
        record.free_throws = Some(trip);
        handover
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{ClockConfig, StaminaConfig};
    use crate::models::{EndGameMode, SubstitutionReason};
    use crate::test_support::{balanced_team, rated_team};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(config: &EngineConfig) -> (GameState, GameClock) {
        let state = GameState::new(balanced_team("H"), balanced_team("A"), config);
        let mut clock = GameClock::new(&ClockConfig::default()).unwrap();
        clock.start_period(1, 720.0);
        (state, clock)
    }

    fn ctx(period: u8, offense: TeamSide, game_clock: f32, margin: i32) -> PossessionContext {
        PossessionContext {
            period,
            offense,
            is_transition: false,
            shot_clock: 24.0,
            score_differential: margin,
            game_clock,
        }
    }

    /// Chain possessions the way the quarter loop does, without the clock.
    fn run_many(config: &EngineConfig, seed: u64, n: usize) -> (GameState, Vec<PossessionResult>) {
        let (mut state, clock) = setup(config);
        let stamina = StaminaManager::new(StaminaConfig::default());
        let sim = PossessionSimulator::new(config, &stamina);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut results = Vec::with_capacity(n);
        let mut next = ctx(1, TeamSide::Home, 700.0, 0);
        for _ in 0..n {
            let r = sim.simulate(&mut rng, &mut state, &clock, &next);
            next = PossessionContext {
                offense: r.next_offense,
                is_transition: r.next_is_transition,
                shot_clock: r.next_shot_clock,
                score_differential: state.margin(r.next_offense),
                ..next
            };
            results.push(r);
        }
        (state, results)
    }

    #[test]
    fn test_rebound_invariant() {
        let (_, results) = run_many(&EngineConfig::default(), 7, 3000);
        for r in &results {
            for s in &r.shots {
                // Fouled misses go to the line instead
                let rebounded = !s.made && !s.fouled;
                assert_eq!(rebounded, s.rebound.is_some(), "{:?}", s);
                if s.blocked_by.is_some() {
                    assert!(!s.made);
                }
            }
            if let Some(ft) = &r.free_throws {
                assert_eq!(ft.final_made(), ft.rebound.is_none());
            }
            assert!(r.shots.iter().filter(|s| s.is_putback).count() <= 1);
        }
    }

    #[test]
    fn test_points_match_events_and_score() {
        let (state, results) = run_many(&EngineConfig::default(), 11, 2000);
        let mut totals = [0u32; 2];
        for r in &results {
            assert_eq!(r.points, r.field_goal_points() + r.free_throw_points());
            totals[r.offense.index()] += u32::from(r.points);
        }
        assert_eq!(totals[0], u32::from(state.home.score));
        assert_eq!(totals[1], u32::from(state.away.score));
    }

    #[test]
    fn test_exactly_one_outcome_shape() {
        let (_, results) = run_many(&EngineConfig::default(), 3, 2000);
        for r in &results {
            match r.outcome {
                PossessionOutcome::Turnover => {
                    assert!(r.turnover.is_some());
                    assert!(r.shots.is_empty());
                }
                PossessionOutcome::MadeShot => assert!(r.shots.iter().any(|s| s.made)),
                PossessionOutcome::MissedShot => {
                    assert!(!r.shots.is_empty());
                    assert!(r.shots.iter().all(|s| !s.made));
                }
                PossessionOutcome::ShootingFoul => {
                    assert_eq!(r.foul.as_ref().map(|f| f.kind), Some(FoulKind::Shooting));
                    assert!(r.free_throws.is_some());
                }
                PossessionOutcome::NonShootingFoul => {
                    assert_eq!(r.foul.as_ref().map(|f| f.kind), Some(FoulKind::NonShooting));
                    assert!(r.shots.is_empty() && r.turnover.is_none());
                }
            }
            assert!(r.elapsed >= 0.0 && r.elapsed <= 24.0);
        }
    }

    #[test]
    fn test_possession_state_agrees_with_handover() {
        let config = EngineConfig::default();
        let (mut state, clock) = setup(&config);
        let stamina = StaminaManager::new(StaminaConfig::default());
        let sim = PossessionSimulator::new(&config, &stamina);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for i in 0..500 {
            let offense = if i % 2 == 0 { TeamSide::Home } else { TeamSide::Away };
            state.possession.start_period(offense);
            let r = sim.simulate(&mut rng, &mut state, &clock, &ctx(1, offense, 600.0, 0));
            assert_eq!(state.possession.possessing(), r.next_offense, "{:?}", r.outcome);
        }
    }

    #[test]
    fn test_stale_ball_state_reset_each_possession() {
        let config = EngineConfig::default();
        let (mut state, clock) = setup(&config);
        let stamina = StaminaManager::new(StaminaConfig::default());
        let sim = PossessionSimulator::new(&config, &stamina);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        for i in 0..300 {
            let offense = if i % 2 == 0 { TeamSide::Home } else { TeamSide::Away };
            // Leave the previous dead ball with the wrong team
            state.possession.start_period(offense.opponent());
            state.possession.on_foul();
            let r = sim.simulate(&mut rng, &mut state, &clock, &ctx(1, offense, 600.0, 0));
            assert_eq!(state.possession.possessing(), r.next_offense, "{:?}", r.outcome);
        }
    }

    #[test]
    fn test_foul_out_swapped_inside_the_whistle() {
        let mut config = EngineConfig::default();
        config.foul.personal_foul_limit = 1;
        let (mut state, clock) = setup(&config);
        let stamina = StaminaManager::new(StaminaConfig::default());
        let sim = PossessionSimulator::new(&config, &stamina);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let mut next = ctx(1, TeamSide::Home, 700.0, 0);
        let mut swaps = 0;

        for _ in 0..3000 {
            let bench = TeamSide::BOTH.map(|side| {
                state.team(side).players.iter().filter(|p| !p.on_court && !p.fouled_out).count()
            });
            let r = sim.simulate(&mut rng, &mut state, &clock, &next);

            match r.foul.as_ref().filter(|f| f.fouled_out) {
                Some(foul) => {
                    let out = foul.committed_by;
                    if bench[out.side.index()] > 0 {
                        assert_eq!(r.substitutions.len(), 1);
                        let sub = &r.substitutions[0];
                        assert_eq!(sub.reason, SubstitutionReason::FoulOut);
                        assert_eq!(sub.player_out, out);
                        assert!(!state.team(out.side).lineup.contains(&out.index));
                        // Free throws and their rebound belong to the new lineup
                        if let Some(rebound) = r.free_throws.as_ref().and_then(|ft| ft.rebound.as_ref()) {
                            assert_ne!(rebound.rebounder, out);
                        }
                        swaps += 1;
                    } else {
                        assert!(r.substitutions.is_empty());
                    }
                }
                None => assert!(r.substitutions.is_empty()),
            }

            next = PossessionContext {
                offense: r.next_offense,
                is_transition: r.next_is_transition,
                shot_clock: r.next_shot_clock,
                score_differential: state.margin(r.next_offense),
                ..next
            };
        }
        assert!(swaps > 0);
    }

    #[test]
    fn test_fouled_miss_awards_shot_value() {
        let (_, results) = run_many(&EngineConfig::default(), 21, 4000);
        let fouled: Vec<_> = results.iter().filter(|r| r.outcome == PossessionOutcome::ShootingFoul).collect();
        assert!(!fouled.is_empty());
        for r in fouled {
            let shot = &r.shots[0];
            let foul = r.foul.as_ref().unwrap();
            let trip = r.free_throws.as_ref().unwrap();
            let expected = if shot.made { 1 } else { shot.shot_type.points() };
            assert_eq!(trip.attempts(), expected);
            assert_eq!(foul.and_one, shot.made);
            assert!(!shot.counts_as_attempt() || shot.made);
        }
    }

    #[test]
    fn test_intentional_foul_when_defense_trails_late() {
        let config = EngineConfig::default();
        let (mut state, clock) = setup(&config);
        let stamina = StaminaManager::new(StaminaConfig::default());
        let sim = PossessionSimulator::new(&config, &stamina);
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        // Offense up 4 with 40 s left in the fourth
        let r = sim.simulate(&mut rng, &mut state, &clock, &ctx(4, TeamSide::Home, 40.0, 4));
        let foul = r.foul.expect("intentional foul");
        assert!(foul.intentional);
        assert_eq!(foul.free_throws, 2);
        assert!(r.trace.end_game_modes.contains(&EndGameMode::IntentionalFoul));
        assert!((2.0..=4.0).contains(&r.elapsed));
        assert_eq!(r.free_throws.as_ref().map(|t| t.attempts()), Some(2));
    }

    #[test]
    fn test_side_out_outside_bonus() {
        let mut config = EngineConfig::default();
        config.foul.non_shooting_rate = 1.0;
        config.turnover.base_rate = 0.05;
        let (mut state, clock) = setup(&config);
        let stamina = StaminaManager::new(StaminaConfig::default());
        let sim = PossessionSimulator::new(&config, &stamina);
        let mut rng = ChaCha8Rng::seed_from_u64(30);

        let mut side_outs = 0;
        let mut bonus_trips = 0;
        for _ in 0..40 {
            state.possession.start_period(TeamSide::Home);
            let r = sim.simulate(&mut rng, &mut state, &clock, &ctx(2, TeamSide::Home, 500.0, 0));
            if r.outcome != PossessionOutcome::NonShootingFoul {
                continue;
            }
            let foul = r.foul.as_ref().unwrap();
            if foul.team_fouls < 5 {
                side_outs += 1;
                assert!(r.free_throws.is_none());
                assert_eq!(r.next_offense, TeamSide::Home);
                assert!(r.next_shot_clock >= 14.0);
            } else {
                bonus_trips += 1;
                assert_eq!(r.free_throws.as_ref().map(|t| t.attempts()), Some(2));
            }
        }
        assert!(side_outs > 0 && bonus_trips > 0);
    }

    #[test]
    fn test_last_shot_holds_for_the_final_seconds() {
        let config = EngineConfig::default();
        let (mut state, clock) = setup(&config);
        let stamina = StaminaManager::new(StaminaConfig::default());
        let sim = PossessionSimulator::new(&config, &stamina);
        let mut rng = ChaCha8Rng::seed_from_u64(44);
        for _ in 0..20 {
            state.possession.start_period(TeamSide::Away);
            let r = sim.simulate(&mut rng, &mut state, &clock, &ctx(4, TeamSide::Away, 20.0, 0));
            assert!(r.trace.end_game_modes.contains(&EndGameMode::LastShot));
            if !r.shots.is_empty() {
                // Shoot with 3 s left on the game clock
                assert!((r.elapsed - 17.0).abs() < 1e-4);
            }
        }
    }

    #[test]
    fn test_stronger_team_scores_more() {
        let config = EngineConfig::default();
        let mut state = GameState::new(rated_team("S", 80.0), rated_team("W", 35.0), &config);
        let mut clock = GameClock::new(&config.clock).unwrap();
        clock.start_period(1, 720.0);
        let stamina = StaminaManager::new(StaminaConfig::default());
        let sim = PossessionSimulator::new(&config, &stamina);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for i in 0..1000 {
            let offense = if i % 2 == 0 { TeamSide::Home } else { TeamSide::Away };
            state.possession.start_period(offense);
            sim.simulate(&mut rng, &mut state, &clock, &ctx(1, offense, 600.0, 0));
        }
        assert!(state.home.score > state.away.score);
    }
}
