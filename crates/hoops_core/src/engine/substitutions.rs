//! Player Substitution Logic
//!
//! ## Functions
//! - process_substitutions: rotation pass at a legal dead ball
//! - process_between_periods: same pass at a period break
//! - find_substitution_candidate: rank eligible bench players
//! - execute_substitution: swap and log
//! - force_foul_out_substitution: removal inside the whistle that fouled
//!   the player out
//!
//! Order of a pass: foul-outs, then closers, then rest for fatigue or an
//! exhausted minutes budget. A player who fouled out never re-enters.

use super::config::RotationConfig;
use super::game_state::TeamState;
use super::possession_state::PossessionState;
use crate::error::StateError;
use crate::models::{PlayerRef, SubstitutionEvent, SubstitutionReason};
use std::cmp::Ordering;

/// Where the game is when a rotation pass runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationContext {
    pub period: u8,
    pub game_clock: f32,
    /// Positive when this team leads
    pub margin: i32,
}

#[derive(Debug, Clone)]
pub struct SubstitutionManager {
    config: RotationConfig,
}

impl SubstitutionManager {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    /// Final period or overtime, inside the closer window, within the margin.
    pub fn closer_window(&self, ctx: &RotationContext) -> bool {
        ctx.period >= 4
            && ctx.game_clock <= self.config.closer_window_seconds
            && ctx.margin.abs() <= self.config.closer_margin
    }

    /// Rotation pass at a dead ball. Rejected unless substitutions are legal.
    pub fn process_substitutions(
        &self,
        team: &mut TeamState,
        ctx: &RotationContext,
        possession: &PossessionState,
    ) -> Result<Vec<SubstitutionEvent>, StateError> {
        possession.ensure_substitution_allowed()?;
        Ok(self.rotate(team, ctx))
    }

    /// Rotation pass between periods; always legal.
    pub fn process_between_periods(
        &self,
        team: &mut TeamState,
        ctx: &RotationContext,
    ) -> Vec<SubstitutionEvent> {
        self.rotate(team, ctx)
    }

    fn rotate(&self, team: &mut TeamState, ctx: &RotationContext) -> Vec<SubstitutionEvent> {
        let mut events = Vec::new();

        // 1. Foul-outs
        let fouled: Vec<usize> =
            team.lineup.iter().copied().filter(|i| team.players[*i].fouled_out).collect();
        for out in fouled {
            if let Some(ev) = self.replace_fouled_out(team, out, ctx) {
                events.push(ev);
            }
        }

        // 2. Closers
        let closing = self.closer_window(ctx);
        if closing {
            let waiting: Vec<usize> = team
                .closers
                .iter()
                .copied()
                .filter(|i| {
                    let p = &team.players[*i];
                    !p.on_court && !p.fouled_out && p.stamina >= self.config.closer_min_stamina
                })
                .collect();
            for closer in waiting {
                if let Some(out) = self.non_closer_to_replace(team, closer) {
                    events.push(self.execute_substitution(
                        team,
                        out,
                        closer,
                        SubstitutionReason::Closer,
                        ctx,
                    ));
                }
            }
        }

        // 3. Rest
        let on_court = team.lineup.clone();
        for out in on_court {
            let Some(reason) = self.rest_reason(team, out, closing) else {
                continue;
            };
            if let Some(candidate) = self.find_substitution_candidate(team, out, false) {
                events.push(self.execute_substitution(team, out, candidate, reason, ctx));
            }
        }

        events
    }

    /// Why `index` should come out, if it should.
    fn rest_reason(&self, team: &TeamState, index: usize, closing: bool) -> Option<SubstitutionReason> {
        let p = &team.players[index];
        let cfg = &self.config;

        if closing && team.is_closer(index) && p.stamina >= cfg.closer_min_stamina {
            return None;
        }
        let stint_done = p.stint_seconds >= cfg.min_stint_seconds || p.stamina < cfg.forced_rest_threshold;
        if !stint_done {
            return None;
        }
        if p.stamina < cfg.rest_threshold {
            Some(SubstitutionReason::Fatigue)
        } else if team.remaining_budget(index) <= 0.0 {
            Some(SubstitutionReason::MinutesBudget)
        } else {
            None
        }
    }

    /// On-court non-closer a waiting closer should replace: same position
    /// first, then lowest stamina.
    fn non_closer_to_replace(&self, team: &TeamState, closer: usize) -> Option<usize> {
        let pos = team.player(closer).position;
        team.lineup
            .iter()
            .copied()
            .filter(|i| !team.is_closer(*i))
            .min_by(|a, b| {
                let pa = team.player(*a).position == pos;
                let pb = team.player(*b).position == pos;
                pb.cmp(&pa)
                    .then(team.players[*a].stamina.total_cmp(&team.players[*b].stamina))
                    .then(a.cmp(b))
            })
    }

    /// Best eligible bench player for `out`.
    ///
    /// Regular substitutions need stamina at the return threshold and
    /// minutes left in the budget; `emergency` (foul-outs) waives both.
    /// Ranking: exact position, position group, remaining budget, stamina,
    /// roster order.
    pub fn find_substitution_candidate(
        &self,
        team: &TeamState,
        out: usize,
        emergency: bool,
    ) -> Option<usize> {
        let pos = team.player(out).position;
        let eligible = (0..team.players.len()).filter(|&i| {
            let p = &team.players[i];
            if p.on_court || p.fouled_out {
                return false;
            }
            emergency
                || (p.stamina >= self.config.return_threshold && team.remaining_budget(i) > 0.0)
        });

        eligible.max_by(|&a, &b| {
            let (pa, pb) = (team.player(a).position, team.player(b).position);
            (pa == pos)
                .cmp(&(pb == pos))
                .then((pa.group() == pos.group()).cmp(&(pb.group() == pos.group())))
                .then(team.remaining_budget(a).total_cmp(&team.remaining_budget(b)))
                .then(team.players[a].stamina.total_cmp(&team.players[b].stamina))
                // Lower roster index wins the final tie
                .then(match a.cmp(&b) {
                    Ordering::Less => Ordering::Greater,
                    Ordering::Greater => Ordering::Less,
                    Ordering::Equal => Ordering::Equal,
                })
        })
    }

    /// Swap `out` for `player_in` and log the event.
    pub fn execute_substitution(
        &self,
        team: &mut TeamState,
        out: usize,
        player_in: usize,
        reason: SubstitutionReason,
        ctx: &RotationContext,
    ) -> SubstitutionEvent {
        team.swap(out, player_in);
        log::debug!(
            "{} substitution ({:?}): {} out, {} in",
            team.side,
            reason,
            team.name(out),
            team.name(player_in)
        );
        SubstitutionEvent {
            side: team.side,
            period: ctx.period,
            game_clock: ctx.game_clock,
            player_out: PlayerRef::new(team.side, out),
            player_in: PlayerRef::new(team.side, player_in),
            player_out_name: team.name(out).to_string(),
            player_in_name: team.name(player_in).to_string(),
            reason,
            lineup_after: team.lineup.clone(),
        }
    }

    /// Remove a fouled-out player right away, relaxing stamina and budget
    /// rules. Only legal at a dead ball that allows substitutions. With
    /// nobody left on the bench the player stays on the floor.
    pub fn force_foul_out_substitution(
        &self,
        team: &mut TeamState,
        out: usize,
        ctx: &RotationContext,
        possession: &PossessionState,
    ) -> Result<Option<SubstitutionEvent>, StateError> {
        possession.ensure_substitution_allowed()?;
        Ok(self.replace_fouled_out(team, out, ctx))
    }

    fn replace_fouled_out(
        &self,
        team: &mut TeamState,
        out: usize,
        ctx: &RotationContext,
    ) -> Option<SubstitutionEvent> {
        match self.find_substitution_candidate(team, out, true) {
            Some(candidate) => Some(self.execute_substitution(
                team,
                out,
                candidate,
                SubstitutionReason::FoulOut,
                ctx,
            )),
            None => {
                log::warn!(
                    "{}: no eligible replacement for fouled-out {}, player stays in",
                    team.side,
                    team.name(out)
                );
                None
            }
        }
    }
}
