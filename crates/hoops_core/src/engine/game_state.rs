//! Mutable per-game state owned by the game simulator.

use super::config::{EngineConfig, WeightTable};
use super::possession_state::PossessionState;
use super::probability::effective_composite;
use super::stamina::{StaminaManager, STAMINA_MAX};
use crate::models::{Player, PlayerRef, Team, TeamSide, LINEUP_SIZE};

/// In-game state of one rostered player.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerGameState {
    pub stamina: f32,
    pub personal_fouls: u8,
    pub fouled_out: bool,
    pub on_court: bool,
    /// Seconds on court in the current period
    pub quarter_seconds: f32,
    /// Seconds since the player last checked in
    pub stint_seconds: f32,
    pub seconds_played: f32,
}

impl PlayerGameState {
    fn fresh(on_court: bool) -> Self {
        Self {
            stamina: STAMINA_MAX,
            personal_fouls: 0,
            fouled_out: false,
            on_court,
            quarter_seconds: 0.0,
            stint_seconds: 0.0,
            seconds_played: 0.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TeamState {
    pub side: TeamSide,
    pub team: Team,
    pub players: Vec<PlayerGameState>,
    /// Roster indices on the floor, always `LINEUP_SIZE` long
    pub lineup: Vec<usize>,
    pub timeouts_remaining: u8,
    /// Team fouls in the current period
    pub period_fouls: u8,
    pub score: u16,
    /// Minutes plan converted to seconds, per roster index
    pub minutes_budget: Vec<f32>,
    pub closers: Vec<usize>,
    pub scoring_options: Vec<usize>,
}

impl TeamState {
    /// Expects a validated team.
    pub fn new(side: TeamSide, team: Team, timeouts: u8) -> Self {
        let n = team.players.len();
        let lineup: Vec<usize> = (0..LINEUP_SIZE.min(n)).collect();
        let players = (0..n).map(|i| PlayerGameState::fresh(i < LINEUP_SIZE)).collect();

        let minutes_budget: Vec<f32> = team
            .players
            .iter()
            .map(|p| team.tactics.minutes_for(&p.name) as f32 * 60.0)
            .collect();

        let scoring_options =
            team.tactics.scoring_options.iter().filter_map(|name| team.player_index(name)).collect();

        let closers = if team.tactics.closers.is_empty() {
            // Five largest allotments, roster order breaking ties
            let mut ranked: Vec<usize> = (0..n).collect();
            ranked.sort_by(|a, b| {
                minutes_budget[*b].total_cmp(&minutes_budget[*a]).then(a.cmp(b))
            });
            ranked.truncate(LINEUP_SIZE);
            ranked
        } else {
            team.tactics.closers.iter().filter_map(|name| team.player_index(name)).collect()
        };

        Self {
            side,
            team,
            players,
            lineup,
            timeouts_remaining: timeouts,
            period_fouls: 0,
            score: 0,
            minutes_budget,
            closers,
            scoring_options,
        }
    }

    #[inline]
    pub fn player(&self, index: usize) -> &Player {
        &self.team.players[index]
    }

    pub fn player_ref(&self, index: usize) -> PlayerRef {
        PlayerRef::new(self.side, index)
    }

    pub fn name(&self, index: usize) -> &str {
        &self.team.players[index].name
    }

    pub fn remaining_budget(&self, index: usize) -> f32 {
        self.minutes_budget[index] - self.players[index].seconds_played
    }

    pub fn is_closer(&self, index: usize) -> bool {
        self.closers.contains(&index)
    }

    /// Composite of a rostered player after the stamina penalty.
    pub fn composite(&self, index: usize, table: &WeightTable, stamina: &StaminaManager) -> f32 {
        let penalty = stamina.current_penalty(self.players[index].stamina);
        effective_composite(self.player(index), table, penalty)
    }

    /// Composite for each lineup slot, in lineup order.
    pub fn lineup_composites(&self, table: &WeightTable, stamina: &StaminaManager) -> Vec<f32> {
        self.lineup.iter().map(|i| self.composite(*i, table, stamina)).collect()
    }

    /// Lineup member with the highest composite; lineup order breaks ties.
    pub fn best_on_court(&self, table: &WeightTable, stamina: &StaminaManager) -> usize {
        let mut best = self.lineup[0];
        let mut best_value = f32::MIN;
        for &i in &self.lineup {
            let value = self.composite(i, table, stamina);
            if value > best_value {
                best = i;
                best_value = value;
            }
        }
        best
    }

    pub fn start_period(&mut self) {
        self.period_fouls = 0;
        for p in &mut self.players {
            p.quarter_seconds = 0.0;
        }
    }

    /// Swap a lineup slot. Stint counters restart for the incoming player.
    pub fn swap(&mut self, out_index: usize, in_index: usize) {
        if let Some(slot) = self.lineup.iter_mut().find(|i| **i == out_index) {
            *slot = in_index;
        }
        self.players[out_index].on_court = false;
        self.players[out_index].stint_seconds = 0.0;
        self.players[in_index].on_court = true;
        self.players[in_index].stint_seconds = 0.0;
    }
}

/// Whole-game mutable state.
#[derive(Debug, Clone)]
pub struct GameState {
    pub home: TeamState,
    pub away: TeamState,
    pub possession: PossessionState,
    pub period: u8,
}

impl GameState {
    pub fn new(home: Team, away: Team, config: &EngineConfig) -> Self {
        let timeouts = config.timeout.timeouts_per_team;
        Self {
            home: TeamState::new(TeamSide::Home, home, timeouts),
            away: TeamState::new(TeamSide::Away, away, timeouts),
            possession: PossessionState::new(TeamSide::Home),
            period: 0,
        }
    }

    pub fn team(&self, side: TeamSide) -> &TeamState {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut TeamState {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    pub fn player(&self, player: PlayerRef) -> &Player {
        self.team(player.side).player(player.index)
    }

    pub fn player_name(&self, player: PlayerRef) -> &str {
        self.team(player.side).name(player.index)
    }

    /// Positive when `side` leads.
    pub fn margin(&self, side: TeamSide) -> i32 {
        self.team(side).score as i32 - self.team(side.opponent()).score as i32
    }

    pub fn scores(&self) -> (u16, u16) {
        (self.home.score, self.away.score)
    }
}
