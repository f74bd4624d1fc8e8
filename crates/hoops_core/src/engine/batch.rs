//! Series runner
//!
//! Plays the same matchup once per seed. Games are independent, so they run
//! in parallel; each owns its RNG stream and the summary is folded in seed
//! order, which keeps it identical to a sequential run.

use super::config::EngineConfig;
use super::game_sim::{GameEngine, GamePlan};
use crate::error::GameError;
use crate::models::{GameResult, Team, TeamSide};
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Aggregate of a run of games between the same two teams.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema)]
pub struct SeriesSummary {
    pub games: u32,
    pub home_wins: u32,
    pub away_wins: u32,
    /// Still level after the overtime cap
    pub ties: u32,
    pub overtime_games: u32,
    pub avg_home_points: f64,
    pub avg_away_points: f64,
    pub avg_possessions: f64,
}

impl SeriesSummary {
    pub fn from_results(results: &[GameResult]) -> Self {
        let mut summary = SeriesSummary { games: results.len() as u32, ..Default::default() };
        if results.is_empty() {
            return summary;
        }

        let (mut home_points, mut away_points, mut possessions) = (0u64, 0u64, 0u64);
        for result in results {
            match result.winner {
                Some(TeamSide::Home) => summary.home_wins += 1,
                Some(TeamSide::Away) => summary.away_wins += 1,
                None => summary.ties += 1,
            }
            if result.overtime_periods > 0 {
                summary.overtime_games += 1;
            }
            home_points += u64::from(result.final_score.home);
            away_points += u64::from(result.final_score.away);
            possessions += u64::from(result.determinism.possession_count);
        }

        let n = results.len() as f64;
        summary.avg_home_points = home_points as f64 / n;
        summary.avg_away_points = away_points as f64 / n;
        summary.avg_possessions = possessions as f64 / n;
        summary
    }

    pub fn home_win_pct(&self) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            f64::from(self.home_wins) / f64::from(self.games)
        }
    }
}

/// Play one game per seed. The first failing game aborts the series.
pub fn simulate_series(
    home: &Team,
    away: &Team,
    seeds: &[u64],
    config: &EngineConfig,
) -> Result<SeriesSummary, GameError> {
    log::info!("Series: {} vs {}, {} games", home.name, away.name, seeds.len());
    let results = seeds
        .par_iter()
        .map(|&seed| {
            let plan = GamePlan::new(home.clone(), away.clone(), seed).with_config(config.clone());
            GameEngine::new(plan)?.simulate()
        })
        .collect::<Result<Vec<_>, GameError>>()?;
    Ok(SeriesSummary::from_results(&results))
}
