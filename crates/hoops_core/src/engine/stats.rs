//! Box-score collection.
//!
//! Counting stats are credited straight from possession results; minutes
//! and foul-out flags are read from the final game state.

use super::game_state::{GameState, TeamState};
use crate::models::{
    BoxScore, PlayerBoxScore, PlayerRef, PossessionResult, StatLine, TeamBoxScore, TeamSide,
    LINEUP_SIZE,
};

#[derive(Debug, Clone)]
pub struct StatsCalculator {
    home: Vec<StatLine>,
    away: Vec<StatLine>,
}

impl StatsCalculator {
    pub fn new(home_roster: usize, away_roster: usize) -> Self {
        Self {
            home: vec![StatLine::default(); home_roster],
            away: vec![StatLine::default(); away_roster],
        }
    }

    fn line(&mut self, player: PlayerRef) -> &mut StatLine {
        match player.side {
            TeamSide::Home => &mut self.home[player.index],
            TeamSide::Away => &mut self.away[player.index],
        }
    }

    pub fn stat_line(&self, player: PlayerRef) -> &StatLine {
        match player.side {
            TeamSide::Home => &self.home[player.index],
            TeamSide::Away => &self.away[player.index],
        }
    }

    pub fn record_possession(&mut self, result: &PossessionResult) {
        for shot in &result.shots {
            let points = u16::from(shot.points());
            let line = self.line(shot.shooter);
            if shot.counts_as_attempt() {
                line.fga += 1;
                if shot.shot_type.is_three() {
                    line.tpa += 1;
                }
            }
            if shot.made {
                line.fgm += 1;
                line.points += points;
                if shot.shot_type.is_three() {
                    line.tpm += 1;
                }
            }
            if let Some(blocker) = shot.blocked_by {
                self.line(blocker).blk += 1;
            }
            if let Some(assister) = shot.assist {
                self.line(assister).ast += 1;
            }
        }

        for rebound in result.rebounds() {
            let line = self.line(rebound.rebounder);
            if rebound.offensive {
                line.oreb += 1;
            } else {
                line.dreb += 1;
            }
        }

        if let Some(turnover) = &result.turnover {
            self.line(turnover.committed_by).tov += 1;
            if let Some(thief) = turnover.stolen_by {
                self.line(thief).stl += 1;
            }
        }

        if let Some(foul) = &result.foul {
            self.line(foul.committed_by).pf += 1;
        }

        if let Some(trip) = &result.free_throws {
            let made = u16::from(trip.made());
            let line = self.line(trip.shooter);
            line.fta += u16::from(trip.attempts());
            line.ftm += made;
            line.points += made;
        }
    }

    fn team_box(&self, team: &TeamState) -> TeamBoxScore {
        let lines = match team.side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        };
        let mut totals = StatLine::default();
        let players = team
            .team
            .players
            .iter()
            .enumerate()
            .map(|(i, player)| {
                let stats = lines[i];
                totals.add(&stats);
                let seconds = team.players[i].seconds_played;
                PlayerBoxScore {
                    name: player.name.clone(),
                    position: player.position,
                    starter: i < LINEUP_SIZE,
                    stats,
                    seconds_played: seconds,
                    minutes: (seconds / 60.0 * 10.0).round() / 10.0,
                    fouled_out: team.players[i].fouled_out,
                }
            })
            .collect();
        TeamBoxScore { name: team.team.name.clone(), players, totals }
    }

    pub fn finalize(&self, state: &GameState) -> BoxScore {
        BoxScore { home: self.team_box(&state.home), away: self.team_box(&state.away) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::EngineConfig;
    use crate::models::{
        ContestLevel, FoulEvent, FoulKind, FreeThrowResult, PossessionOutcome, PossessionTrace,
        ReboundEvent, ShotAttempt, ShotType,
    };
    use crate::test_support::balanced_team;

    fn home(i: usize) -> PlayerRef {
        PlayerRef::new(TeamSide::Home, i)
    }

    fn away(i: usize) -> PlayerRef {
        PlayerRef::new(TeamSide::Away, i)
    }

    fn shot(shooter: PlayerRef, shot_type: ShotType, made: bool, fouled: bool) -> ShotAttempt {
        ShotAttempt {
            shooter,
            defender: away(shooter.index),
            shot_type,
            contest_distance: 4.0,
            contest: ContestLevel::Contested,
            probability: 0.4,
            made,
            blocked_by: None,
            fouled,
            is_putback: false,
            assist: None,
            rebound: None,
        }
    }

    fn possession(outcome: PossessionOutcome, points: u8) -> PossessionResult {
        PossessionResult {
            period: 1,
            offense: TeamSide::Home,
            outcome,
            points,
            start_clock: 700.0,
            elapsed: 12.0,
            shots: Vec::new(),
            turnover: None,
            foul: None,
            free_throws: None,
            offense_lineup: vec![0, 1, 2, 3, 4],
            defense_lineup: vec![0, 1, 2, 3, 4],
            substitutions: Vec::new(),
            next_offense: TeamSide::Away,
            next_is_transition: false,
            next_shot_clock: 24.0,
            trace: PossessionTrace::new(false, 24.0),
        }
    }

    #[test]
    fn test_and_one_three() {
        let mut stats = StatsCalculator::new(10, 10);
        let mut p = possession(PossessionOutcome::ShootingFoul, 4);
        let mut s = shot(home(1), ShotType::ThreePoint, true, true);
        s.assist = Some(home(0));
        p.shots.push(s);
        p.foul = Some(FoulEvent {
            kind: FoulKind::Shooting,
            committed_by: away(1),
            fouled: home(1),
            personal_fouls: 1,
            team_fouls: 1,
            free_throws: 1,
            and_one: true,
            fouled_out: false,
            intentional: false,
        });
        p.free_throws = Some(FreeThrowResult {
            shooter: home(1),
            probability: 0.8,
            results: vec![true],
            rebound: None,
        });
        stats.record_possession(&p);

        let line = stats.stat_line(home(1));
        assert_eq!((line.points, line.fgm, line.fga, line.tpm, line.tpa), (4, 1, 1, 1, 1));
        assert_eq!((line.ftm, line.fta), (1, 1));
        assert!(line.is_consistent());
        assert_eq!(stats.stat_line(home(0)).ast, 1);
        assert_eq!(stats.stat_line(away(1)).pf, 1);
    }

    #[test]
    fn test_fouled_miss_is_not_a_field_goal_attempt() {
        let mut stats = StatsCalculator::new(10, 10);
        let mut p = possession(PossessionOutcome::ShootingFoul, 1);
        p.shots.push(shot(home(4), ShotType::Rim, false, true));
        p.free_throws = Some(FreeThrowResult {
            shooter: home(4),
            probability: 0.6,
            results: vec![false, true],
            rebound: None,
        });
        stats.record_possession(&p);
        let line = stats.stat_line(home(4));
        assert_eq!((line.fga, line.fta, line.ftm, line.points), (0, 2, 1, 1));
    }

    #[test]
    fn test_block_and_rebound_credit() {
        let mut stats = StatsCalculator::new(10, 10);
        let mut p = possession(PossessionOutcome::MissedShot, 0);
        let mut s = shot(home(3), ShotType::Rim, false, false);
        s.blocked_by = Some(away(4));
        s.rebound = Some(ReboundEvent { rebounder: away(3), offensive: false, offensive_probability: 0.25 });
        p.shots.push(s);
        stats.record_possession(&p);
        assert_eq!(stats.stat_line(away(4)).blk, 1);
        assert_eq!(stats.stat_line(away(3)).dreb, 1);
        assert_eq!(stats.stat_line(home(3)).fga, 1);
    }

    #[test]
    fn test_finalize_rounds_minutes() {
        let config = EngineConfig::default();
        let mut state = GameState::new(balanced_team("H"), balanced_team("A"), &config);
        state.home.players[0].seconds_played = 2047.0;
        let stats = StatsCalculator::new(10, 10);
        let box_score = stats.finalize(&state);
        assert_eq!(box_score.home.players[0].minutes, 34.1);
        assert!(box_score.home.players[0].starter);
        assert!(!box_score.home.players[7].starter);
    }
}
