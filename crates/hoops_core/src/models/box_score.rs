use super::game_result::{FinalScore, QuarterResult};
use super::player::Position;
use super::team::TeamSide;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Counting stats shared by player and team rows.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema)]
pub struct StatLine {
    pub points: u16,
    pub fgm: u16,
    pub fga: u16,
    #[serde(rename = "3pm")]
    pub tpm: u16,
    #[serde(rename = "3pa")]
    pub tpa: u16,
    pub ftm: u16,
    pub fta: u16,
    pub oreb: u16,
    pub dreb: u16,
    pub ast: u16,
    pub tov: u16,
    pub stl: u16,
    pub blk: u16,
    pub pf: u16,
}

impl StatLine {
    pub fn rebounds(&self) -> u16 {
        self.oreb + self.dreb
    }

    /// Points implied by the shooting splits.
    pub fn points_from_shooting(&self) -> u16 {
        2 * (self.fgm.saturating_sub(self.tpm)) + 3 * self.tpm + self.ftm
    }

    pub fn is_consistent(&self) -> bool {
        self.points == self.points_from_shooting()
            && self.fgm <= self.fga
            && self.tpm <= self.tpa
            && self.tpm <= self.fgm
            && self.tpa <= self.fga
            && self.ftm <= self.fta
    }

    pub fn add(&mut self, other: &StatLine) {
        self.points += other.points;
        self.fgm += other.fgm;
        self.fga += other.fga;
        self.tpm += other.tpm;
        self.tpa += other.tpa;
        self.ftm += other.ftm;
        self.fta += other.fta;
        self.oreb += other.oreb;
        self.dreb += other.dreb;
        self.ast += other.ast;
        self.tov += other.tov;
        self.stl += other.stl;
        self.blk += other.blk;
        self.pf += other.pf;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct PlayerBoxScore {
    pub name: String,
    pub position: Position,
    pub starter: bool,
    #[serde(flatten)]
    pub stats: StatLine,
    pub seconds_played: f32,
    /// `seconds_played / 60`, rounded to one decimal
    pub minutes: f32,
    pub fouled_out: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct TeamBoxScore {
    pub name: String,
    pub players: Vec<PlayerBoxScore>,
    pub totals: StatLine,
}

impl TeamBoxScore {
    pub fn player(&self, name: &str) -> Option<&PlayerBoxScore> {
        self.players.iter().find(|p| p.name == name)
    }

    fn summed_players(&self) -> StatLine {
        let mut sum = StatLine::default();
        for p in &self.players {
            sum.add(&p.stats);
        }
        sum
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct BoxScore {
    pub home: TeamBoxScore,
    pub away: TeamBoxScore,
}

impl BoxScore {
    pub fn team(&self, side: TeamSide) -> &TeamBoxScore {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    /// Full reconciliation: every player row is internally consistent, team
    /// totals equal the sum of player rows, and the team points equal both
    /// the sum of period scores and the final score.
    pub fn reconciles(&self, quarters: &[QuarterResult], final_score: &FinalScore) -> bool {
        for side in TeamSide::BOTH {
            let team = self.team(side);
            if !team.players.iter().all(|p| p.stats.is_consistent()) {
                return false;
            }
            if team.summed_players() != team.totals || !team.totals.is_consistent() {
                return false;
            }
            let by_period: u16 = quarters.iter().map(|q| q.points(side)).sum();
            if by_period != team.totals.points || final_score.get(side) != team.totals.points {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(fgm: u16, fga: u16, tpm: u16, tpa: u16, ftm: u16, fta: u16) -> StatLine {
        StatLine {
            points: 2 * (fgm - tpm) + 3 * tpm + ftm,
            fgm,
            fga,
            tpm,
            tpa,
            ftm,
            fta,
            ..StatLine::default()
        }
    }

    fn team(name: &str, lines: &[StatLine]) -> TeamBoxScore {
        let players: Vec<PlayerBoxScore> = lines
            .iter()
            .enumerate()
            .map(|(i, s)| PlayerBoxScore {
                name: format!("{}{}", name, i),
                position: Position::SF,
                starter: i < 5,
                stats: *s,
                seconds_played: 0.0,
                minutes: 0.0,
                fouled_out: false,
            })
            .collect();
        let mut totals = StatLine::default();
        lines.iter().for_each(|s| totals.add(s));
        TeamBoxScore { name: name.to_string(), players, totals }
    }

    #[test]
    fn test_points_formula() {
        let s = line(10, 20, 3, 8, 5, 6);
        assert_eq!(s.points, 28);
        assert!(s.is_consistent());
        assert!(!StatLine { points: 27, ..s }.is_consistent());
    }

    #[test]
    fn test_reconciles() {
        let home = team("H", &[line(4, 9, 1, 3, 2, 2), line(3, 5, 0, 0, 0, 0)]);
        let away = team("A", &[line(5, 10, 2, 4, 1, 2)]);
        let box_score = BoxScore { home, away };

        let quarters = vec![
            QuarterResult { period: 1, home_points: 10, away_points: 6, possessions: 20 },
            QuarterResult { period: 2, home_points: 7, away_points: 7, possessions: 20 },
        ];
        let final_score = FinalScore { home: 17, away: 13 };
        assert!(box_score.reconciles(&quarters, &final_score));

        let wrong = FinalScore { home: 18, away: 13 };
        assert!(!box_score.reconciles(&quarters, &wrong));
    }

    #[test]
    fn test_three_point_keys() {
        let json = serde_json::to_value(line(1, 1, 1, 1, 0, 0)).unwrap();
        assert_eq!(json["3pm"], 1);
        assert_eq!(json["points"], 3);
    }
}
