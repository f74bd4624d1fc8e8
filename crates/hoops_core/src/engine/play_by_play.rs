//! Play-by-play writer.
//!
//! Every entry is stamped with the period, the game clock and the running
//! score after the play. Lines for one possession share the clock at which
//! the possession ended.

use super::clock::format_clock;
use super::game_state::GameState;
use crate::models::{
    FoulKind, PlayByPlayEntry, PlayKind, PlayerRef, PossessionResult, ShotAttempt, ShotType,
    SubstitutionEvent, TeamSide, TimeoutEvent, TimeoutReason, TurnoverType,
};

#[derive(Debug, Clone, Default)]
pub struct PlayByPlayWriter {
    entries: Vec<PlayByPlayEntry>,
    home: u16,
    away: u16,
}

fn shot_phrase(shot: &ShotAttempt) -> &'static str {
    if shot.is_putback {
        return "putback";
    }
    match shot.shot_type {
        ShotType::ThreePoint => "three-pointer",
        ShotType::Midrange => "mid-range jumper",
        ShotType::Rim => "layup",
    }
}

fn turnover_phrase(kind: TurnoverType) -> &'static str {
    match kind {
        TurnoverType::BadPass => "bad pass",
        TurnoverType::LostBall => "lost ball",
        TurnoverType::OffensiveFoul => "offensive foul",
        TurnoverType::Violation => "violation",
    }
}

impl PlayByPlayWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[PlayByPlayEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PlayByPlayEntry> {
        self.entries
    }

    fn push(&mut self, period: u8, clock: f32, kind: PlayKind, team: Option<TeamSide>, text: String) {
        self.entries.push(PlayByPlayEntry {
            period,
            clock: format_clock(clock),
            kind,
            team,
            text,
            home_score: self.home,
            away_score: self.away,
        });
    }

    fn score(&mut self, side: TeamSide, points: u8) {
        match side {
            TeamSide::Home => self.home += u16::from(points),
            TeamSide::Away => self.away += u16::from(points),
        }
    }

    pub fn period_start(&mut self, period: u8, clock: f32, state: &GameState, offense: TeamSide) {
        let team = &state.team(offense).team.name;
        self.push(period, clock, PlayKind::PeriodStart, Some(offense), format!("Start of period, {} ball", team));
    }

    pub fn jump_ball(&mut self, period: u8, clock: f32, state: &GameState, winner: PlayerRef, loser: PlayerRef) {
        let text = format!(
            "Jump ball: {} vs {}, {} wins the tip",
            state.player_name(winner),
            state.player_name(loser),
            state.team(winner.side).team.name
        );
        self.push(period, clock, PlayKind::JumpBall, Some(winner.side), text);
    }

    pub fn possession(&mut self, result: &PossessionResult, state: &GameState) {
        let period = result.period;
        let clock = (result.start_clock - result.elapsed).max(0.0);
        let name = |p: PlayerRef| state.player_name(p).to_string();

        let mut foul_written = false;
        if let Some(turnover) = &result.turnover {
            let text = format!("{} turnover ({})", name(turnover.committed_by), turnover_phrase(turnover.kind));
            self.push(period, clock, PlayKind::Turnover, Some(result.offense), text);
            if turnover.kind == TurnoverType::OffensiveFoul {
                self.write_foul(result, state, clock);
                foul_written = true;
            }
            if let Some(thief) = turnover.stolen_by {
                self.push(period, clock, PlayKind::Steal, Some(thief.side), format!("{} steal", name(thief)));
            }
        }

        for shot in &result.shots {
            if shot.made {
                self.score(result.offense, shot.shot_type.points());
                let assist = shot.assist.map(|a| format!(" (assist {})", name(a))).unwrap_or_default();
                let text = format!("{} makes {}{}", name(shot.shooter), shot_phrase(shot), assist);
                self.push(period, clock, PlayKind::MadeShot, Some(result.offense), text);
            } else {
                let text = format!("{} misses {}", name(shot.shooter), shot_phrase(shot));
                self.push(period, clock, PlayKind::MissedShot, Some(result.offense), text);
            }
            if let Some(blocker) = shot.blocked_by {
                self.push(period, clock, PlayKind::Block, Some(blocker.side), format!("{} block", name(blocker)));
            }
            if shot.fouled {
                self.write_foul(result, state, clock);
                foul_written = true;
            }
            if let Some(rebound) = &shot.rebound {
                let kind = if rebound.offensive { "offensive" } else { "defensive" };
                let text = format!("{} {} rebound", name(rebound.rebounder), kind);
                self.push(period, clock, PlayKind::Rebound, Some(rebound.rebounder.side), text);
            }
        }

        if !foul_written {
            self.write_foul(result, state, clock);
        }

        if let Some(trip) = &result.free_throws {
            let total = trip.attempts();
            for (i, made) in trip.results.iter().enumerate() {
                if *made {
                    self.score(result.offense, 1);
                }
                let verb = if *made { "makes" } else { "misses" };
                let text = format!("{} {} free throw {} of {}", name(trip.shooter), verb, i + 1, total);
                self.push(period, clock, PlayKind::FreeThrow, Some(result.offense), text);
            }
            if let Some(rebound) = &trip.rebound {
                let kind = if rebound.offensive { "offensive" } else { "defensive" };
                let text = format!("{} {} rebound", name(rebound.rebounder), kind);
                self.push(period, clock, PlayKind::Rebound, Some(rebound.rebounder.side), text);
            }
        }
    }

    fn write_foul(&mut self, result: &PossessionResult, state: &GameState, clock: f32) {
        let Some(foul) = &result.foul else {
            return;
        };
        let label = match (foul.kind, foul.intentional) {
            (FoulKind::Shooting, _) => "shooting foul",
            (FoulKind::NonShooting, true) => "intentional foul",
            (FoulKind::NonShooting, false) => "personal foul",
            (FoulKind::Offensive, _) => "offensive foul",
        };
        let mut text = format!(
            "{} {} on {} (P{}, T{})",
            state.player_name(foul.committed_by),
            label,
            state.player_name(foul.fouled),
            foul.personal_fouls,
            foul.team_fouls
        );
        if foul.fouled_out {
            text.push_str(", fouled out");
        }
        self.push(result.period, clock, PlayKind::Foul, Some(foul.committed_by.side), text);
    }

    pub fn timeout(&mut self, event: &TimeoutEvent, state: &GameState) {
        let why = match &event.reason {
            TimeoutReason::Momentum { run } => format!("{}-0 run", run),
            TimeoutReason::PlayDesign => "draw up a play".to_string(),
            TimeoutReason::ClockStop => "stop the clock".to_string(),
        };
        let text = format!(
            "{} timeout ({}), {} left",
            state.team(event.side).team.name,
            why,
            event.remaining
        );
        self.push(event.period, event.game_clock, PlayKind::Timeout, Some(event.side), text);
    }

    pub fn substitution(&mut self, event: &SubstitutionEvent) {
        let text = format!("{} in for {}", event.player_in_name, event.player_out_name);
        self.push(event.period, event.game_clock, PlayKind::Substitution, Some(event.side), text);
    }

    pub fn period_end(&mut self, period: u8) {
        self.push(period, 0.0, PlayKind::PeriodEnd, None, "End of period".to_string());
    }

    pub fn game_end(&mut self, period: u8, state: &GameState) {
        let text = format!(
            "Final: {} {}, {} {}",
            state.home.team.name, state.home.score, state.away.team.name, state.away.score
        );
        self.push(period, 0.0, PlayKind::GameEnd, None, text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::EngineConfig;
    use crate::models::{ContestLevel, PossessionOutcome, PossessionTrace};
    use crate::test_support::balanced_team;

    fn made_three() -> PossessionResult {
        PossessionResult {
            period: 2,
            offense: TeamSide::Away,
            outcome: PossessionOutcome::MadeShot,
            points: 3,
            start_clock: 300.0,
            elapsed: 14.2,
            shots: vec![ShotAttempt {
                shooter: PlayerRef::new(TeamSide::Away, 1),
                defender: PlayerRef::new(TeamSide::Home, 1),
                shot_type: ShotType::ThreePoint,
                contest_distance: 7.0,
                contest: ContestLevel::WideOpen,
                probability: 0.38,
                made: true,
                blocked_by: None,
                fouled: false,
                is_putback: false,
                assist: Some(PlayerRef::new(TeamSide::Away, 0)),
                rebound: None,
            }],
            turnover: None,
            foul: None,
            free_throws: None,
            offense_lineup: vec![0, 1, 2, 3, 4],
            defense_lineup: vec![0, 1, 2, 3, 4],
            substitutions: Vec::new(),
            next_offense: TeamSide::Home,
            next_is_transition: false,
            next_shot_clock: 24.0,
            trace: PossessionTrace::new(false, 24.0),
        }
    }

    #[test]
    fn test_made_shot_line() {
        let state = GameState::new(balanced_team("H"), balanced_team("A"), &EngineConfig::default());
        let mut w = PlayByPlayWriter::new();
        w.possession(&made_three(), &state);
        let entry = &w.entries()[0];
        assert_eq!(entry.kind, PlayKind::MadeShot);
        assert_eq!(entry.away_score, 3);
        assert_eq!(entry.line(), "Q2 4:46 [0-3] A1 makes three-pointer (assist A0)");
    }

    #[test]
    fn test_period_markers() {
        let state = GameState::new(balanced_team("H"), balanced_team("A"), &EngineConfig::default());
        let mut w = PlayByPlayWriter::new();
        w.period_start(5, 300.0, &state, TeamSide::Home);
        w.period_end(5);
        let lines: Vec<String> = w.entries().iter().map(|e| e.line()).collect();
        assert_eq!(lines[0], "OT1 5:00 [0-0] Start of period, H ball");
        assert_eq!(lines[1], "OT1 0:00 [0-0] End of period");
    }
}
