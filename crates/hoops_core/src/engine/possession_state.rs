//! Possession State Machine
//!
//! Sole authority on who has the ball and whether the ball is live. Timeout
//! and substitution legality are answered here and nowhere else.
//!
//! ## Transitions
//! | Event                          | Next state                 | Possession |
//! |--------------------------------|----------------------------|------------|
//! | possession start               | LiveBall                   | offense    |
//! | made basket / made final FT    | DeadBallNoSubs             | flips      |
//! | defensive rebound              | LiveBall                   | rebounder  |
//! | offensive rebound              | LiveBall                   | same       |
//! | live-ball steal                | LiveBall                   | stealer    |
//! | dead-ball turnover             | DeadBallSubsAllowed        | flips      |
//! | any foul / timeout / missed FT | DeadBallSubsAllowed        | same       |

use crate::error::StateError;
use crate::models::TeamSide;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, JsonSchema)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BallState {
    LiveBall,
    DeadBallSubsAllowed,
    DeadBallNoSubs,
}

impl BallState {
    pub fn is_dead(&self) -> bool {
        !matches!(self, BallState::LiveBall)
    }
}

impl fmt::Display for BallState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            BallState::LiveBall => "live",
            BallState::DeadBallSubsAllowed => "dead (substitutions allowed)",
            BallState::DeadBallNoSubs => "dead (no substitutions)",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
pub struct PossessionState {
    possessing: TeamSide,
    ball_state: BallState,
}

impl PossessionState {
    pub fn new(possessing: TeamSide) -> Self {
        Self { possessing, ball_state: BallState::LiveBall }
    }

    pub fn possessing(&self) -> TeamSide {
        self.possessing
    }

    pub fn ball_state(&self) -> BallState {
        self.ball_state
    }

    fn transition(&mut self, possessing: TeamSide, ball_state: BallState, event: &str) {
        log::trace!(
            "possession: {} -> {} ball {} ({})",
            self.possessing,
            possessing,
            ball_state,
            event
        );
        self.possessing = possessing;
        self.ball_state = ball_state;
    }

    /// Every period opens with a live ball for `team`.
    pub fn start_period(&mut self, team: TeamSide) {
        self.transition(team, BallState::LiveBall, "period start");
    }

    /// Each possession opens with a live ball for the offense.
    pub fn start_possession(&mut self, team: TeamSide) {
        self.transition(team, BallState::LiveBall, "possession start");
    }

    pub fn can_call_timeout(&self, team: TeamSide) -> bool {
        match self.ball_state {
            BallState::LiveBall => team == self.possessing,
            BallState::DeadBallSubsAllowed | BallState::DeadBallNoSubs => true,
        }
    }

    pub fn can_substitute(&self) -> bool {
        self.ball_state == BallState::DeadBallSubsAllowed
    }

    pub fn ensure_substitution_allowed(&self) -> Result<(), StateError> {
        if self.can_substitute() {
            Ok(())
        } else {
            Err(StateError::IllegalSubstitution { state: self.ball_state })
        }
    }

    /// Made field goal or made final free throw.
    pub fn on_made_basket(&mut self) {
        let next = self.possessing.opponent();
        self.transition(next, BallState::DeadBallNoSubs, "made basket");
    }

    pub fn on_defensive_rebound(&mut self, rebounder: TeamSide) {
        self.transition(rebounder, BallState::LiveBall, "defensive rebound");
    }

    pub fn on_offensive_rebound(&mut self) {
        let same = self.possessing;
        self.transition(same, BallState::LiveBall, "offensive rebound");
    }

    /// Dead-ball turnover: ball goes the other way out of bounds.
    pub fn on_turnover(&mut self) {
        let next = self.possessing.opponent();
        self.transition(next, BallState::DeadBallSubsAllowed, "turnover");
    }

    pub fn on_steal(&mut self) {
        let next = self.possessing.opponent();
        self.transition(next, BallState::LiveBall, "steal");
    }

    /// Loose ball recovered by the defense without a steal credit.
    pub fn on_live_ball_turnover(&mut self) {
        let next = self.possessing.opponent();
        self.transition(next, BallState::LiveBall, "live-ball turnover");
    }

    /// Whistle on either team. Possession is unchanged; free throws or the
    /// side-out follow.
    pub fn on_foul(&mut self) {
        let same = self.possessing;
        self.transition(same, BallState::DeadBallSubsAllowed, "foul");
    }

    /// Missed final free throw; the rebound transition follows.
    pub fn on_missed_final_ft(&mut self) {
        let same = self.possessing;
        self.transition(same, BallState::DeadBallSubsAllowed, "missed final free throw");
    }

    /// Legal timeouts move to a dead ball with substitutions allowed. An
    /// illegal request returns an error and leaves the state untouched.
    pub fn on_timeout(&mut self, team: TeamSide) -> Result<(), StateError> {
        if !self.can_call_timeout(team) {
            return Err(StateError::IllegalTimeout {
                team,
                state: self.ball_state,
                possessing: self.possessing,
            });
        }
        let same = self.possessing;
        self.transition(same, BallState::DeadBallSubsAllowed, "timeout");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_period_starts_live() {
        let mut s = PossessionState::new(TeamSide::Away);
        s.on_made_basket();
        s.start_period(TeamSide::Home);
        assert_eq!(s.possessing(), TeamSide::Home);
        assert_eq!(s.ball_state(), BallState::LiveBall);
    }

    #[test]
    fn test_possession_start_clears_dead_ball() {
        let mut s = PossessionState::new(TeamSide::Home);
        s.on_foul();
        s.start_possession(TeamSide::Away);
        assert_eq!((s.possessing(), s.ball_state()), (TeamSide::Away, BallState::LiveBall));
        assert!(!s.can_call_timeout(TeamSide::Home));
    }

    #[test]
    fn test_made_basket_flips_without_subs() {
        let mut s = PossessionState::new(TeamSide::Home);
        s.on_made_basket();
        assert_eq!(s.possessing(), TeamSide::Away);
        assert_eq!(s.ball_state(), BallState::DeadBallNoSubs);
        assert!(!s.can_substitute());
        assert!(s.ensure_substitution_allowed().is_err());
        assert!(s.can_call_timeout(TeamSide::Home));
    }

    #[test]
    fn test_rebounds_keep_ball_live() {
        let mut s = PossessionState::new(TeamSide::Home);
        s.on_offensive_rebound();
        assert_eq!((s.possessing(), s.ball_state()), (TeamSide::Home, BallState::LiveBall));
        s.on_defensive_rebound(TeamSide::Away);
        assert_eq!((s.possessing(), s.ball_state()), (TeamSide::Away, BallState::LiveBall));
    }

    #[test]
    fn test_turnovers_and_fouls() {
        let mut s = PossessionState::new(TeamSide::Home);
        s.on_turnover();
        assert_eq!(s.possessing(), TeamSide::Away);
        assert!(s.can_substitute());

        s.on_steal();
        assert_eq!((s.possessing(), s.ball_state()), (TeamSide::Home, BallState::LiveBall));

        s.on_live_ball_turnover();
        assert_eq!((s.possessing(), s.ball_state()), (TeamSide::Away, BallState::LiveBall));
        s.on_steal();

        s.on_foul();
        assert_eq!(s.possessing(), TeamSide::Home);
        assert!(s.can_substitute());
    }

    #[test]
    fn test_illegal_timeout_does_not_mutate() {
        let mut s = PossessionState::new(TeamSide::Home);
        let before = s;
        let err = s.on_timeout(TeamSide::Away).unwrap_err();
        assert!(matches!(err, StateError::IllegalTimeout { team: TeamSide::Away, .. }));
        assert_eq!(s, before);

        s.on_timeout(TeamSide::Home).unwrap();
        assert_eq!(s.ball_state(), BallState::DeadBallSubsAllowed);
    }

    #[test]
    fn test_dead_ball_timeouts_open_to_both() {
        for state in BallState::iter().filter(|b| b.is_dead()) {
            let s = PossessionState { possessing: TeamSide::Home, ball_state: state };
            for side in TeamSide::BOTH {
                assert!(s.can_call_timeout(side));
            }
        }
    }
}
