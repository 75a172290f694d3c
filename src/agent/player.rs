//! Anything that can play an episode one percept at a time
//!
//! The trial runner drives a [`Player`] without knowing whether it reasons
//! about the cave or just rolls dice.

use crate::agent::session::AgentSession;
use crate::agent::snapshot::TurnSnapshot;
use crate::core::error::Result;
use crate::core::types::{Action, Outcome, Percept};

/// One action, plus the full trace when the player keeps one
#[derive(Debug, Clone)]
pub struct PlayerTurn {
    pub action: Action,
    pub snapshot: Option<TurnSnapshot>,
}

/// Trait for swappable episode players
pub trait Player {
    /// Consume one percept and choose the next action
    fn take_turn(&mut self, percept: &Percept) -> Result<PlayerTurn>;

    /// The simulator reports the last action was fatal
    fn record_death(&mut self);

    /// End the episode without climbing
    fn give_up(&mut self);

    /// Actions emitted so far
    fn turn(&self) -> u32;

    fn score(&self) -> i64;

    fn outcome(&self) -> Option<Outcome>;
}

impl Player for AgentSession {
    fn take_turn(&mut self, percept: &Percept) -> Result<PlayerTurn> {
        let snapshot = self.step(percept)?;
        Ok(PlayerTurn {
            action: snapshot.action,
            snapshot: Some(snapshot),
        })
    }

    fn record_death(&mut self) {
        AgentSession::record_death(self)
    }

    fn give_up(&mut self) {
        AgentSession::give_up(self)
    }

    fn turn(&self) -> u32 {
        AgentSession::turn(self)
    }

    fn score(&self) -> i64 {
        AgentSession::score(self)
    }

    fn outcome(&self) -> Option<Outcome> {
        AgentSession::outcome(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::AgentConfig;

    #[test]
    fn test_session_plays_through_trait() {
        let mut session = AgentSession::new(AgentConfig::for_grid(4, 0)).unwrap();
        let player: &mut dyn Player = &mut session;

        let turn = player.take_turn(&Percept::quiet()).unwrap();
        assert_eq!(turn.action, Action::MoveForward);
        assert_eq!(turn.snapshot.map(|s| s.turn), Some(1));
        assert_eq!(player.turn(), 1);

        player.give_up();
        assert_eq!(player.outcome(), Some(Outcome::GaveUp));
    }
}
