//! Reference simulator holding the ground truth
//!
//! The environment is the only place that knows where things are. It hands
//! out percepts and applies actions; the agent never reads its state.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::agent::action_score;
use crate::core::constants::{DEFAULT_ARROWS, DEFAULT_WUMPUS_MOVE_INTERVAL, SCORE_DEATH};
use crate::core::error::{AgentError, Result};
use crate::core::types::{Action, Coord, Direction, Outcome, Percept, Pose};
use crate::world::map::WorldMap;

/// What one action did to the world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepResult {
    pub action: Action,
    pub score_delta: i64,
    /// Wumpus killed by this action's arrow
    pub killed: Option<Coord>,
    /// Wumpuses wandered after this action
    pub wumpuses_moved: bool,
    /// Set when this action ended the game
    pub outcome: Option<Outcome>,
}

/// Live game state for one map
#[derive(Debug, Clone)]
pub struct Environment {
    map: WorldMap,
    wumpuses: Vec<Coord>,
    gold: Option<Coord>,
    agent: Pose,
    has_gold: bool,
    arrows: u32,
    score: i64,
    actions: u32,
    move_interval: Option<u32>,
    scream_pending: bool,
    bump_pending: bool,
    outcome: Option<Outcome>,
    rng: ChaCha8Rng,
}

impl Environment {
    /// Start a game on `map`; `seed` drives wumpus wandering
    pub fn new(map: WorldMap, seed: u64) -> Result<Self> {
        map.validate()?;
        let move_interval = map.moving.then_some(DEFAULT_WUMPUS_MOVE_INTERVAL);
        Ok(Self {
            wumpuses: map.wumpuses.clone(),
            gold: Some(map.gold),
            agent: Pose::new(map.entry(), Direction::East),
            has_gold: false,
            arrows: DEFAULT_ARROWS,
            score: 0,
            actions: 0,
            move_interval,
            scream_pending: false,
            bump_pending: false,
            outcome: None,
            rng: ChaCha8Rng::seed_from_u64(seed),
            map,
        })
    }

    pub fn with_move_interval(mut self, interval: u32) -> Self {
        self.move_interval = (interval > 0).then_some(interval);
        self
    }

    pub fn map(&self) -> &WorldMap {
        &self.map
    }

    pub fn agent(&self) -> Pose {
        self.agent
    }

    pub fn wumpuses(&self) -> &[Coord] {
        &self.wumpuses
    }

    pub fn score(&self) -> i64 {
        self.score
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    /// Percepts at the agent's cell. Scream and bump are delivered once.
    pub fn percept(&mut self) -> Percept {
        let here = self.agent.position;
        let mut percept = Percept {
            glitter: self.gold == Some(here),
            bump: std::mem::take(&mut self.bump_pending),
            scream: std::mem::take(&mut self.scream_pending),
            position: Some(here),
            facing: Some(self.agent.facing),
            ..Percept::default()
        };
        for n in here.adjacent() {
            if !self.map.in_bounds(n) {
                continue;
            }
            percept.breeze |= self.map.has_pit(n);
            percept.stench |= self.wumpuses.contains(&n);
        }
        percept
    }

    /// Apply one agent action
    pub fn apply(&mut self, action: Action) -> Result<StepResult> {
        if self.is_finished() {
            return Err(AgentError::SessionFinished);
        }

        let mut result = StepResult {
            action,
            score_delta: 0,
            killed: None,
            wumpuses_moved: false,
            outcome: None,
        };

        match action {
            Action::MoveForward => {
                result.score_delta = action_score(action, self.has_gold);
                let next = self.agent.position.step(self.agent.facing);
                if self.map.in_bounds(next) {
                    self.agent.position = next;
                } else {
                    self.bump_pending = true;
                }
            }
            Action::TurnLeft => {
                result.score_delta = action_score(action, self.has_gold);
                self.agent.facing = self.agent.facing.left();
            }
            Action::TurnRight => {
                result.score_delta = action_score(action, self.has_gold);
                self.agent.facing = self.agent.facing.right();
            }
            Action::Grab => {
                if self.gold == Some(self.agent.position) {
                    self.gold = None;
                    self.has_gold = true;
                    result.score_delta = action_score(action, false);
                }
            }
            Action::Shoot => {
                result.score_delta = action_score(action, self.has_gold);
                if self.arrows > 0 {
                    self.arrows -= 1;
                    result.killed = self.fire_arrow();
                }
            }
            Action::Climb => {
                if self.agent.position == self.map.entry() {
                    result.score_delta = action_score(action, self.has_gold);
                    let outcome = if self.has_gold {
                        Outcome::Won
                    } else {
                        Outcome::GaveUp
                    };
                    result.outcome = Some(outcome);
                }
            }
        }

        self.score += result.score_delta;
        if let Some(outcome) = result.outcome {
            self.outcome = Some(outcome);
            info!(?outcome, score = self.score, "game over");
            return Ok(result);
        }

        if self.agent_dies() {
            self.die(&mut result);
            return Ok(result);
        }

        self.actions += 1;
        if let Some(interval) = self.move_interval {
            if self.actions % interval == 0 {
                result.wumpuses_moved = true;
                self.move_wumpuses();
                if self.wumpuses.contains(&self.agent.position) {
                    self.die(&mut result);
                }
            }
        }
        Ok(result)
    }

    fn agent_dies(&self) -> bool {
        let here = self.agent.position;
        self.map.has_pit(here) || self.wumpuses.contains(&here)
    }

    fn die(&mut self, result: &mut StepResult) {
        result.score_delta += SCORE_DEATH;
        self.score += SCORE_DEATH;
        result.outcome = Some(Outcome::Died);
        self.outcome = Some(Outcome::Died);
        info!(position = %self.agent.position, score = self.score, "agent died");
    }

    /// The arrow flies from the agent's cell and kills the first wumpus it meets
    fn fire_arrow(&mut self) -> Option<Coord> {
        let direction = self.agent.facing;
        let mut current = self.agent.position;
        while self.map.in_bounds(current) {
            if let Some(idx) = self.wumpuses.iter().position(|w| *w == current) {
                self.wumpuses.remove(idx);
                self.scream_pending = true;
                info!(coord = %current, "wumpus killed");
                return Some(current);
            }
            current = current.step(direction);
        }
        None
    }

    /// Every wumpus steps to a random free neighbor, in placement order
    fn move_wumpuses(&mut self) {
        for i in 0..self.wumpuses.len() {
            let from = self.wumpuses[i];
            let options: Vec<Coord> = from
                .adjacent()
                .into_iter()
                .filter(|c| self.map.in_bounds(*c))
                .filter(|c| !self.map.has_pit(*c))
                .filter(|c| !self.wumpuses.contains(c))
                .collect();
            if let Some(to) = options.choose(&mut self.rng).copied() {
                self.wumpuses[i] = to;
                debug!(from = %from, to = %to, "wumpus moved");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> WorldMap {
        WorldMap::new(
            4,
            vec![Coord::new(3, 0)],
            vec![Coord::new(1, 2)],
            Coord::new(0, 3),
        )
    }

    #[test]
    fn test_initial_percept() {
        let mut env = Environment::new(corridor(), 0).unwrap();
        let p = env.percept();
        assert!(!p.breeze && !p.stench && !p.glitter);
        assert_eq!(p.position, Some(Coord::new(0, 0)));
        assert_eq!(p.facing, Some(Direction::East));
    }

    #[test]
    fn test_bump_is_reported_once() {
        let mut env = Environment::new(corridor(), 0).unwrap();
        env.apply(Action::TurnRight).unwrap();
        env.apply(Action::MoveForward).unwrap();
        assert!(env.percept().bump);
        assert!(!env.percept().bump);
        assert_eq!(env.agent().position, Coord::new(0, 0));
    }

    #[test]
    fn test_arrow_kills_first_wumpus() {
        let mut env = Environment::new(corridor(), 0).unwrap();
        let result = env.apply(Action::Shoot).unwrap();
        assert_eq!(result.killed, Some(Coord::new(3, 0)));
        assert!(env.percept().scream);
        assert!(!env.percept().scream);
        assert!(env.wumpuses().is_empty());
    }

    #[test]
    fn test_walking_into_wumpus_kills() {
        let mut env = Environment::new(corridor(), 0).unwrap();
        env.apply(Action::MoveForward).unwrap();
        env.apply(Action::MoveForward).unwrap();
        assert!(env.percept().stench);
        let result = env.apply(Action::MoveForward).unwrap();
        assert_eq!(result.outcome, Some(Outcome::Died));
        assert!(env.apply(Action::TurnLeft).is_err());
    }

    #[test]
    fn test_climb_without_gold_gives_up() {
        let mut env = Environment::new(corridor(), 0).unwrap();
        let result = env.apply(Action::Climb).unwrap();
        assert_eq!(result.outcome, Some(Outcome::GaveUp));
        assert_eq!(env.score(), 0);
    }

    #[test]
    fn test_wumpuses_wander_on_interval() {
        let map = corridor().with_moving(true);
        let mut env = Environment::new(map, 3).unwrap().with_move_interval(2);
        let first = env.apply(Action::TurnLeft).unwrap();
        assert!(!first.wumpuses_moved);
        let second = env.apply(Action::TurnRight).unwrap();
        assert!(second.wumpuses_moved);

        let w = env.wumpuses()[0];
        assert_eq!(w.manhattan(&Coord::new(3, 0)), 1);
        assert!(!env.map().has_pit(w));
    }
}
