//! Random baseline player
//!
//! Keeps no beliefs. It grabs on glitter, climbs when home with the gold, and
//! otherwise rolls a weighted die that favours walking into unvisited cells.
//! With the gold it leans toward turns that face home.

use ahash::AHashSet;
use rand::distributions::{Distribution, WeightedIndex};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::agent::player::{Player, PlayerTurn};
use crate::agent::session::action_score;
use crate::core::constants::SCORE_DEATH;
use crate::core::error::{AgentError, Result};
use crate::core::types::{Action, Coord, Direction, Outcome, Percept, Pose};

const TURN_WEIGHT: f64 = 1.0;
const SHOOT_WEIGHT: f64 = 0.1;
const FRESH_MOVE_WEIGHT: f64 = 5.0;
const STALE_MOVE_WEIGHT: f64 = 1.0;
/// Turn that faces home directly
const HOMEWARD_TURN_WEIGHT: f64 = 10.0;
/// Either turn works when home is behind
const ABOUT_TURN_WEIGHT: f64 = 5.0;

pub struct RandomPlayer {
    grid_size: u32,
    rng: ChaCha8Rng,
    pose: Pose,
    entry: Coord,
    visited: AHashSet<Coord>,
    has_gold: bool,
    has_arrow: bool,
    turn: u32,
    score: i64,
    last_action: Option<Action>,
    outcome: Option<Outcome>,
}

impl RandomPlayer {
    pub fn new(grid_size: u32, seed: u64) -> Result<Self> {
        if grid_size == 0 {
            return Err(AgentError::InvalidConfig("grid_size must be positive".into()));
        }
        let entry = Coord::new(0, 0);
        let mut visited = AHashSet::new();
        visited.insert(entry);
        Ok(Self {
            grid_size,
            rng: ChaCha8Rng::seed_from_u64(seed),
            pose: Pose::new(entry, Direction::default()),
            entry,
            visited,
            has_gold: false,
            has_arrow: true,
            turn: 0,
            score: 0,
            last_action: None,
            outcome: None,
        })
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn has_gold(&self) -> bool {
        self.has_gold
    }

    fn in_bounds(&self, c: Coord) -> bool {
        let side = self.grid_size as i64;
        (0..side).contains(&(c.x as i64)) && (0..side).contains(&(c.y as i64))
    }

    /// Dead-reckon the previous action
    fn apply_last_action(&mut self, percept: &Percept) {
        match self.last_action {
            Some(Action::MoveForward) if !percept.bump => {
                let next = self.pose.position.step(self.pose.facing);
                if self.in_bounds(next) {
                    self.pose.position = next;
                    self.visited.insert(next);
                }
            }
            Some(Action::TurnLeft) => self.pose.facing = self.pose.facing.left(),
            Some(Action::TurnRight) => self.pose.facing = self.pose.facing.right(),
            Some(Action::Grab) => self.has_gold = true,
            Some(Action::Shoot) => self.has_arrow = false,
            _ => {}
        }
    }

    fn choose(&mut self, percept: &Percept) -> Action {
        if percept.glitter && !self.has_gold {
            return Action::Grab;
        }
        if self.has_gold && self.pose.position == self.entry {
            return Action::Climb;
        }

        let mut options = vec![
            (Action::TurnLeft, TURN_WEIGHT),
            (Action::TurnRight, TURN_WEIGHT),
        ];
        if self.has_arrow {
            options.push((Action::Shoot, SHOOT_WEIGHT));
        }
        let ahead = self.pose.position.step(self.pose.facing);
        if self.in_bounds(ahead) {
            let weight = if self.visited.contains(&ahead) {
                STALE_MOVE_WEIGHT
            } else {
                FRESH_MOVE_WEIGHT
            };
            options.push((Action::MoveForward, weight));
        }
        if self.has_gold {
            self.lean_home(&mut options);
        }

        WeightedIndex::new(options.iter().map(|(_, w)| *w))
            .map(|dist| options[dist.sample(&mut self.rng)].0)
            .unwrap_or(Action::TurnRight)
    }

    /// Boost whichever turn heads west, then south, toward the entry
    fn lean_home(&self, options: &mut [(Action, f64)]) {
        let Coord { x, y } = self.pose.position;
        let facing = self.pose.facing;
        let (left, right) = if x > 0 && facing != Direction::West {
            match facing {
                Direction::North => (HOMEWARD_TURN_WEIGHT, TURN_WEIGHT),
                Direction::South => (TURN_WEIGHT, HOMEWARD_TURN_WEIGHT),
                _ => (ABOUT_TURN_WEIGHT, ABOUT_TURN_WEIGHT),
            }
        } else if y > 0 && facing != Direction::South {
            match facing {
                Direction::East => (TURN_WEIGHT, HOMEWARD_TURN_WEIGHT),
                Direction::West => (HOMEWARD_TURN_WEIGHT, TURN_WEIGHT),
                _ => (ABOUT_TURN_WEIGHT, ABOUT_TURN_WEIGHT),
            }
        } else {
            return;
        };
        for (action, weight) in options.iter_mut() {
            match action {
                Action::TurnLeft => *weight = left,
                Action::TurnRight => *weight = right,
                _ => {}
            }
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        info!(?outcome, score = self.score, turns = self.turn, "baseline finished");
    }
}

impl Player for RandomPlayer {
    fn take_turn(&mut self, percept: &Percept) -> Result<PlayerTurn> {
        if self.outcome.is_some() {
            return Err(AgentError::SessionFinished);
        }
        self.apply_last_action(percept);

        let action = self.choose(percept);
        self.turn += 1;
        self.score += action_score(action, self.has_gold);
        self.last_action = Some(action);
        debug!(turn = self.turn, position = %self.pose.position, ?action, "baseline action");

        if action == Action::Climb {
            self.finish(Outcome::Won);
        }
        Ok(PlayerTurn {
            action,
            snapshot: None,
        })
    }

    fn record_death(&mut self) {
        if self.outcome.is_none() {
            self.score += SCORE_DEATH;
            self.finish(Outcome::Died);
        }
    }

    fn give_up(&mut self) {
        if self.outcome.is_none() {
            self.finish(Outcome::GaveUp);
        }
    }

    fn turn(&self) -> u32 {
        self.turn
    }

    fn score(&self) -> i64 {
        self.score
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}
