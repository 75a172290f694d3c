//! One agent, one episode
//!
//! The session owns the belief store and the planner memo. Each call to
//! [`AgentSession::step`] consumes one percept and emits one action.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::agent::snapshot::TurnSnapshot;
use crate::core::config::AgentConfig;
use crate::core::constants::*;
use crate::core::error::{AgentError, Result};
use crate::core::types::{Action, Coord, Outcome, Percept, Pose, SessionId};
use crate::inference::{observe, Observation, ShotRecord};
use crate::knowledge::{BeliefStore, Signals};
use crate::navigation::PathPlanner;
use crate::policy::{decide, PolicyContext};

/// Where the agent is and what it has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentState {
    pub pose: Pose,
    pub has_gold: bool,
    pub alive: bool,
    pub score: i64,
}

impl Default for AgentState {
    fn default() -> Self {
        Self {
            pose: Pose::new(Coord::new(0, 0), Default::default()),
            has_gold: false,
            alive: true,
            score: 0,
        }
    }
}

/// Score change for emitting `action`
pub fn action_score(action: Action, has_gold: bool) -> i64 {
    match action {
        Action::MoveForward => SCORE_MOVE,
        Action::TurnLeft | Action::TurnRight => SCORE_TURN,
        Action::Shoot => SCORE_SHOOT,
        Action::Grab => SCORE_GRAB_GOLD,
        Action::Climb if has_gold => SCORE_CLIMB_WITH_GOLD,
        Action::Climb => SCORE_CLIMB_WITHOUT_GOLD,
    }
}

/// A single agent playing a single episode
#[derive(Debug, Clone)]
pub struct AgentSession {
    id: SessionId,
    config: AgentConfig,
    store: BeliefStore,
    planner: PathPlanner,
    state: AgentState,
    entry: Coord,
    turn: u32,
    actions_taken: u32,
    last_action: Option<Action>,
    outcome: Option<Outcome>,
}

impl AgentSession {
    pub fn new(config: AgentConfig) -> Result<Self> {
        config.validate()?;
        let store = BeliefStore::from_config(&config);
        let planner = PathPlanner::from_config(&config);
        let session = Self {
            id: SessionId::new(),
            config,
            store,
            planner,
            state: AgentState::default(),
            entry: Coord::new(0, 0),
            turn: 0,
            actions_taken: 0,
            last_action: None,
            outcome: None,
        };
        info!(
            session = %session.id.0,
            grid = session.config.grid_size,
            wumpuses = session.config.wumpus_count,
            "session started"
        );
        Ok(session)
    }

    // === ACCESSORS ===

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn store(&self) -> &BeliefStore {
        &self.store
    }

    pub fn state(&self) -> &AgentState {
        &self.state
    }

    pub fn pose(&self) -> Pose {
        self.state.pose
    }

    pub fn score(&self) -> i64 {
        self.state.score
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn planner_stats(&self) -> (u64, u64) {
        self.planner.cache_stats()
    }

    /// Actions until the wumpuses next move, counting the next one.
    /// `None` when the wumpuses stay put.
    pub fn actions_left_in_epoch(&self) -> Option<u32> {
        match self.config.wumpus_move_interval {
            Some(interval) if interval > 0 => Some(interval - self.actions_taken % interval),
            _ => None,
        }
    }

    // === TURN LOOP ===

    /// Consume one percept and return the action to take, with its trace.
    pub fn step(&mut self, percept: &Percept) -> Result<TurnSnapshot> {
        if self.is_finished() {
            return Err(AgentError::SessionFinished);
        }

        let shot = self.apply_last_action(percept)?;
        self.check_pose(percept)?;

        let obs = Observation {
            position: self.state.pose.position,
            signals: Signals::observed(percept.breeze, percept.stench, percept.glitter),
            scream: percept.scream,
            shot,
            wumpuses_moved: self.wumpuses_moved(),
        };
        let inference = observe(&mut self.store, &obs, self.config.pit_prior)?;

        let ctx = PolicyContext::new(
            &self.store,
            self.state.pose,
            self.state.has_gold,
            self.entry,
            &self.config,
        )
        .with_epoch(self.actions_left_in_epoch());
        let decision = decide(&ctx, &mut self.planner)?;

        self.turn += 1;
        let score_delta = action_score(decision.action, self.state.has_gold);
        self.state.score += score_delta;
        self.actions_taken += 1;
        self.last_action = Some(decision.action);

        if decision.action == Action::Climb {
            let outcome = if self.state.has_gold {
                Outcome::Won
            } else {
                Outcome::GaveUp
            };
            self.finish(outcome);
        }

        debug!(
            turn = self.turn,
            goal = %decision.goal,
            action = ?decision.action,
            risk = decision.risk,
            "decision"
        );

        Ok(TurnSnapshot {
            turn: self.turn,
            pose: self.state.pose,
            percept: *percept,
            goal: decision.goal,
            action: decision.action,
            target: decision.target,
            risk: decision.risk,
            score_delta,
            score: self.state.score,
            inference,
            beliefs: self.store.summary(),
            outcome: self.outcome,
        })
    }

    /// The simulator reports the agent died after its last action.
    pub fn record_death(&mut self) {
        if self.is_finished() {
            return;
        }
        self.state.alive = false;
        self.state.score += SCORE_DEATH;
        self.finish(Outcome::Died);
    }

    /// End the episode without climbing, e.g. at a turn cap.
    pub fn give_up(&mut self) {
        if !self.is_finished() {
            self.finish(Outcome::GaveUp);
        }
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        info!(
            session = %self.id.0,
            ?outcome,
            score = self.state.score,
            turns = self.turn,
            "session finished"
        );
    }

    /// Dead-reckon the effects of the previous action.
    ///
    /// Returns the shot record when the previous action was a shot.
    fn apply_last_action(&mut self, percept: &Percept) -> Result<Option<ShotRecord>> {
        let Some(action) = self.last_action else {
            if percept.bump {
                return Err(AgentError::violation("bump before the first action"));
            }
            return Ok(None);
        };

        if percept.bump && action != Action::MoveForward {
            return Err(AgentError::violation(format!(
                "bump after {:?}",
                action
            )));
        }

        let pose = &mut self.state.pose;
        match action {
            Action::MoveForward if percept.bump => {
                warn!(position = %pose.position, facing = ?pose.facing, "bumped into a wall");
            }
            Action::MoveForward => {
                let next = pose.position.step(pose.facing);
                if !self.store.in_bounds(next) {
                    return Err(AgentError::violation(format!(
                        "moved off the grid from {} without a bump",
                        pose.position
                    )));
                }
                pose.position = next;
            }
            Action::TurnLeft => pose.facing = pose.facing.left(),
            Action::TurnRight => pose.facing = pose.facing.right(),
            Action::Grab => {
                self.state.has_gold = true;
                self.store.record_grab(pose.position)?;
                info!(position = %pose.position, "gold grabbed");
            }
            Action::Shoot => {
                self.store.spend_arrow()?;
                return Ok(Some(ShotRecord {
                    origin: pose.position,
                    direction: pose.facing,
                }));
            }
            Action::Climb => {}
        }
        Ok(None)
    }

    fn check_pose(&self, percept: &Percept) -> Result<()> {
        let pose = self.state.pose;
        if let Some(position) = percept.position {
            if position != pose.position {
                return Err(AgentError::violation(format!(
                    "agent believes it is at {} but the simulator says {}",
                    pose.position, position
                )));
            }
        }
        if let Some(facing) = percept.facing {
            if facing != pose.facing {
                return Err(AgentError::violation(format!(
                    "agent believes it faces {:?} but the simulator says {:?}",
                    pose.facing, facing
                )));
            }
        }
        Ok(())
    }

    /// A movement epoch ended with the previous action
    fn wumpuses_moved(&self) -> bool {
        match self.config.wumpus_move_interval {
            Some(interval) if interval > 0 => {
                self.actions_taken > 0 && self.actions_taken % interval == 0
            }
            _ => false,
        }
    }
}
