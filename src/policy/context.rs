//! The policy's read-only view of one turn

use crate::core::config::AgentConfig;
use crate::core::types::{Coord, Pose};
use crate::knowledge::{BeliefStore, Safety};

/// Everything the policy may consult when picking an action
pub struct PolicyContext<'a> {
    pub store: &'a BeliefStore,
    pub pose: Pose,
    pub has_gold: bool,
    /// Cell the agent can climb out from
    pub entry: Coord,
    pub config: &'a AgentConfig,
    /// Actions until the wumpuses next move, counting the one being chosen.
    /// `None` in a static world.
    pub actions_left_in_epoch: Option<u32>,
}

impl<'a> PolicyContext<'a> {
    pub fn new(
        store: &'a BeliefStore,
        pose: Pose,
        has_gold: bool,
        entry: Coord,
        config: &'a AgentConfig,
    ) -> Self {
        Self {
            store,
            pose,
            has_gold,
            entry,
            config,
            actions_left_in_epoch: None,
        }
    }

    pub fn with_epoch(mut self, actions_left: Option<u32>) -> Self {
        self.actions_left_in_epoch = actions_left;
        self
    }

    pub fn position(&self) -> Coord {
        self.pose.position
    }

    pub fn at_entry(&self) -> bool {
        self.pose.position == self.entry
    }

    /// Known-safe cells the agent has not stood on yet
    pub fn safe_frontier(&self) -> Vec<Coord> {
        self.store
            .cells()
            .filter(|c| !c.visited && c.safety() == Safety::Safe)
            .map(|c| c.coord)
            .collect()
    }

    /// Unvisited cells that might be safe
    pub fn uncertain_frontier(&self) -> Vec<Coord> {
        self.store
            .cells()
            .filter(|c| !c.visited && c.safety().is_uncertain())
            .map(|c| c.coord)
            .collect()
    }
}
