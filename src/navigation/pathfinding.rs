//! Turn-aware A* over the belief grid
//!
//! Search states are `(cell, facing)` pairs. Moving into a neighbor costs one
//! plus the turns needed to face it, plus a penalty for cells that are not
//! known safe. Unsafe cells are never entered.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::Result;
use crate::core::types::{Action, Coord, Direction, Pose};
use crate::knowledge::{BeliefStore, Safety, Threat, ThreatStatus};

/// Planner penalties for entering cells that are not known safe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepCosts {
    /// Pit status unresolved
    pub risk_penalty: u32,
    /// Pit ruled out, wumpus status unresolved
    pub stale_penalty: u32,
}

/// A planned path with the actions that walk it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Cells entered, in order; excludes the start cell
    pub cells: Vec<Coord>,
    pub actions: Vec<Action>,
    pub cost: u32,
    pub final_facing: Direction,
}

impl Route {
    /// The route that stays put
    pub fn empty(facing: Direction) -> Self {
        Self {
            cells: Vec::new(),
            actions: Vec::new(),
            cost: 0,
            final_facing: facing,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn first_action(&self) -> Option<Action> {
        self.actions.first().copied()
    }

    pub fn destination(&self) -> Option<Coord> {
        self.cells.last().copied()
    }

    /// Cell occupied after the first `steps` actions, starting at `start`
    pub fn position_after(&self, start: Coord, steps: usize) -> Coord {
        let moves = self
            .actions
            .iter()
            .take(steps)
            .filter(|a| **a == Action::MoveForward)
            .count();
        match moves {
            0 => start,
            n => self.cells.get(n - 1).copied().unwrap_or(start),
        }
    }

    /// Probability of dying somewhere along the route
    pub fn risk(&self, store: &BeliefStore) -> f32 {
        let survive: f32 = self
            .cells
            .iter()
            .map(|c| store.get(*c).map(|cell| 1.0 - cell.risk()).unwrap_or(0.0))
            .product();
        (1.0 - survive).clamp(0.0, 1.0)
    }
}

type State = (Coord, Direction);

/// Node in the A* open set
#[derive(Debug, Clone, Copy)]
struct PathNode {
    state: State,
    f_cost: u32,
    // Insertion order; earlier nodes win ties
    seq: u64,
}

impl PartialEq for PathNode {
    fn eq(&self, other: &Self) -> bool {
        self.f_cost == other.f_cost && self.seq == other.seq
    }
}

impl Eq for PathNode {}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Cost of entering `coord`, or `None` if the planner may not enter it
pub fn entry_cost(store: &BeliefStore, coord: Coord, allow_unsafe: bool, costs: StepCosts) -> Option<u32> {
    let cell = store.get(coord).ok()?;
    match cell.safety() {
        Safety::Safe => Some(0),
        Safety::Unsafe => None,
        Safety::Possible | Safety::Unknown if allow_unsafe => {
            if cell.status(Threat::Pit) == ThreatStatus::ConfirmedAbsent {
                Some(costs.stale_penalty)
            } else {
                Some(costs.risk_penalty)
            }
        }
        _ => None,
    }
}

/// Find the cheapest route from `from` to `to`.
///
/// Returns `Ok(None)` when no route exists; out-of-grid endpoints are errors.
pub fn find_route(
    store: &BeliefStore,
    from: Pose,
    to: Coord,
    allow_unsafe: bool,
    costs: StepCosts,
) -> Result<Option<Route>> {
    store.get(from.position)?;
    store.get(to)?;

    if from.position == to {
        return Ok(Some(Route::empty(from.facing)));
    }

    let start: State = (from.position, from.facing);
    let mut open_set = BinaryHeap::new();
    let mut came_from: AHashMap<State, State> = AHashMap::new();
    let mut g_scores: AHashMap<State, u32> = AHashMap::new();
    let mut seq = 0u64;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        state: start,
        f_cost: from.position.manhattan(&to),
        seq,
    });

    while let Some(current) = open_set.pop() {
        let (coord, facing) = current.state;
        let current_g = g_scores.get(&current.state).copied().unwrap_or(u32::MAX);

        // Stale heap entry
        if current.f_cost > current_g.saturating_add(coord.manhattan(&to)) {
            continue;
        }
        if coord == to {
            return Ok(Some(reconstruct_route(&came_from, current.state, current_g)));
        }

        // Forward, left, right, back
        for heading in [facing, facing.left(), facing.right(), facing.opposite()] {
            let next = coord.step(heading);
            let Some(penalty) = entry_cost(store, next, allow_unsafe, costs) else {
                continue;
            };

            let tentative_g = current_g + facing.turns_to(heading) + 1 + penalty;
            let state = (next, heading);
            let known_g = g_scores.get(&state).copied().unwrap_or(u32::MAX);

            if tentative_g < known_g {
                came_from.insert(state, current.state);
                g_scores.insert(state, tentative_g);
                seq += 1;
                open_set.push(PathNode {
                    state,
                    f_cost: tentative_g + next.manhattan(&to),
                    seq,
                });
            }
        }
    }

    Ok(None)
}

/// Reconstruct the route from the came_from map
fn reconstruct_route(came_from: &AHashMap<State, State>, goal: State, cost: u32) -> Route {
    let mut states = vec![goal];
    let mut current = goal;
    while let Some(&prev) = came_from.get(&current) {
        states.push(prev);
        current = prev;
    }
    states.reverse();

    let mut cells = Vec::with_capacity(states.len().saturating_sub(1));
    let mut actions = Vec::new();
    for pair in states.windows(2) {
        let (_, facing) = pair[0];
        let (coord, heading) = pair[1];
        actions.extend(facing.turn_actions(heading));
        actions.push(Action::MoveForward);
        cells.push(coord);
    }

    Route {
        cells,
        actions,
        cost,
        final_facing: goal.1,
    }
}
