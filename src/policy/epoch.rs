//! Look-ahead to the next wumpus move in moving-wumpus worlds
//!
//! Wumpuses step after every `interval` actions. A wumpus that steps onto
//! the agent kills it, so the cell the agent stands on when the epoch ends
//! should have no possibly-occupied cell around it.

use crate::core::constants::EPOCH_HOLD_WINDOW;
use crate::core::types::{Action, Coord};
use crate::knowledge::{BeliefStore, Threat, ThreatStatus};
use crate::navigation::Route;
use crate::policy::context::PolicyContext;
use crate::policy::goal::{Decision, Goal};

/// Cells in and around `coord` whose wumpus status is not ruled out
pub fn wumpus_exposure(store: &BeliefStore, coord: Coord) -> u32 {
    std::iter::once(coord)
        .chain(store.neighbors(coord))
        .filter(|c| {
            store
                .status(*c, Threat::Wumpus)
                .is_ok_and(|s| s != ThreatStatus::ConfirmedAbsent)
        })
        .count() as u32
}

/// No wumpus can reach `coord` on the next move
pub fn is_sheltered(store: &BeliefStore, coord: Coord) -> bool {
    wumpus_exposure(store, coord) == 0
}

/// Where the agent stands when the epoch ends, if `route` lasts that long
pub fn boundary_cell(start: Coord, route: &Route, actions_left: u32) -> Option<Coord> {
    let steps = actions_left as usize;
    (route.actions.len() >= steps).then(|| route.position_after(start, steps))
}

/// Extra route cost for ending the epoch next to a possible wumpus
pub fn epoch_penalty(ctx: &PolicyContext, route: &Route) -> u32 {
    let Some(left) = ctx.actions_left_in_epoch else {
        return 0;
    };
    boundary_cell(ctx.position(), route, left)
        .map_or(0, |cell| wumpus_exposure(ctx.store, cell))
        .saturating_mul(ctx.config.epoch_exposure_penalty)
}

/// Replace a walking decision with a wait when the wumpuses are about to
/// move, the agent is sheltered, and the walk would leave it exposed.
///
/// A route that ends before the epoch does is judged by its destination.
pub fn hold_for_epoch(ctx: &PolicyContext, decision: Decision) -> Decision {
    let Some(left) = ctx.actions_left_in_epoch else {
        return decision;
    };
    let Some(route) = &decision.route else {
        return decision;
    };
    if left > EPOCH_HOLD_WINDOW || !is_sheltered(ctx.store, ctx.position()) {
        return decision;
    }

    let here = ctx.position();
    let end = boundary_cell(here, route, left)
        .or_else(|| route.destination())
        .unwrap_or(here);
    if is_sheltered(ctx.store, end) {
        return decision;
    }

    Decision::act(Goal::Wait, Action::TurnLeft, Some(here))
}
