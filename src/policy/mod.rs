//! Policy layer - one action per turn from the current beliefs
//!
//! Goals are tried in a fixed priority order and the first applicable one
//! wins:
//! - GRAB: standing on the gold
//! - HUNT: blocked by a single confirmed wumpus we can shoot
//! - RETREAT: carrying the gold home
//! - EXPLORE: nearest known-safe unvisited cell
//! - RISK: least risky uncertain cell under the configured threshold
//! - ESCAPE: climb out, accepting risk only if there is no safe way home
//!
//! In a moving-wumpus world the chosen action may be swapped for WAIT, a
//! turn on the spot, when the wumpuses move within the next two actions and
//! the planned walk would leave a sheltered cell for an exposed one. Routes
//! are also ranked by how exposed they leave the agent when the wumpuses move.
//!
//! The policy keeps no state between turns.

pub mod context;
pub mod epoch;
pub mod goal;
pub mod hunt;

pub use context::PolicyContext;
pub use epoch::{boundary_cell, epoch_penalty, hold_for_epoch, is_sheltered, wumpus_exposure};
pub use goal::{Decision, Goal};
pub use hunt::{fire_lanes, hunt_target, is_fire_lane, plan_hunt};

use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::core::error::{AgentError, Result};
use crate::core::types::{Action, Coord};
use crate::navigation::{PathPlanner, Route};

/// Pick this turn's action
pub fn decide(ctx: &PolicyContext, planner: &mut PathPlanner) -> Result<Decision> {
    let decision = choose(ctx, planner)?;
    let held = hold_for_epoch(ctx, decision);
    if held.goal == Goal::Wait {
        debug!(left = ?ctx.actions_left_in_epoch, "holding until the wumpuses move");
    }
    Ok(held)
}

fn choose(ctx: &PolicyContext, planner: &mut PathPlanner) -> Result<Decision> {
    let here = ctx.position();

    // GRAB
    if !ctx.has_gold && ctx.store.gold_location() == Some(here) {
        return Ok(Decision::act(Goal::Grab, Action::Grab, Some(here)));
    }

    let explore = if ctx.has_gold {
        None
    } else {
        explore_target(ctx, planner)?
    };
    let home = if ctx.has_gold {
        planner.find_route(ctx.store, ctx.pose, ctx.entry, false)?
    } else {
        None
    };
    let blocked = if ctx.has_gold {
        home.is_none()
    } else {
        explore.is_none()
    };

    // HUNT
    if blocked {
        if let Some(target) = hunt_target(ctx.store) {
            if let Some(decision) = plan_hunt(ctx, planner, target)? {
                debug!(target = %target, action = ?decision.action, "hunting");
                return Ok(decision);
            }
        }
    }

    // RETREAT
    if ctx.has_gold {
        if ctx.at_entry() {
            return Ok(Decision::act(Goal::Retreat, Action::Climb, Some(ctx.entry)));
        }
        if let Some(decision) = home.and_then(|r| Decision::follow(Goal::Retreat, ctx.entry, r, 0.0)) {
            return Ok(decision);
        }
    }

    // EXPLORE
    if let Some((target, route)) = explore {
        if let Some(decision) = Decision::follow(Goal::Explore, target, route, 0.0) {
            return Ok(decision);
        }
    }

    // RISK
    if !ctx.has_gold {
        if let Some((target, route, risk)) = risk_target(ctx, planner)? {
            if let Some(decision) = Decision::follow(Goal::Risk, target, route, risk) {
                warn!(target = %target, risk, "taking a risky step");
                return Ok(decision);
            }
        }
    }

    escape(ctx, planner)
}

/// Safe unvisited cell with the cheapest route.
///
/// In a moving world the route cost includes the epoch exposure penalty.
/// Ties go to the smaller Manhattan distance, then the smaller coordinate.
pub fn explore_target(ctx: &PolicyContext, planner: &mut PathPlanner) -> Result<Option<(Coord, Route)>> {
    let here = ctx.position();
    let mut best: Option<((u32, u32, Coord), Route)> = None;

    for target in ctx.safe_frontier() {
        let Some(route) = planner.find_route(ctx.store, ctx.pose, target, false)? else {
            continue;
        };
        let cost = route.cost.saturating_add(epoch_penalty(ctx, &route));
        let key = (cost, here.manhattan(&target), target);
        match &best {
            Some((best_key, _)) if *best_key <= key => {}
            _ => best = Some((key, route)),
        }
    }

    Ok(best.map(|((_, _, target), route)| (target, route)))
}

/// Uncertain unvisited cell with the lowest route risk under the threshold.
///
/// Ties go to Manhattan distance, then route cost, then coordinate.
pub fn risk_target(
    ctx: &PolicyContext,
    planner: &mut PathPlanner,
) -> Result<Option<(Coord, Route, f32)>> {
    let here = ctx.position();
    let limit = ctx.config.max_acceptable_risk;
    let mut best: Option<((OrderedFloat<f32>, u32, u32, Coord), Route)> = None;

    for target in ctx.uncertain_frontier() {
        let Some(route) = planner.find_route(ctx.store, ctx.pose, target, true)? else {
            continue;
        };
        let risk = route.risk(ctx.store);
        if risk > limit {
            continue;
        }
        let key = (OrderedFloat(risk), here.manhattan(&target), route.cost, target);
        match &best {
            Some((best_key, _)) if *best_key <= key => {}
            _ => best = Some((key, route)),
        }
    }

    Ok(best.map(|((risk, _, _, target), route)| (target, route, risk.0)))
}

fn escape(ctx: &PolicyContext, planner: &mut PathPlanner) -> Result<Decision> {
    if ctx.at_entry() {
        return Ok(Decision::act(Goal::Escape, Action::Climb, Some(ctx.entry)));
    }

    if let Some(route) = planner.find_route(ctx.store, ctx.pose, ctx.entry, false)? {
        if let Some(decision) = Decision::follow(Goal::Escape, ctx.entry, route, 0.0) {
            return Ok(decision);
        }
    }

    if let Some(route) = planner.find_route(ctx.store, ctx.pose, ctx.entry, true)? {
        let risk = route.risk(ctx.store);
        if let Some(decision) = Decision::follow(Goal::Escape, ctx.entry, route, risk) {
            warn!(risk, "no safe way home, escaping through uncertain cells");
            return Ok(decision);
        }
    }

    Err(AgentError::violation(format!(
        "no route from {} back to the entry {}",
        ctx.position(),
        ctx.entry
    )))
}
