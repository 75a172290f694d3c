//! Fire lanes and the HUNT branch

use crate::core::error::Result;
use crate::core::types::{Action, Coord};
use crate::knowledge::{BeliefStore, Safety, Threat, ThreatStatus};
use crate::navigation::PathPlanner;
use crate::policy::context::PolicyContext;
use crate::policy::goal::{Decision, Goal};

/// The single confirmed wumpus worth shooting, if there is exactly one
pub fn hunt_target(store: &BeliefStore) -> Option<Coord> {
    if store.arrows() == 0 {
        return None;
    }
    let confirmed = store.confirmed_present(Threat::Wumpus);
    let [target] = confirmed.as_slice() else {
        return None;
    };
    let pit = store.status(*target, Threat::Pit).ok()?;
    (pit == ThreatStatus::ConfirmedAbsent).then_some(*target)
}

/// Whether an arrow fired from `shooter` reaches `target` unobstructed
pub fn is_fire_lane(store: &BeliefStore, shooter: Coord, target: Coord) -> bool {
    if shooter.direction_to(&target).is_none() {
        return false;
    }
    let Ok(cell) = store.get(shooter) else {
        return false;
    };
    if cell.safety() != Safety::Safe {
        return false;
    }
    shooter.cells_between(&target).into_iter().all(|c| {
        store.get(c).is_ok_and(|between| {
            between.status(Threat::Pit) != ThreatStatus::ConfirmedPresent
                && between.status(Threat::Wumpus) == ThreatStatus::ConfirmedAbsent
        })
    })
}

/// Every fire lane on `target`, in coordinate order
pub fn fire_lanes(store: &BeliefStore, target: Coord) -> Vec<Coord> {
    store
        .cells()
        .map(|c| c.coord)
        .filter(|c| is_fire_lane(store, *c, target))
        .collect()
}

/// Shoot from here, or walk to the cheapest fire lane.
///
/// `None` when no lane can be reached safely.
pub fn plan_hunt(
    ctx: &PolicyContext,
    planner: &mut PathPlanner,
    target: Coord,
) -> Result<Option<Decision>> {
    let here = ctx.position();
    if is_fire_lane(ctx.store, here, target) {
        if let Some(aim) = here.direction_to(&target) {
            let action = ctx
                .pose
                .facing
                .turn_actions(aim)
                .first()
                .copied()
                .unwrap_or(Action::Shoot);
            return Ok(Some(Decision::act(Goal::Hunt, action, Some(target))));
        }
    }

    let mut best = None;
    for lane in fire_lanes(ctx.store, target) {
        let Some(route) = planner.find_route(ctx.store, ctx.pose, lane, false)? else {
            continue;
        };
        let key = (route.cost, lane);
        match &best {
            Some((best_key, _)) if *best_key <= key => {}
            _ => best = Some((key, route)),
        }
    }

    Ok(best.and_then(|(_, route)| Decision::follow(Goal::Hunt, target, route, 0.0)))
}
