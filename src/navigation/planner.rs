//! Memoizing front end for the route search

use ahash::AHashMap;

use crate::core::config::AgentConfig;
use crate::core::error::Result;
use crate::core::types::{Coord, Pose};
use crate::knowledge::BeliefStore;
use crate::navigation::pathfinding::{find_route, Route, StepCosts};

type RouteKey = (Pose, Coord, bool);

/// Route planner with a per-revision memo.
///
/// The memo is dropped whenever the store's revision moves, so a cached route
/// always reflects the current beliefs.
#[derive(Debug, Clone)]
pub struct PathPlanner {
    costs: StepCosts,
    cache: AHashMap<RouteKey, Option<Route>>,
    cached_revision: Option<u64>,
    hits: u64,
    misses: u64,
}

impl PathPlanner {
    pub fn new(costs: StepCosts) -> Self {
        Self {
            costs,
            cache: AHashMap::new(),
            cached_revision: None,
            hits: 0,
            misses: 0,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(StepCosts {
            risk_penalty: config.risk_penalty,
            stale_penalty: config.stale_penalty,
        })
    }

    /// Cheapest route from `from` to `to`, `None` if unreachable
    pub fn find_route(
        &mut self,
        store: &BeliefStore,
        from: Pose,
        to: Coord,
        allow_unsafe: bool,
    ) -> Result<Option<Route>> {
        if self.cached_revision != Some(store.revision()) {
            self.cache.clear();
            self.cached_revision = Some(store.revision());
        }

        let key = (from, to, allow_unsafe);
        if let Some(route) = self.cache.get(&key) {
            self.hits += 1;
            return Ok(route.clone());
        }

        self.misses += 1;
        let route = find_route(store, from, to, allow_unsafe, self.costs)?;
        self.cache.insert(key, route.clone());
        Ok(route)
    }

    /// `(hits, misses)` since creation
    pub fn cache_stats(&self) -> (u64, u64) {
        (self.hits, self.misses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Direction;
    use crate::knowledge::Signals;

    #[test]
    fn test_memo_hit_within_revision() {
        let mut store = BeliefStore::new(3, 0, None, 0);
        store
            .mark_visited(Coord::new(0, 0), Signals::observed(false, false, false))
            .unwrap();
        crate::inference::run_to_fixed_point(&mut store).unwrap();

        let mut planner = PathPlanner::from_config(&AgentConfig::for_grid(3, 0));
        let pose = Pose::new(Coord::new(0, 0), Direction::East);
        let first = planner.find_route(&store, pose, Coord::new(1, 0), false).unwrap();
        let second = planner.find_route(&store, pose, Coord::new(1, 0), false).unwrap();
        assert_eq!(first, second);
        assert_eq!(planner.cache_stats(), (1, 1));
    }

    #[test]
    fn test_memo_dropped_on_revision_change() {
        let mut store = BeliefStore::new(3, 0, None, 0);
        store
            .mark_visited(Coord::new(0, 0), Signals::observed(false, false, false))
            .unwrap();

        let mut planner = PathPlanner::from_config(&AgentConfig::for_grid(3, 0));
        let pose = Pose::new(Coord::new(0, 0), Direction::East);
        let target = Coord::new(1, 0);
        assert!(planner.find_route(&store, pose, target, false).unwrap().is_none());

        crate::inference::run_to_fixed_point(&mut store).unwrap();
        let route = planner.find_route(&store, pose, target, false).unwrap();
        assert!(route.is_some());
        assert_eq!(planner.cache_stats(), (0, 2));
    }
}
