//! Counting-based presence estimates for unresolved cells
//!
//! Estimates are annotations for the RISK branch. They never feed back into
//! the deduction rules.

use crate::core::error::Result;
use crate::core::types::Coord;
use crate::inference::rules::{candidates, is_explained};
use crate::knowledge::{BeliefStore, Threat, ThreatStatus};

/// Recompute the estimate of every unresolved cell for both threats
pub fn update_estimates(store: &mut BeliefStore, pit_prior: f32) -> Result<()> {
    for threat in Threat::ALL {
        let updates = estimates_for(store, threat, pit_prior);
        for (coord, estimate) in updates {
            store.set_estimate(coord, threat, Some(estimate))?;
        }
    }
    Ok(())
}

/// Uniform estimate spread over every unresolved cell
pub fn global_estimate(store: &BeliefStore, threat: Threat, pit_prior: f32) -> f32 {
    let unresolved = store
        .cells()
        .filter(|c| c.status(threat).is_unresolved())
        .count();
    if unresolved == 0 {
        return 0.0;
    }
    match store.known_count(threat) {
        Some(known) => {
            let confirmed = store.confirmed_present(threat).len() as u32;
            let remaining = known.saturating_sub(confirmed);
            (remaining as f32 / unresolved as f32).clamp(0.0, 1.0)
        }
        None => pit_prior.clamp(0.0, 1.0),
    }
}

/// Highest `1 / candidates` over visited neighbors whose signal is unexplained
pub fn local_estimate(store: &BeliefStore, coord: Coord, threat: Threat) -> Option<f32> {
    store
        .neighbors(coord)
        .filter_map(|n| store.get(n).ok())
        .filter(|n| n.visited && n.signals.warning(threat) == Some(true))
        .filter(|n| !is_explained(store, n.coord, threat))
        .map(|n| candidates(store, n.coord, threat).len())
        .filter(|count| *count > 0)
        .map(|count| 1.0 / count as f32)
        .reduce(f32::max)
}

fn estimates_for(store: &BeliefStore, threat: Threat, pit_prior: f32) -> Vec<(Coord, f32)> {
    let global = global_estimate(store, threat, pit_prior);
    store
        .cells()
        .filter(|c| c.status(threat).is_unresolved())
        .map(|cell| {
            let estimate = match cell.status(threat) {
                ThreatStatus::Possible => local_estimate(store, cell.coord, threat)
                    .map_or(global, |local| local.max(global)),
                _ => global,
            };
            (cell.coord, estimate.clamp(0.0, 1.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::run_to_fixed_point;
    use crate::knowledge::Signals;

    #[test]
    fn test_two_frontier_cells_split_one_breeze() {
        let mut store = BeliefStore::new(3, 0, Some(1), 0);
        store
            .mark_visited(Coord::new(0, 0), Signals::observed(true, false, false))
            .unwrap();
        run_to_fixed_point(&mut store).unwrap();
        update_estimates(&mut store, 0.2).unwrap();

        let frontier = store.get(Coord::new(1, 0)).unwrap();
        assert_eq!(frontier.belief.pit_estimate, Some(0.5));
        assert!((frontier.risk() - 0.5).abs() < 1e-6);

        // 8 unresolved cells share the single pit
        let far = store.get(Coord::new(2, 2)).unwrap();
        assert_eq!(far.belief.pit_estimate, Some(0.125));
    }

    #[test]
    fn test_unknown_pit_count_uses_prior() {
        let store = BeliefStore::new(4, 1, None, 1);
        assert!((global_estimate(&store, Threat::Pit, 0.2) - 0.2).abs() < 1e-6);
        assert!((global_estimate(&store, Threat::Wumpus, 0.2) - 1.0 / 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_explained_signal_adds_no_local_weight() {
        let mut store = BeliefStore::new(4, 0, None, 0);
        let origin = Coord::new(0, 0);
        store
            .mark_visited(origin, Signals::observed(true, false, false))
            .unwrap();
        store
            .set_status(Coord::new(1, 0), Threat::Pit, ThreatStatus::Possible)
            .unwrap();
        store
            .set_status(Coord::new(0, 1), Threat::Pit, ThreatStatus::ConfirmedPresent)
            .unwrap();

        assert_eq!(local_estimate(&store, Coord::new(1, 0), Threat::Pit), None);
    }

    #[test]
    fn test_resolved_cells_carry_no_estimate() {
        let mut store = BeliefStore::new(3, 0, None, 0);
        store
            .mark_visited(Coord::new(0, 0), Signals::observed(false, false, false))
            .unwrap();
        run_to_fixed_point(&mut store).unwrap();
        update_estimates(&mut store, 0.2).unwrap();

        let cell = store.get(Coord::new(1, 0)).unwrap();
        assert_eq!(cell.belief.pit_estimate, None);
        assert_eq!(cell.belief.wumpus_estimate, None);
        assert_eq!(cell.risk(), 0.0);
    }
}
