//! Rule engine - turns percept history into certainty about cells
//!
//! `observe` folds one turn's percepts into the store, runs the ordered rule
//! list to a fixed point, checks the result is still consistent, and then
//! refreshes the probability estimates.

pub mod estimate;
pub mod rules;

pub use estimate::{global_estimate, local_estimate, update_estimates};
pub use rules::{Deduction, Rule, RULES};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::error::{AgentError, Result};
use crate::core::types::{Coord, Direction};
use crate::knowledge::{BeliefStore, Signals, Threat, ThreatStatus};

/// Where and which way the last arrow flew
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShotRecord {
    pub origin: Coord,
    pub direction: Direction,
}

/// Everything the engine needs from one turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub position: Coord,
    pub signals: Signals,
    pub scream: bool,
    /// The shot fired by the previous action, if any
    pub shot: Option<ShotRecord>,
    /// A movement epoch elapsed since the previous turn
    pub wumpuses_moved: bool,
}

/// What a call to [`observe`] did
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InferenceReport {
    pub passes: u32,
    pub changes: u32,
    pub kill: Option<Coord>,
}

/// Fold one observation into the store.
pub fn observe(store: &mut BeliefStore, obs: &Observation, pit_prior: f32) -> Result<InferenceReport> {
    let mut report = InferenceReport::default();

    match (obs.shot, obs.scream) {
        (Some(shot), true) => report.kill = resolve_kill(store, shot)?,
        // Beliefs about the line are stale once the wumpuses have moved
        (Some(shot), false) if !obs.wumpuses_moved => resolve_miss(store, shot)?,
        (Some(_), false) => {}
        (None, true) => {
            return Err(AgentError::violation("scream heard without a shot"));
        }
        (None, false) => {}
    }

    if obs.wumpuses_moved {
        debug!("wumpuses may have moved, forgetting wumpus beliefs");
        store.invalidate_wumpuses();
    }

    store.mark_visited(obs.position, obs.signals)?;
    if obs.signals.glitter == Some(true) {
        store.set_gold_location(obs.position)?;
    }

    let (passes, changes) = run_to_fixed_point(store)?;
    report.passes = passes;
    report.changes = changes;

    verify(store)?;
    update_estimates(store, pit_prior)?;
    Ok(report)
}

/// Apply [`RULES`] pass after pass until nothing changes.
///
/// Returns `(passes, changes)`. Every cell/threat pair can strengthen at
/// most twice, so more than `4 * N^2 + 1` passes means the rules disagree
/// with each other.
pub fn run_to_fixed_point(store: &mut BeliefStore) -> Result<(u32, u32)> {
    let size = store.size();
    let limit = 4u32.saturating_mul(size).saturating_mul(size).saturating_add(1);
    let mut passes = 0;
    let mut changes = 0;

    loop {
        if passes >= limit {
            return Err(AgentError::violation(format!(
                "no fixed point after {} passes",
                passes
            )));
        }
        passes += 1;

        let mut changed = false;
        for rule in RULES.iter() {
            for deduction in (rule.apply)(store) {
                if store.set_status(deduction.coord, deduction.threat, deduction.status)? {
                    debug!(
                        rule = deduction.rule,
                        coord = %deduction.coord,
                        threat = ?deduction.threat,
                        status = ?deduction.status,
                        "deduction"
                    );
                    changes += 1;
                    changed = true;
                }
            }
        }

        if !changed {
            return Ok((passes, changes));
        }
    }
}

/// Check that the store still admits a world consistent with every record.
pub fn verify(store: &BeliefStore) -> Result<()> {
    for cell in store.visited_cells() {
        for threat in Threat::ALL {
            if cell.signals.warning(threat) == Some(true)
                && rules::candidates(store, cell.coord, threat).is_empty()
            {
                return Err(AgentError::violation(format!(
                    "{:?} signal at {} has no possible source",
                    threat, cell.coord
                )));
            }
        }
    }

    for threat in Threat::ALL {
        if let Some(known) = store.known_count(threat) {
            let confirmed = store.confirmed_present(threat).len() as u32;
            if confirmed > known {
                return Err(AgentError::violation(format!(
                    "{} confirmed {:?} cells but only {} exist",
                    confirmed, threat, known
                )));
            }
        }
    }
    Ok(())
}

/// Cells an arrow crosses, nearest first
pub fn arrow_line(store: &BeliefStore, shot: ShotRecord) -> Vec<Coord> {
    let mut line = Vec::new();
    let mut current = shot.origin.step(shot.direction);
    while store.in_bounds(current) {
        line.push(current);
        current = current.step(shot.direction);
    }
    line
}

fn resolve_kill(store: &mut BeliefStore, shot: ShotRecord) -> Result<Option<Coord>> {
    let victim = arrow_line(store, shot).into_iter().find(|c| {
        store
            .status(*c, Threat::Wumpus)
            .map(|s| s != ThreatStatus::ConfirmedAbsent)
            .unwrap_or(false)
    });

    match victim {
        Some(coord) => {
            store.record_kill(coord)?;
            info!(coord = %coord, remaining = store.remaining_wumpuses(), "wumpus killed");
            Ok(Some(coord))
        }
        None => {
            // Beliefs have decayed since the shot; count the kill only.
            store.record_unplaced_kill()?;
            warn!(
                remaining = store.remaining_wumpuses(),
                "scream heard but no cell on the arrow line could hold a wumpus"
            );
            Ok(None)
        }
    }
}

fn resolve_miss(store: &mut BeliefStore, shot: ShotRecord) -> Result<()> {
    for coord in arrow_line(store, shot) {
        store.set_status(coord, Threat::Wumpus, ThreatStatus::ConfirmedAbsent)?;
    }
    debug!(origin = %shot.origin, direction = ?shot.direction, "arrow missed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_at(x: i32, y: i32) -> Observation {
        Observation {
            position: Coord::new(x, y),
            signals: Signals::observed(false, false, false),
            scream: false,
            shot: None,
            wumpuses_moved: false,
        }
    }

    #[test]
    fn test_quiet_start_makes_neighbors_safe() {
        let mut store = BeliefStore::new(4, 1, None, 1);
        let report = observe(&mut store, &quiet_at(0, 0), 0.2).unwrap();

        assert!(report.changes > 0);
        for c in [Coord::new(0, 1), Coord::new(1, 0)] {
            assert_eq!(store.safety(c).unwrap(), crate::knowledge::Safety::Safe);
        }
    }

    #[test]
    fn test_single_candidate_in_corner() {
        // Breeze at (0,0); the quiet cell (2,0) clears (1,0)
        let mut store = BeliefStore::new(4, 0, None, 0);
        let mut obs = quiet_at(0, 0);
        obs.signals = Signals::observed(true, false, false);
        observe(&mut store, &obs, 0.2).unwrap();
        observe(&mut store, &quiet_at(2, 0), 0.2).unwrap();

        assert_eq!(
            store.status(Coord::new(1, 0), Threat::Pit).unwrap(),
            ThreatStatus::ConfirmedAbsent
        );
        assert_eq!(
            store.status(Coord::new(0, 1), Threat::Pit).unwrap(),
            ThreatStatus::ConfirmedPresent
        );
    }

    #[test]
    fn test_two_by_two_pit_by_elimination() {
        let mut store = BeliefStore::new(2, 0, None, 0);
        let mut obs = quiet_at(0, 0);
        obs.signals = Signals::observed(true, false, false);
        observe(&mut store, &obs, 0.2).unwrap();
        observe(&mut store, &quiet_at(1, 0), 0.2).unwrap();

        assert_eq!(
            store.status(Coord::new(0, 1), Threat::Pit).unwrap(),
            ThreatStatus::ConfirmedPresent
        );
        assert_eq!(
            store.safety(Coord::new(1, 1)).unwrap(),
            crate::knowledge::Safety::Safe
        );
    }

    #[test]
    fn test_fixed_point_is_idempotent() {
        let mut store = BeliefStore::new(4, 1, None, 1);
        observe(&mut store, &quiet_at(0, 0), 0.2).unwrap();
        let (passes, changes) = run_to_fixed_point(&mut store).unwrap();
        assert_eq!(passes, 1);
        assert_eq!(changes, 0);
    }

    #[test]
    fn test_scream_attributes_kill_to_first_candidate() {
        let mut store = BeliefStore::new(4, 1, None, 1);
        let mut obs = quiet_at(0, 0);
        obs.signals = Signals::observed(false, true, false);
        observe(&mut store, &obs, 0.2).unwrap();

        store.spend_arrow().unwrap();
        let mut obs = quiet_at(0, 0);
        obs.scream = true;
        obs.shot = Some(ShotRecord {
            origin: Coord::new(0, 0),
            direction: Direction::East,
        });
        obs.signals = Signals::observed(false, false, false);
        let report = observe(&mut store, &obs, 0.2).unwrap();

        assert_eq!(report.kill, Some(Coord::new(1, 0)));
        assert_eq!(store.remaining_wumpuses(), 0);
        assert!(store.confirmed_present(Threat::Wumpus).is_empty());
        // Global closure after the last kill
        assert!(store
            .cells()
            .all(|c| c.status(Threat::Wumpus) == ThreatStatus::ConfirmedAbsent));
    }

    #[test]
    fn test_missed_shot_clears_the_line() {
        let mut store = BeliefStore::new(4, 1, None, 1);
        let mut obs = quiet_at(0, 0);
        obs.signals = Signals::observed(false, true, false);
        observe(&mut store, &obs, 0.2).unwrap();

        store.spend_arrow().unwrap();
        obs.shot = Some(ShotRecord {
            origin: Coord::new(0, 0),
            direction: Direction::East,
        });
        observe(&mut store, &obs, 0.2).unwrap();

        for x in 1..4 {
            assert_eq!(
                store.status(Coord::new(x, 0), Threat::Wumpus).unwrap(),
                ThreatStatus::ConfirmedAbsent
            );
        }
        // The stench now has one candidate left
        assert_eq!(
            store.status(Coord::new(0, 1), Threat::Wumpus).unwrap(),
            ThreatStatus::ConfirmedPresent
        );
    }

    #[test]
    fn test_scream_without_shot_is_violation() {
        let mut store = BeliefStore::new(4, 1, None, 1);
        let mut obs = quiet_at(0, 0);
        obs.scream = true;
        assert!(matches!(
            observe(&mut store, &obs, 0.2),
            Err(AgentError::ConsistencyViolation(_))
        ));
    }

    #[test]
    fn test_unexplainable_signal_is_violation() {
        let mut store = BeliefStore::new(3, 0, None, 0);
        observe(&mut store, &quiet_at(0, 0), 0.2).unwrap();
        // A stench in a world with no wumpus left
        let mut obs = quiet_at(1, 0);
        obs.signals = Signals::observed(false, true, false);
        assert!(observe(&mut store, &obs, 0.2).is_err());
    }

    #[test]
    fn test_moving_wumpus_decay() {
        let mut store = BeliefStore::new(4, 1, None, 1);
        observe(&mut store, &quiet_at(0, 0), 0.2).unwrap();

        let mut obs = quiet_at(1, 0);
        obs.wumpuses_moved = true;
        obs.signals = Signals::observed(false, true, false);
        observe(&mut store, &obs, 0.2).unwrap();

        // (0,1) was wumpus-free before the move; now only pits stay known
        let cell = store.get(Coord::new(0, 1)).unwrap();
        assert_eq!(cell.status(Threat::Pit), ThreatStatus::ConfirmedAbsent);
        assert_eq!(cell.status(Threat::Wumpus), ThreatStatus::Unknown);
        assert_eq!(
            store.status(Coord::new(2, 0), Threat::Wumpus).unwrap(),
            ThreatStatus::Possible
        );
    }

    #[test]
    fn test_glitter_sets_gold_location() {
        let mut store = BeliefStore::new(4, 1, None, 1);
        let mut obs = quiet_at(0, 0);
        obs.signals = Signals::observed(false, false, true);
        observe(&mut store, &obs, 0.2).unwrap();
        assert_eq!(store.gold_location(), Some(Coord::new(0, 0)));
    }
}
