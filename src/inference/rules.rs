//! Deduction rules over the belief store
//!
//! Each rule reads a snapshot of the store and returns the status changes it
//! implies. Rules never write; the engine applies their output in order.

use serde::Serialize;

use crate::core::types::Coord;
use crate::knowledge::{BeliefStore, Threat, ThreatStatus};

/// A status change implied by a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Deduction {
    pub coord: Coord,
    pub threat: Threat,
    pub status: ThreatStatus,
    pub rule: &'static str,
}

/// A named, pure deduction step
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub apply: fn(&BeliefStore) -> Vec<Deduction>,
}

/// Rules in application order
pub const RULES: [Rule; 5] = [
    Rule {
        name: "quiet_cell_clears_neighbors",
        apply: quiet_cell_clears_neighbors,
    },
    Rule {
        name: "signal_marks_suspects",
        apply: signal_marks_suspects,
    },
    Rule {
        name: "single_candidate",
        apply: single_candidate,
    },
    Rule {
        name: "exclusive_occupancy",
        apply: exclusive_occupancy,
    },
    Rule {
        name: "count_closure",
        apply: count_closure,
    },
];

/// No breeze (stench) on a visited cell: no pit (wumpus) next to it.
pub fn quiet_cell_clears_neighbors(store: &BeliefStore) -> Vec<Deduction> {
    let mut out = Vec::new();
    for cell in store.visited_cells() {
        for threat in Threat::ALL {
            if cell.signals.warning(threat) != Some(false) {
                continue;
            }
            for n in store.neighbors(cell.coord) {
                if status_of(store, n, threat) != ThreatStatus::ConfirmedAbsent {
                    out.push(Deduction {
                        coord: n,
                        threat,
                        status: ThreatStatus::ConfirmedAbsent,
                        rule: "quiet_cell_clears_neighbors",
                    });
                }
            }
        }
    }
    out
}

/// A breeze (stench) makes every unknown neighbor a suspect.
pub fn signal_marks_suspects(store: &BeliefStore) -> Vec<Deduction> {
    let mut out = Vec::new();
    for cell in store.visited_cells() {
        for threat in Threat::ALL {
            if cell.signals.warning(threat) != Some(true) {
                continue;
            }
            for n in store.neighbors(cell.coord) {
                if status_of(store, n, threat) == ThreatStatus::Unknown {
                    out.push(Deduction {
                        coord: n,
                        threat,
                        status: ThreatStatus::Possible,
                        rule: "signal_marks_suspects",
                    });
                }
            }
        }
    }
    out
}

/// A signal with exactly one neighbor left that could explain it.
pub fn single_candidate(store: &BeliefStore) -> Vec<Deduction> {
    let mut out = Vec::new();
    for cell in store.visited_cells() {
        for threat in Threat::ALL {
            if cell.signals.warning(threat) != Some(true) {
                continue;
            }
            let candidates = candidates(store, cell.coord, threat);
            if let [only] = candidates.as_slice() {
                if status_of(store, *only, threat) != ThreatStatus::ConfirmedPresent {
                    out.push(Deduction {
                        coord: *only,
                        threat,
                        status: ThreatStatus::ConfirmedPresent,
                        rule: "single_candidate",
                    });
                }
            }
        }
    }
    out
}

/// A wumpus never stands in a pit.
pub fn exclusive_occupancy(store: &BeliefStore) -> Vec<Deduction> {
    let mut out = Vec::new();
    for cell in store.cells() {
        for threat in Threat::ALL {
            let other = match threat {
                Threat::Pit => Threat::Wumpus,
                Threat::Wumpus => Threat::Pit,
            };
            if cell.status(threat) == ThreatStatus::ConfirmedPresent
                && cell.status(other) != ThreatStatus::ConfirmedAbsent
            {
                out.push(Deduction {
                    coord: cell.coord,
                    threat: other,
                    status: ThreatStatus::ConfirmedAbsent,
                    rule: "exclusive_occupancy",
                });
            }
        }
    }
    out
}

/// Once every counted threat is located, the rest of the grid is clear.
pub fn count_closure(store: &BeliefStore) -> Vec<Deduction> {
    let mut out = Vec::new();
    for threat in Threat::ALL {
        let Some(known) = store.known_count(threat) else {
            continue;
        };
        let confirmed = store.confirmed_present(threat).len() as u32;
        if confirmed != known {
            continue;
        }
        for cell in store.cells() {
            if cell.status(threat).is_unresolved() {
                out.push(Deduction {
                    coord: cell.coord,
                    threat,
                    status: ThreatStatus::ConfirmedAbsent,
                    rule: "count_closure",
                });
            }
        }
    }
    out
}

/// Neighbors of `coord` that may still hold `threat`
pub fn candidates(store: &BeliefStore, coord: Coord, threat: Threat) -> Vec<Coord> {
    store
        .neighbors(coord)
        .filter(|n| status_of(store, *n, threat) != ThreatStatus::ConfirmedAbsent)
        .collect()
}

/// A positive signal is explained once a neighbor is confirmed to hold the threat
pub fn is_explained(store: &BeliefStore, coord: Coord, threat: Threat) -> bool {
    store
        .neighbors(coord)
        .any(|n| status_of(store, n, threat) == ThreatStatus::ConfirmedPresent)
}

// Neighbors come from the store itself, so the lookup is always in bounds.
fn status_of(store: &BeliefStore, coord: Coord, threat: Threat) -> ThreatStatus {
    store
        .status(coord, threat)
        .unwrap_or(ThreatStatus::ConfirmedAbsent)
}
