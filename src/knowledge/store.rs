//! The belief store: one [`Cell`] per grid coordinate plus global facts
//!
//! All writes go through methods that enforce monotonic knowledge. The two
//! sanctioned reversals are [`BeliefStore::record_kill`] and
//! [`BeliefStore::invalidate_wumpuses`].

use serde::{Deserialize, Serialize};

use crate::core::config::AgentConfig;
use crate::core::error::{AgentError, Result};
use crate::core::types::Coord;
use crate::knowledge::belief::{Belief, Safety, Signals, Threat, ThreatStatus};

/// One grid cell and everything the agent knows about it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub coord: Coord,
    pub visited: bool,
    pub signals: Signals,
    pub belief: Belief,
}

impl Cell {
    fn new(coord: Coord) -> Self {
        Self {
            coord,
            visited: false,
            signals: Signals::default(),
            belief: Belief::default(),
        }
    }

    pub fn status(&self, threat: Threat) -> ThreatStatus {
        self.belief.status(threat)
    }

    pub fn safety(&self) -> Safety {
        self.belief.safety()
    }

    pub fn risk(&self) -> f32 {
        self.belief.risk()
    }
}

/// Compact view of the store for per-turn traces
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeliefSummary {
    pub visited: usize,
    pub safe: usize,
    pub possible: usize,
    pub unknown: usize,
    pub unsafe_cells: usize,
    pub confirmed_pits: Vec<Coord>,
    pub confirmed_wumpuses: Vec<Coord>,
    pub remaining_wumpuses: u32,
    pub gold_location: Option<Coord>,
    pub arrows: u32,
    pub revision: u64,
}

/// Persistent per-session knowledge base
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeliefStore {
    size: u32,
    cells: Vec<Cell>,
    remaining_wumpuses: u32,
    known_pit_count: Option<u32>,
    gold_location: Option<Coord>,
    arrows: u32,
    revision: u64,
}

impl BeliefStore {
    /// Create an empty store. Every cell starts Unknown on both threats.
    pub fn new(size: u32, wumpus_count: u32, known_pit_count: Option<u32>, arrows: u32) -> Self {
        let side = size as i32;
        let mut cells = Vec::with_capacity(size as usize * size as usize);
        for y in 0..side {
            for x in 0..side {
                cells.push(Cell::new(Coord::new(x, y)));
            }
        }

        Self {
            size,
            cells,
            remaining_wumpuses: wumpus_count,
            known_pit_count,
            gold_location: None,
            arrows,
            revision: 0,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Self {
        Self::new(
            config.grid_size,
            config.wumpus_count,
            config.pit_count,
            config.arrows,
        )
    }

    // === READS ===

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        let side = self.size as i32;
        coord.x >= 0 && coord.y >= 0 && coord.x < side && coord.y < side
    }

    fn index(&self, coord: Coord) -> Result<usize> {
        if !self.in_bounds(coord) {
            return Err(AgentError::OutOfBounds {
                coord,
                size: self.size,
            });
        }
        Ok(coord.y as usize * self.size as usize + coord.x as usize)
    }

    pub fn get(&self, coord: Coord) -> Result<&Cell> {
        let idx = self.index(coord)?;
        Ok(&self.cells[idx])
    }

    pub fn status(&self, coord: Coord, threat: Threat) -> Result<ThreatStatus> {
        Ok(self.get(coord)?.status(threat))
    }

    pub fn safety(&self, coord: Coord) -> Result<Safety> {
        Ok(self.get(coord)?.safety())
    }

    pub fn cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter()
    }

    pub fn visited_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells.iter().filter(|c| c.visited)
    }

    /// In-bounds 4-neighbors in North, East, South, West order
    pub fn neighbors(&self, coord: Coord) -> impl Iterator<Item = Coord> + '_ {
        coord
            .adjacent()
            .into_iter()
            .filter(move |c| self.in_bounds(*c))
    }

    /// Cells whose `threat` status is ConfirmedPresent
    pub fn confirmed_present(&self, threat: Threat) -> Vec<Coord> {
        self.cells
            .iter()
            .filter(|c| c.status(threat) == ThreatStatus::ConfirmedPresent)
            .map(|c| c.coord)
            .collect()
    }

    pub fn remaining_wumpuses(&self) -> u32 {
        self.remaining_wumpuses
    }

    pub fn known_pit_count(&self) -> Option<u32> {
        self.known_pit_count
    }

    /// Total count of `threat` still in the world, if known
    pub fn known_count(&self, threat: Threat) -> Option<u32> {
        match threat {
            Threat::Pit => self.known_pit_count,
            Threat::Wumpus => Some(self.remaining_wumpuses),
        }
    }

    pub fn gold_location(&self) -> Option<Coord> {
        self.gold_location
    }

    pub fn arrows(&self) -> u32 {
        self.arrows
    }

    /// Bumped on every status change; planners key their memo on it
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn summary(&self) -> BeliefSummary {
        let mut summary = BeliefSummary {
            visited: 0,
            safe: 0,
            possible: 0,
            unknown: 0,
            unsafe_cells: 0,
            confirmed_pits: self.confirmed_present(Threat::Pit),
            confirmed_wumpuses: self.confirmed_present(Threat::Wumpus),
            remaining_wumpuses: self.remaining_wumpuses,
            gold_location: self.gold_location,
            arrows: self.arrows,
            revision: self.revision,
        };
        for cell in &self.cells {
            if cell.visited {
                summary.visited += 1;
            }
            match cell.safety() {
                Safety::Safe => summary.safe += 1,
                Safety::Unsafe => summary.unsafe_cells += 1,
                Safety::Possible => summary.possible += 1,
                Safety::Unknown => summary.unknown += 1,
            }
        }
        summary
    }

    // === WRITES ===

    /// Strengthen the status of `threat` at `coord`.
    ///
    /// Returns whether anything changed. Overwriting a confirmed value or
    /// weakening Possible back to Unknown is a consistency violation.
    pub fn set_status(&mut self, coord: Coord, threat: Threat, status: ThreatStatus) -> Result<bool> {
        let idx = self.index(coord)?;
        let belief = &mut self.cells[idx].belief;
        let current = belief.status(threat);

        if current == status {
            return Ok(false);
        }
        if current.is_confirmed() {
            return Err(AgentError::violation(format!(
                "{:?} at {} is {:?}, refusing {:?}",
                threat, coord, current, status
            )));
        }
        if status.strength() < current.strength() {
            return Err(AgentError::violation(format!(
                "{:?} at {} would weaken from {:?} to {:?}",
                threat, coord, current, status
            )));
        }

        *belief.status_mut(threat) = status;
        if status.is_confirmed() {
            *belief.estimate_mut(threat) = None;
        }
        self.revision += 1;
        Ok(true)
    }

    /// Record a visit with the signals perceived there.
    ///
    /// The agent stands on the cell alive, so both threats are absent.
    /// Revisiting with identical signals is a no-op; a recorded signal that
    /// disagrees with the new one means the world and the agent disagree.
    pub fn mark_visited(&mut self, coord: Coord, observed: Signals) -> Result<bool> {
        let idx = self.index(coord)?;
        let recorded = self.cells[idx].signals;

        let pairs = [
            ("breeze", recorded.breeze, observed.breeze),
            ("stench", recorded.stench, observed.stench),
            ("glitter", recorded.glitter, observed.glitter),
        ];
        for (name, before, now) in pairs {
            if let (Some(before), Some(now)) = (before, now) {
                if before != now {
                    return Err(AgentError::violation(format!(
                        "{} at {} recorded as {} but now observed {}",
                        name, coord, before, now
                    )));
                }
            }
        }

        let cell = &mut self.cells[idx];
        let mut changed = !cell.visited;
        cell.visited = true;
        let merged = Signals {
            breeze: observed.breeze.or(recorded.breeze),
            stench: observed.stench.or(recorded.stench),
            glitter: observed.glitter.or(recorded.glitter),
        };
        if merged != recorded {
            cell.signals = merged;
            changed = true;
        }

        changed |= self.set_status(coord, Threat::Pit, ThreatStatus::ConfirmedAbsent)?;
        changed |= self.set_status(coord, Threat::Wumpus, ThreatStatus::ConfirmedAbsent)?;
        Ok(changed)
    }

    /// A scream was attributed to `coord`: the wumpus there is dead.
    ///
    /// The wumpus status may flip from ConfirmedPresent to ConfirmedAbsent.
    /// A confirmed wumpus also rules out a pit there. Stenches recorded
    /// next to the corpse may have come from it and are forgotten.
    pub fn record_kill(&mut self, coord: Coord) -> Result<()> {
        let idx = self.index(coord)?;
        if self.remaining_wumpuses == 0 {
            return Err(AgentError::violation(format!(
                "kill at {} but no wumpus remains",
                coord
            )));
        }
        let current = self.cells[idx].belief.wumpus;
        if current == ThreatStatus::ConfirmedAbsent {
            return Err(AgentError::violation(format!(
                "kill at {} where no wumpus could be",
                coord
            )));
        }

        let belief = &mut self.cells[idx].belief;
        belief.wumpus = ThreatStatus::ConfirmedAbsent;
        belief.wumpus_estimate = None;
        self.remaining_wumpuses -= 1;
        self.revision += 1;

        if current == ThreatStatus::ConfirmedPresent {
            self.set_status(coord, Threat::Pit, ThreatStatus::ConfirmedAbsent)?;
        }

        let around: Vec<Coord> = self.neighbors(coord).collect();
        for neighbor in around {
            let idx = self.index(neighbor)?;
            let cell = &mut self.cells[idx];
            if cell.visited {
                cell.signals.stench = None;
            }
        }
        Ok(())
    }

    /// A wumpus died somewhere the store cannot place.
    ///
    /// Any recorded stench may have come from it, so all of them are dropped.
    pub fn record_unplaced_kill(&mut self) -> Result<()> {
        if self.remaining_wumpuses == 0 {
            return Err(AgentError::violation("kill heard but no wumpus remains"));
        }
        self.remaining_wumpuses -= 1;
        for cell in &mut self.cells {
            cell.signals.stench = None;
        }
        self.revision += 1;
        Ok(())
    }

    /// Wumpuses may have moved: forget every wumpus status and stench.
    pub fn invalidate_wumpuses(&mut self) {
        for cell in &mut self.cells {
            cell.belief.wumpus = ThreatStatus::Unknown;
            cell.belief.wumpus_estimate = None;
            cell.signals.stench = None;
        }
        self.revision += 1;
    }

    /// The gold at `coord` was picked up; its glitter is gone.
    pub fn record_grab(&mut self, coord: Coord) -> Result<()> {
        let idx = self.index(coord)?;
        self.cells[idx].signals.glitter = None;
        Ok(())
    }

    pub fn set_gold_location(&mut self, coord: Coord) -> Result<()> {
        self.index(coord)?;
        self.gold_location = Some(coord);
        Ok(())
    }

    pub fn spend_arrow(&mut self) -> Result<()> {
        if self.arrows == 0 {
            return Err(AgentError::violation("shot fired without arrows"));
        }
        self.arrows -= 1;
        Ok(())
    }

    /// Annotate an unresolved cell with a presence estimate.
    ///
    /// Estimates on resolved cells are dropped; they never change status.
    pub fn set_estimate(&mut self, coord: Coord, threat: Threat, estimate: Option<f32>) -> Result<()> {
        let idx = self.index(coord)?;
        let belief = &mut self.cells[idx].belief;
        let value = if belief.status(threat).is_confirmed() {
            None
        } else {
            estimate.map(|p| p.clamp(0.0, 1.0))
        };
        *belief.estimate_mut(threat) = value;
        Ok(())
    }
}
