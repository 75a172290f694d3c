//! Ground-truth map description, loadable from TOML
//!
//! ```toml
//! size = 4
//! gold = { x = 3, y = 3 }
//! pits = [{ x = 2, y = 1 }]
//! wumpuses = []
//! moving = false
//! ```

use std::fs;
use std::path::Path;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::config::AgentConfig;
use crate::core::constants::{DEFAULT_WUMPUS_MOVE_INTERVAL, MAX_GRID_SIZE};
use crate::core::error::{AgentError, Result};
use crate::core::types::Coord;

/// Hidden layout of one world
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldMap {
    pub size: u32,
    #[serde(default)]
    pub wumpuses: Vec<Coord>,
    #[serde(default)]
    pub pits: Vec<Coord>,
    pub gold: Coord,
    /// Wumpuses wander every few actions
    #[serde(default)]
    pub moving: bool,
}

impl WorldMap {
    pub fn new(size: u32, wumpuses: Vec<Coord>, pits: Vec<Coord>, gold: Coord) -> Self {
        Self {
            size,
            wumpuses,
            pits,
            gold,
            moving: false,
        }
    }

    pub fn with_moving(mut self, moving: bool) -> Self {
        self.moving = moving;
        self
    }

    pub fn entry(&self) -> Coord {
        Coord::new(0, 0)
    }

    pub fn in_bounds(&self, coord: Coord) -> bool {
        let side = self.size as i32;
        coord.x >= 0 && coord.y >= 0 && coord.x < side && coord.y < side
    }

    pub fn has_pit(&self, coord: Coord) -> bool {
        self.pits.contains(&coord)
    }

    pub fn has_wumpus(&self, coord: Coord) -> bool {
        self.wumpuses.contains(&coord)
    }

    /// Agent config carrying only what a player is told up front
    ///
    /// With `disclose_pits` the agent also learns how many pits exist.
    pub fn agent_config(&self, disclose_pits: bool) -> AgentConfig {
        let mut config = AgentConfig::for_grid(self.size, self.wumpuses.len() as u32);
        if disclose_pits {
            config.pit_count = Some(self.pits.len() as u32);
        }
        if self.moving {
            config.wumpus_move_interval = Some(DEFAULT_WUMPUS_MOVE_INTERVAL);
        }
        config
    }

    /// Check the layout is playable and self-consistent
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size > MAX_GRID_SIZE {
            return Err(AgentError::InvalidConfig(format!(
                "map size ({}) must be within 1..={}",
                self.size, MAX_GRID_SIZE
            )));
        }

        let all = self
            .wumpuses
            .iter()
            .chain(self.pits.iter())
            .chain(std::iter::once(&self.gold));
        for coord in all {
            if !self.in_bounds(*coord) {
                return Err(AgentError::OutOfBounds {
                    coord: *coord,
                    size: self.size,
                });
            }
        }

        let pits: AHashSet<Coord> = self.pits.iter().copied().collect();
        if pits.len() != self.pits.len() {
            return Err(AgentError::InvalidConfig("duplicate pit coordinates".into()));
        }
        let wumpuses: AHashSet<Coord> = self.wumpuses.iter().copied().collect();
        if wumpuses.len() != self.wumpuses.len() {
            return Err(AgentError::InvalidConfig(
                "duplicate wumpus coordinates".into(),
            ));
        }

        let entry = self.entry();
        if pits.contains(&entry) || wumpuses.contains(&entry) {
            return Err(AgentError::InvalidConfig(format!(
                "entry cell {} must be free of threats",
                entry
            )));
        }
        if let Some(both) = wumpuses.intersection(&pits).next() {
            return Err(AgentError::InvalidConfig(format!(
                "wumpus placed on a pit at {}",
                both
            )));
        }
        if pits.contains(&self.gold) || wumpuses.contains(&self.gold) {
            return Err(AgentError::InvalidConfig(format!(
                "gold at {} shares a cell with a threat",
                self.gold
            )));
        }
        Ok(())
    }

    /// ASCII rendering, north row first
    pub fn render(&self) -> String {
        let side = self.size as i32;
        let mut out = String::new();
        for y in (0..side).rev() {
            for x in 0..side {
                let c = Coord::new(x, y);
                let glyph = if self.has_wumpus(c) {
                    'W'
                } else if self.has_pit(c) {
                    'P'
                } else if self.gold == c {
                    'G'
                } else {
                    '.'
                };
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

/// Load a world map from a TOML file and validate it
pub fn load_world_map(path: &Path) -> Result<WorldMap> {
    let contents = fs::read_to_string(path)?;
    parse_world_map(&contents)
}

/// Parse a world map from TOML text and validate it
pub fn parse_world_map(contents: &str) -> Result<WorldMap> {
    let map: WorldMap = toml::from_str(contents)?;
    map.validate()?;
    Ok(map)
}
