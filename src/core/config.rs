//! Agent configuration with documented knobs
//!
//! Everything the agent is allowed to know before the first percept lives
//! here. Nothing in this struct describes hidden ground truth beyond counts.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::constants::*;
use crate::core::error::{AgentError, Result};

/// Configuration for one agent session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    // === WORLD KNOWLEDGE ===
    /// Side length of the square grid
    pub grid_size: u32,

    /// Number of wumpuses alive at the start
    pub wumpus_count: u32,

    /// Total number of pits, when the map author discloses it
    ///
    /// With a known count the count-closure rule can clear the rest of the
    /// grid once every pit is confirmed, and risk estimates become
    /// `remaining / unresolved` instead of the prior.
    pub pit_count: Option<u32>,

    /// Per-cell pit probability used when `pit_count` is unknown
    pub pit_prior: f32,

    /// Arrows carried at the start
    pub arrows: u32,

    /// Wumpuses take one step every this many agent actions
    ///
    /// `None` means a static world. Every elapsed interval wipes the
    /// wumpus dimension of the belief store.
    pub wumpus_move_interval: Option<u32>,

    // === POLICY ===
    /// Highest route risk the RISK branch will accept
    ///
    /// Above this the agent prefers climbing out empty-handed.
    pub max_acceptable_risk: f32,

    /// Moving mode only: cost added per cell around the epoch-end position
    /// whose wumpus status is not ruled out
    pub epoch_exposure_penalty: u32,

    // === PLANNER ===
    /// Extra cost for entering a cell whose pit status is unresolved
    pub risk_penalty: u32,

    /// Extra cost for entering a pit-free cell whose wumpus status is unresolved
    pub stale_penalty: u32,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            wumpus_count: DEFAULT_WUMPUS_COUNT,
            pit_count: None,
            pit_prior: DEFAULT_PIT_PROBABILITY,
            arrows: DEFAULT_ARROWS,
            wumpus_move_interval: None,
            max_acceptable_risk: DEFAULT_MAX_ACCEPTABLE_RISK,
            epoch_exposure_penalty: EPOCH_EXPOSURE_PENALTY,
            risk_penalty: RISK_PENALTY_UNKNOWN,
            stale_penalty: RISK_PENALTY_STALE,
        }
    }
}

impl AgentConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Config for a static world of the given size and wumpus count
    pub fn for_grid(grid_size: u32, wumpus_count: u32) -> Self {
        Self {
            grid_size,
            wumpus_count,
            ..Self::default()
        }
    }

    pub fn with_pit_count(mut self, pit_count: u32) -> Self {
        self.pit_count = Some(pit_count);
        self
    }

    pub fn with_move_interval(mut self, interval: u32) -> Self {
        self.wumpus_move_interval = Some(interval);
        self
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(AgentError::InvalidConfig("grid_size must be positive".into()));
        }
        if self.grid_size > MAX_GRID_SIZE {
            return Err(AgentError::InvalidConfig(format!(
                "grid_size ({}) exceeds {}",
                self.grid_size, MAX_GRID_SIZE
            )));
        }

        let cells = self.grid_size.saturating_mul(self.grid_size);
        if self.wumpus_count >= cells {
            return Err(AgentError::InvalidConfig(format!(
                "wumpus_count ({}) must leave room on a {}x{} grid",
                self.wumpus_count, self.grid_size, self.grid_size
            )));
        }
        if let Some(pits) = self.pit_count {
            if pits.saturating_add(self.wumpus_count) >= cells {
                return Err(AgentError::InvalidConfig(format!(
                    "pit_count ({}) plus wumpus_count ({}) fill the grid",
                    pits, self.wumpus_count
                )));
            }
        }

        if !(0.0..=1.0).contains(&self.pit_prior) {
            return Err(AgentError::InvalidConfig(format!(
                "pit_prior ({}) must be within [0, 1]",
                self.pit_prior
            )));
        }
        if !(0.0..=1.0).contains(&self.max_acceptable_risk) {
            return Err(AgentError::InvalidConfig(format!(
                "max_acceptable_risk ({}) must be within [0, 1]",
                self.max_acceptable_risk
            )));
        }

        if self.wumpus_move_interval == Some(0) {
            return Err(AgentError::InvalidConfig(
                "wumpus_move_interval must be positive".into(),
            ));
        }

        Ok(())
    }
}

/// Load an agent config from a TOML file and validate it
pub fn load_agent_config(path: &Path) -> Result<AgentConfig> {
    let contents = fs::read_to_string(path)?;
    parse_agent_config(&contents)
}

/// Parse an agent config from TOML text and validate it
pub fn parse_agent_config(contents: &str) -> Result<AgentConfig> {
    let config: AgentConfig = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AgentConfig::new();
        assert_eq!(config, AgentConfig::default());
        assert!(config.validate().is_ok());
        assert_eq!(config.grid_size, DEFAULT_GRID_SIZE);
        assert!(config.wumpus_move_interval.is_none());
    }

    #[test]
    fn test_zero_grid_rejected() {
        let config = AgentConfig::for_grid(0, 0);
        assert!(matches!(config.validate(), Err(AgentError::InvalidConfig(_))));
    }

    #[test]
    fn test_oversized_grid_rejected() {
        assert!(AgentConfig::for_grid(MAX_GRID_SIZE, 0).validate().is_ok());
        let config = AgentConfig::for_grid(MAX_GRID_SIZE + 1, 0);
        assert!(matches!(config.validate(), Err(AgentError::InvalidConfig(_))));
        assert!(AgentConfig::for_grid(70_000, 0).validate().is_err());
    }

    #[test]
    fn test_overfull_grid_rejected() {
        let config = AgentConfig::for_grid(2, 4);
        assert!(config.validate().is_err());

        let config = AgentConfig::for_grid(2, 1).with_pit_count(3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_risk_bounds() {
        let mut config = AgentConfig::default();
        config.max_acceptable_risk = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_partial_toml_uses_defaults() {
        let config = parse_agent_config(
            r#"
            grid_size = 4
            wumpus_count = 1
            pit_count = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.pit_count, Some(3));
        assert_eq!(config.arrows, DEFAULT_ARROWS);
        assert_eq!(config.risk_penalty, RISK_PENALTY_UNKNOWN);
    }

    #[test]
    fn test_parse_rejects_zero_interval() {
        let result = parse_agent_config("wumpus_move_interval = 0");
        assert!(result.is_err());
    }
}
