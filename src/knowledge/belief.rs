//! Per-cell belief record
//!
//! Each cell carries one [`ThreatStatus`] per [`Threat`]. Safety is derived
//! from the pair and never stored.

use serde::{Deserialize, Serialize};

/// The two lethal things a cell can hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Threat {
    /// Stationary hazard, announced by a breeze
    Pit,
    /// Hostile entity, announced by a stench; can be shot
    Wumpus,
}

impl Threat {
    pub const ALL: [Threat; 2] = [Threat::Pit, Threat::Wumpus];
}

/// Knowledge about one threat in one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ThreatStatus {
    /// Nothing known
    #[default]
    Unknown,
    /// Adjacent to a cell that signalled this threat
    Possible,
    ConfirmedAbsent,
    ConfirmedPresent,
}

impl ThreatStatus {
    pub fn is_confirmed(&self) -> bool {
        matches!(
            self,
            ThreatStatus::ConfirmedAbsent | ThreatStatus::ConfirmedPresent
        )
    }

    /// Unresolved means the threat may or may not be there
    pub fn is_unresolved(&self) -> bool {
        !self.is_confirmed()
    }

    /// Lattice height: Unknown < Possible < Confirmed*
    pub fn strength(&self) -> u8 {
        match self {
            ThreatStatus::Unknown => 0,
            ThreatStatus::Possible => 1,
            ThreatStatus::ConfirmedAbsent | ThreatStatus::ConfirmedPresent => 2,
        }
    }
}

/// Derived safety of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Safety {
    /// Both threats confirmed absent
    Safe,
    /// At least one threat confirmed present
    Unsafe,
    /// At least one threat suspected, none confirmed
    Possible,
    Unknown,
}

impl Safety {
    /// Cells the planner may enter when accepting risk
    pub fn is_uncertain(&self) -> bool {
        matches!(self, Safety::Possible | Safety::Unknown)
    }
}

/// Belief about a single cell
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Belief {
    pub pit: ThreatStatus,
    pub wumpus: ThreatStatus,
    /// Counting-based presence estimate, only while `pit` is unresolved
    pub pit_estimate: Option<f32>,
    /// Counting-based presence estimate, only while `wumpus` is unresolved
    pub wumpus_estimate: Option<f32>,
}

impl Belief {
    pub fn status(&self, threat: Threat) -> ThreatStatus {
        match threat {
            Threat::Pit => self.pit,
            Threat::Wumpus => self.wumpus,
        }
    }

    pub(crate) fn status_mut(&mut self, threat: Threat) -> &mut ThreatStatus {
        match threat {
            Threat::Pit => &mut self.pit,
            Threat::Wumpus => &mut self.wumpus,
        }
    }

    pub fn estimate(&self, threat: Threat) -> Option<f32> {
        match threat {
            Threat::Pit => self.pit_estimate,
            Threat::Wumpus => self.wumpus_estimate,
        }
    }

    pub(crate) fn estimate_mut(&mut self, threat: Threat) -> &mut Option<f32> {
        match threat {
            Threat::Pit => &mut self.pit_estimate,
            Threat::Wumpus => &mut self.wumpus_estimate,
        }
    }

    pub fn safety(&self) -> Safety {
        use ThreatStatus::*;
        match (self.pit, self.wumpus) {
            (ConfirmedPresent, _) | (_, ConfirmedPresent) => Safety::Unsafe,
            (ConfirmedAbsent, ConfirmedAbsent) => Safety::Safe,
            (Possible, _) | (_, Possible) => Safety::Possible,
            _ => Safety::Unknown,
        }
    }

    /// Probability that `threat` is present.
    ///
    /// Unresolved cells without an estimate count as certain death.
    pub fn probability(&self, threat: Threat) -> f32 {
        match self.status(threat) {
            ThreatStatus::ConfirmedAbsent => 0.0,
            ThreatStatus::ConfirmedPresent => 1.0,
            _ => self.estimate(threat).unwrap_or(1.0),
        }
    }

    /// Probability that entering this cell is fatal
    pub fn risk(&self) -> f32 {
        let survive =
            (1.0 - self.probability(Threat::Pit)) * (1.0 - self.probability(Threat::Wumpus));
        (1.0 - survive).clamp(0.0, 1.0)
    }
}

/// Signals recorded while the agent stood on a cell.
///
/// `None` means never observed, or invalidated because the world changed
/// (gold grabbed, wumpus killed or moved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Signals {
    pub breeze: Option<bool>,
    pub stench: Option<bool>,
    pub glitter: Option<bool>,
}

impl Signals {
    /// A fresh observation with all three signals known
    pub fn observed(breeze: bool, stench: bool, glitter: bool) -> Self {
        Self {
            breeze: Some(breeze),
            stench: Some(stench),
            glitter: Some(glitter),
        }
    }

    /// The signal announcing `threat` in a neighbor
    pub fn warning(&self, threat: Threat) -> Option<bool> {
        match threat {
            Threat::Pit => self.breeze,
            Threat::Wumpus => self.stench,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_derivation() {
        let mut belief = Belief::default();
        assert_eq!(belief.safety(), Safety::Unknown);

        belief.pit = ThreatStatus::Possible;
        assert_eq!(belief.safety(), Safety::Possible);

        belief.pit = ThreatStatus::ConfirmedAbsent;
        assert_eq!(belief.safety(), Safety::Unknown);

        belief.wumpus = ThreatStatus::ConfirmedAbsent;
        assert_eq!(belief.safety(), Safety::Safe);

        belief.wumpus = ThreatStatus::ConfirmedPresent;
        assert_eq!(belief.safety(), Safety::Unsafe);
    }

    #[test]
    fn test_strength_ordering() {
        assert!(ThreatStatus::Unknown.strength() < ThreatStatus::Possible.strength());
        assert!(ThreatStatus::Possible.strength() < ThreatStatus::ConfirmedAbsent.strength());
        assert_eq!(
            ThreatStatus::ConfirmedAbsent.strength(),
            ThreatStatus::ConfirmedPresent.strength()
        );
    }

    #[test]
    fn test_risk_combines_both_threats() {
        let belief = Belief {
            pit: ThreatStatus::Possible,
            wumpus: ThreatStatus::Possible,
            pit_estimate: Some(0.5),
            wumpus_estimate: Some(0.5),
        };
        assert!((belief.risk() - 0.75).abs() < 1e-6);

        let safe = Belief {
            pit: ThreatStatus::ConfirmedAbsent,
            wumpus: ThreatStatus::ConfirmedAbsent,
            ..Belief::default()
        };
        assert_eq!(safe.risk(), 0.0);
    }

    #[test]
    fn test_missing_estimate_is_pessimistic() {
        let belief = Belief {
            wumpus: ThreatStatus::ConfirmedAbsent,
            ..Belief::default()
        };
        assert_eq!(belief.probability(Threat::Pit), 1.0);
        assert_eq!(belief.risk(), 1.0);
    }
}
