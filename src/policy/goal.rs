//! Goals and the decision record the policy returns

use serde::{Deserialize, Serialize};

use crate::core::types::{Action, Coord};
use crate::navigation::Route;

/// Why the agent chose its action, in priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Goal {
    /// Standing on the gold
    Grab,
    /// Shoot the one wumpus in the way
    Hunt,
    /// Carry the gold home
    Retreat,
    /// Walk to the nearest known-safe unvisited cell
    Explore,
    /// Step into an uncertain cell with acceptable risk
    Risk,
    /// Leave the cave
    Escape,
    /// Stay on a sheltered cell while the wumpuses move
    Wait,
}

impl std::fmt::Display for Goal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Goal::Grab => "GRAB",
            Goal::Hunt => "HUNT",
            Goal::Retreat => "RETREAT",
            Goal::Explore => "EXPLORE",
            Goal::Risk => "RISK",
            Goal::Escape => "ESCAPE",
            Goal::Wait => "WAIT",
        };
        write!(f, "{}", name)
    }
}

/// One turn's decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub goal: Goal,
    pub action: Action,
    /// Cell the goal is aimed at
    pub target: Option<Coord>,
    /// Route being followed, if the action is a step along one
    pub route: Option<Route>,
    /// Death probability of the chosen route
    pub risk: f32,
}

impl Decision {
    /// A decision that acts in place
    pub fn act(goal: Goal, action: Action, target: Option<Coord>) -> Self {
        Self {
            goal,
            action,
            target,
            route: None,
            risk: 0.0,
        }
    }

    /// A decision that takes the first step of `route`.
    ///
    /// `None` for an empty route.
    pub fn follow(goal: Goal, target: Coord, route: Route, risk: f32) -> Option<Self> {
        let action = route.first_action()?;
        Some(Self {
            goal,
            action,
            target: Some(target),
            route: Some(route),
            risk,
        })
    }
}
