//! Path planning over the belief grid

pub mod pathfinding;
pub mod planner;

pub use pathfinding::{entry_cost, find_route, Route, StepCosts};
pub use planner::PathPlanner;
