//! Knowledge base - what the agent believes about every cell
//!
//! The store is the only stateful piece of the cognition pipeline. Rules,
//! planner and policy borrow it per call and never keep references.

pub mod belief;
pub mod store;

pub use belief::{Belief, Safety, Signals, Threat, ThreatStatus};
pub use store::{BeliefStore, BeliefSummary, Cell};
