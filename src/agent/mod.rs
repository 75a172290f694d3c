//! Agent session - the per-turn orchestration loop
//!
//! percepts -> dead reckoning -> rule engine -> policy -> action
//!
//! A belief-free [`RandomPlayer`] plays behind the same [`Player`] trait as a
//! baseline.

pub mod baseline;
pub mod player;
pub mod session;
pub mod snapshot;

pub use baseline::RandomPlayer;
pub use player::{Player, PlayerTurn};
pub use session::{action_score, AgentSession, AgentState};
pub use snapshot::TurnSnapshot;
