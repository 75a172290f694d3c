//! Reference world - ground truth, map generation and the simulator
//!
//! The cognition core never reads anything in here. It exists so the agent
//! can be run end to end.

pub mod environment;
pub mod generator;
pub mod map;

pub use environment::{Environment, StepResult};
pub use generator::generate_map;
pub use map::{load_world_map, parse_world_map, WorldMap};
