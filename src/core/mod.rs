pub mod config;
pub mod constants;
pub mod error;
pub mod types;

pub use config::{load_agent_config, parse_agent_config, AgentConfig};
pub use error::{AgentError, Result};
pub use types::{Action, Coord, Direction, Outcome, Percept, Pose, SessionId};
