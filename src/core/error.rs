use thiserror::Error;

use crate::core::types::Coord;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Coordinate {coord} outside {size}x{size} grid")]
    OutOfBounds { coord: Coord, size: u32 },

    #[error("Consistency violation: {0}")]
    ConsistencyViolation(String),

    #[error("Session already finished")]
    SessionFinished,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

impl AgentError {
    pub fn violation(message: impl Into<String>) -> Self {
        AgentError::ConsistencyViolation(message.into())
    }
}

pub type Result<T> = std::result::Result<T, AgentError>;
