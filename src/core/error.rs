use thiserror::Error;

use crate::core::types::Team;

#[derive(Error, Debug)]
pub enum TacticsError {
    #[error("No stat table for class: {0}")]
    InvalidClassData(String),

    #[error("Too many participants for {team:?}: {count} (deployment holds {capacity})")]
    RosterTooLarge {
        team: Team,
        count: usize,
        capacity: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Data parse error: {0}")]
    DataParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, TacticsError>;
