//! Recoverable engine failures.

use thiserror::Error;

/// Everything the engine reports instead of aborting.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("all {capacity} level slots are occupied")]
    LevelSlotsFull { capacity: usize },

    #[error("no level named `{0}`")]
    LevelNotFound(String),

    #[error("level index {index} is out of range (capacity {capacity})")]
    LevelIndexOutOfRange { index: usize, capacity: usize },

    #[error("level slot {0} is empty")]
    EmptyLevelSlot(usize),

    #[error("game has no levels to start")]
    NoLevels,

    #[error("display I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
