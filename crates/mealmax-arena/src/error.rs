//! Error types for the arena binary.
//!
//! Uses `thiserror` for typed errors that surface through the command
//! pipeline: configuration, storage and battles.

use mealmax_battle::{BattleError, RandomSourceError};
use mealmax_db::DbError;

/// Errors that can occur while running an arena command.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// A storage operation failed.
    #[error(transparent)]
    Db(#[from] DbError),

    /// A battle could not be resolved.
    #[error(transparent)]
    Battle(#[from] BattleError),

    /// The random source client could not be built.
    #[error(transparent)]
    Random(#[from] RandomSourceError),

    /// Output serialization failed.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
