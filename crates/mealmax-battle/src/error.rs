//! Error types for the battle engine.
//!
//! The engine performs no local recovery: every failure below reaches the
//! caller of [`BattleModel::resolve`](crate::BattleModel::resolve) as-is.

use mealmax_db::DbError;

/// Failures of the external random fraction source.
#[derive(Debug, thiserror::Error)]
pub enum RandomSourceError {
    /// The service could not be reached or answered with an error status.
    #[error("random source unavailable: {0}")]
    Unavailable(String),

    /// The request did not complete within the client's timeout.
    #[error("random source timed out after {timeout_ms}ms")]
    Timeout {
        /// The configured timeout in milliseconds.
        timeout_ms: u128,
    },

    /// The response body was not a fraction in `[0, 1)`.
    #[error("invalid response from random source: {0:?}")]
    Malformed(String),
}

/// Errors that can occur while staging or resolving a battle.
#[derive(Debug, thiserror::Error)]
pub enum BattleError {
    /// Two combatants are already staged.
    #[error("combatant list is full, cannot add more combatants")]
    CapacityExceeded,

    /// Resolution needs exactly two staged combatants.
    #[error("two combatants must be prepped for a battle (have {staged})")]
    InsufficientCombatants {
        /// How many combatants were staged.
        staged: usize,
    },

    /// The random fraction could not be obtained.
    #[error(transparent)]
    RandomSource(#[from] RandomSourceError),

    /// The battle result could not be recorded.
    #[error("failed to record battle result: {0}")]
    Persistence(#[from] DbError),
}
