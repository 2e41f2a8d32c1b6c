//! Error types for the persistence gateway.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] errors and adds the domain outcomes callers branch on
//! (missing meal, soft-deleted meal, duplicate name).

use core::fmt;

use mealmax_types::{MealError, MealId};

/// How a meal was looked up, for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MealKey {
    /// Lookup by row identifier.
    Id(MealId),
    /// Lookup by display name.
    Name(String),
}

impl fmt::Display for MealKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "ID {id}"),
            Self::Name(name) => write!(f, "name {name}"),
        }
    }
}

impl From<MealId> for MealKey {
    fn from(id: MealId) -> Self {
        Self::Id(id)
    }
}

/// Errors that can occur in the persistence gateway.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No meal matches the key.
    #[error("Meal with {0} not found")]
    NotFound(MealKey),

    /// The meal exists but has been soft-deleted.
    #[error("Meal with {0} has been deleted")]
    AlreadyDeleted(MealKey),

    /// A live meal with this name already exists.
    #[error("Meal with name '{0}' already exists")]
    DuplicateName(String),

    /// Input or stored attributes do not form a valid meal.
    #[error("invalid meal: {0}")]
    InvalidMeal(#[from] MealError),

    /// A stored counter does not fit the domain type.
    #[error("corrupt statistics for meal {0}")]
    CorruptStats(MealId),

    /// The store has handed out every representable meal id.
    #[error("meal id space exhausted after {0}")]
    IdsExhausted(MealId),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
