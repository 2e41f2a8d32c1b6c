//! Shared type definitions for MealMax.
//!
//! This crate is the single source of truth for the values that flow
//! between the persistence gateway, the battle engine and the binary.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe wrappers for row identifiers
//! - [`meal`] -- The validated [`Meal`] entity and [`Difficulty`]
//! - [`stats`] -- Battle outcomes, counters and leaderboard rows

pub mod ids;
pub mod meal;
pub mod stats;

// Re-export all public types at crate root for convenience.
pub use ids::MealId;
pub use meal::{Difficulty, Meal, MealError};
pub use stats::{BattleOutcome, InvalidSort, LeaderboardEntry, LeaderboardSort, MealStats};
