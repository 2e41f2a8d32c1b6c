//! Persistence gateway for MealMax meals and battle statistics.
//!
//! Everything above this crate talks to storage through the
//! [`MealRepository`] trait. Two implementations are provided:
//!
//! ```text
//! MealRepository
//!     |
//!     +-- PgMealStore      (PostgreSQL via sqlx, `meals` table)
//!     |
//!     +-- MemoryMealStore  (in-process table, used by tests)
//! ```
//!
//! # Modules
//!
//! - [`repository`] -- The gateway trait
//! - [`postgres`] -- `PostgreSQL` connection pool, configuration and migrations
//! - [`meal_store`] -- `PostgreSQL`-backed meal operations
//! - [`memory`] -- In-memory meal operations
//! - [`error`] -- Shared error types

pub mod error;
pub mod meal_store;
pub mod memory;
pub mod postgres;
pub mod repository;

// Re-export primary types for convenience.
pub use error::{DbError, MealKey};
pub use meal_store::PgMealStore;
pub use memory::MemoryMealStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use repository::MealRepository;
