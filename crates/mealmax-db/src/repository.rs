//! The persistence gateway contract.
//!
//! [`MealRepository`] is the only surface the battle engine and the binary
//! see. Lookups return explicit [`DbError::NotFound`] /
//! [`DbError::AlreadyDeleted`] results instead of empty values, and a
//! soft-deleted meal is never returned from any read.
//!
//! Methods return `impl Future + Send` so implementations can be used from
//! multi-threaded runtimes while keeping static dispatch.

use core::future::Future;

use mealmax_types::{
    BattleOutcome, Difficulty, LeaderboardEntry, LeaderboardSort, Meal, MealError, MealId,
};

use crate::error::DbError;

/// CRUD, soft-delete and statistics operations over stored meals.
pub trait MealRepository: Send + Sync {
    /// Insert a new meal and return it with its assigned identifier.
    ///
    /// The price must be strictly positive at creation time.
    ///
    /// # Errors
    ///
    /// [`DbError::InvalidMeal`] for bad attributes, [`DbError::DuplicateName`]
    /// if a live meal already uses `name`.
    fn create_meal(
        &self,
        name: &str,
        cuisine: &str,
        price: f64,
        difficulty: Difficulty,
    ) -> impl Future<Output = Result<Meal, DbError>> + Send;

    /// Fetch a live meal by identifier.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] or [`DbError::AlreadyDeleted`].
    fn get_meal_by_id(&self, id: MealId) -> impl Future<Output = Result<Meal, DbError>> + Send;

    /// Fetch a live meal by display name.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] or [`DbError::AlreadyDeleted`].
    fn get_meal_by_name(&self, name: &str) -> impl Future<Output = Result<Meal, DbError>> + Send;

    /// All live meals ordered by identifier.
    fn get_all_meals(&self) -> impl Future<Output = Result<Vec<Meal>, DbError>> + Send;

    /// Soft-delete a meal.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] or [`DbError::AlreadyDeleted`].
    fn delete_meal(&self, id: MealId) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Remove every meal and restart identifier assignment.
    fn clear_meals(&self) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Live meals with at least one battle, best first by `sort`.
    fn get_leaderboard(
        &self,
        sort: LeaderboardSort,
    ) -> impl Future<Output = Result<Vec<LeaderboardEntry>, DbError>> + Send;

    /// Apply one battle outcome to a meal's counters.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] or [`DbError::AlreadyDeleted`].
    fn record_battle_outcome(
        &self,
        id: MealId,
        outcome: BattleOutcome,
    ) -> impl Future<Output = Result<(), DbError>> + Send;

    /// Record a win for `winner` then a loss for `loser` as one unit: either
    /// both counters move or neither does.
    ///
    /// # Errors
    ///
    /// Any error [`MealRepository::record_battle_outcome`] can return, for
    /// either meal.
    fn record_bout(
        &self,
        winner: MealId,
        loser: MealId,
    ) -> impl Future<Output = Result<(), DbError>> + Send;
}

/// Validate the attributes of a meal about to be created.
///
/// Creation is stricter than [`Meal::new`]: a zero price is rejected.
pub(crate) fn validate_new_meal(
    name: &str,
    cuisine: &str,
    price: f64,
    difficulty: Difficulty,
) -> Result<(), DbError> {
    if price <= 0.0 {
        return Err(MealError::InvalidAttribute {
            attribute: "price",
            reason: format!("{price} must be a positive number"),
        }
        .into());
    }
    Meal::new(MealId(0), name, cuisine, price, difficulty)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_meals_need_a_positive_price() {
        assert!(validate_new_meal("Pizza", "Italian", 0.0, Difficulty::Low).is_err());
        assert!(validate_new_meal("Pizza", "Italian", -3.0, Difficulty::Low).is_err());
        assert!(validate_new_meal("Pizza", "Italian", 9.5, Difficulty::Low).is_ok());
    }

    #[test]
    fn new_meals_need_a_name() {
        let err = validate_new_meal("", "Italian", 9.5, Difficulty::Low);
        assert!(matches!(err, Err(DbError::InvalidMeal(_))));
    }
}
