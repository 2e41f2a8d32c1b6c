//! In-process implementation of [`MealRepository`].
//!
//! Mirrors the `PostgreSQL` store's semantics (soft delete, live-name
//! uniqueness, strictly positive creation price, leaderboard ordering)
//! without a database. Used by the engine and command tests.
//! Clones share the same underlying table.

use std::sync::Arc;

use mealmax_types::{
    BattleOutcome, Difficulty, LeaderboardEntry, LeaderboardSort, Meal, MealId, MealStats,
};
use tokio::sync::Mutex;

use crate::error::{DbError, MealKey};
use crate::repository::{MealRepository, validate_new_meal};

/// One stored meal plus its soft-delete flag and counters.
#[derive(Debug, Clone)]
struct StoredMeal {
    meal: Meal,
    deleted: bool,
    stats: MealStats,
}

#[derive(Debug, Default)]
struct Table {
    last_id: i64,
    rows: Vec<StoredMeal>,
}

impl Table {
    fn live_row(&self, id: MealId) -> Result<&StoredMeal, DbError> {
        let row = self
            .rows
            .iter()
            .find(|row| row.meal.id() == id)
            .ok_or(DbError::NotFound(MealKey::Id(id)))?;
        if row.deleted {
            return Err(DbError::AlreadyDeleted(MealKey::Id(id)));
        }
        Ok(row)
    }

    fn live_row_mut(&mut self, id: MealId) -> Result<&mut StoredMeal, DbError> {
        let row = self
            .rows
            .iter_mut()
            .find(|row| row.meal.id() == id)
            .ok_or(DbError::NotFound(MealKey::Id(id)))?;
        if row.deleted {
            return Err(DbError::AlreadyDeleted(MealKey::Id(id)));
        }
        Ok(row)
    }

    /// Counters after `outcome`, without applying them.
    fn next_stats(&self, id: MealId, outcome: BattleOutcome) -> Result<MealStats, DbError> {
        self.live_row(id)?
            .stats
            .record(outcome)
            .ok_or(DbError::CorruptStats(id))
    }
}

/// A [`MealRepository`] backed by a shared in-memory table.
#[derive(Debug, Clone, Default)]
pub struct MemoryMealStore {
    table: Arc<Mutex<Table>>,
}

impl MemoryMealStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Battle counters for a live meal.
    ///
    /// # Errors
    ///
    /// [`DbError::NotFound`] or [`DbError::AlreadyDeleted`].
    pub async fn stats(&self, id: MealId) -> Result<MealStats, DbError> {
        let table = self.table.lock().await;
        Ok(table.live_row(id)?.stats)
    }
}

impl MealRepository for MemoryMealStore {
    async fn create_meal(
        &self,
        name: &str,
        cuisine: &str,
        price: f64,
        difficulty: Difficulty,
    ) -> Result<Meal, DbError> {
        validate_new_meal(name, cuisine, price, difficulty)?;

        let mut table = self.table.lock().await;
        if table
            .rows
            .iter()
            .any(|row| !row.deleted && row.meal.name() == name)
        {
            tracing::error!(name, "Duplicate meal name");
            return Err(DbError::DuplicateName(name.to_owned()));
        }

        let id = table
            .last_id
            .checked_add(1)
            .ok_or(DbError::IdsExhausted(MealId(table.last_id)))?;
        let meal = Meal::new(MealId(id), name, cuisine, price, difficulty)?;
        table.last_id = id;
        table.rows.push(StoredMeal {
            meal: meal.clone(),
            deleted: false,
            stats: MealStats::default(),
        });

        tracing::info!(meal_id = id, name, "Meal successfully added to the store");
        Ok(meal)
    }

    async fn get_meal_by_id(&self, id: MealId) -> Result<Meal, DbError> {
        let table = self.table.lock().await;
        Ok(table.live_row(id)?.meal.clone())
    }

    async fn get_meal_by_name(&self, name: &str) -> Result<Meal, DbError> {
        let table = self.table.lock().await;
        let mut found_deleted = false;
        for row in table.rows.iter().filter(|row| row.meal.name() == name) {
            if !row.deleted {
                return Ok(row.meal.clone());
            }
            found_deleted = true;
        }

        let key = MealKey::Name(name.to_owned());
        if found_deleted {
            Err(DbError::AlreadyDeleted(key))
        } else {
            Err(DbError::NotFound(key))
        }
    }

    async fn get_all_meals(&self) -> Result<Vec<Meal>, DbError> {
        let table = self.table.lock().await;
        Ok(table
            .rows
            .iter()
            .filter(|row| !row.deleted)
            .map(|row| row.meal.clone())
            .collect())
    }

    async fn delete_meal(&self, id: MealId) -> Result<(), DbError> {
        let mut table = self.table.lock().await;
        table.live_row_mut(id)?.deleted = true;
        tracing::info!(meal_id = %id, "Meal marked as deleted");
        Ok(())
    }

    async fn clear_meals(&self) -> Result<(), DbError> {
        let mut table = self.table.lock().await;
        *table = Table::default();
        tracing::info!("Meals cleared successfully");
        Ok(())
    }

    async fn get_leaderboard(
        &self,
        sort: LeaderboardSort,
    ) -> Result<Vec<LeaderboardEntry>, DbError> {
        let table = self.table.lock().await;
        let mut entries: Vec<LeaderboardEntry> = table
            .rows
            .iter()
            .filter(|row| !row.deleted && row.stats.battles > 0)
            .map(|row| LeaderboardEntry::new(row.meal.clone(), row.stats))
            .collect();

        match sort {
            LeaderboardSort::Wins => entries.sort_by(|a, b| {
                b.wins
                    .cmp(&a.wins)
                    .then_with(|| a.meal.id().cmp(&b.meal.id()))
            }),
            LeaderboardSort::WinPct => entries.sort_by(|a, b| {
                b.stats()
                    .cmp_win_ratio(a.stats())
                    .then_with(|| a.meal.id().cmp(&b.meal.id()))
            }),
        }
        Ok(entries)
    }

    async fn record_battle_outcome(
        &self,
        id: MealId,
        outcome: BattleOutcome,
    ) -> Result<(), DbError> {
        let mut table = self.table.lock().await;
        let stats = table.next_stats(id, outcome)?;
        table.live_row_mut(id)?.stats = stats;
        tracing::debug!(meal_id = %id, %outcome, "Recorded battle outcome");
        Ok(())
    }

    async fn record_bout(&self, winner: MealId, loser: MealId) -> Result<(), DbError> {
        let mut table = self.table.lock().await;

        // Check both rows before touching either.
        let won = table.next_stats(winner, BattleOutcome::Win)?;
        table.next_stats(loser, BattleOutcome::Loss)?;

        table.live_row_mut(winner)?.stats = won;
        let lost = table.next_stats(loser, BattleOutcome::Loss)?;
        table.live_row_mut(loser)?.stats = lost;

        tracing::info!(%winner, %loser, "Recorded battle result");
        Ok(())
    }
}
