//! `PostgreSQL` implementation of [`MealRepository`].
//!
//! Reads always look at the `deleted` flag first so a soft-deleted row is
//! reported as [`DbError::AlreadyDeleted`] rather than returned. Statistics
//! updates lock the row (`FOR UPDATE`) inside a transaction; a transaction
//! that is dropped before commit rolls back.

use mealmax_types::{
    BattleOutcome, Difficulty, LeaderboardEntry, LeaderboardSort, Meal, MealId, MealStats,
};
use sqlx::{PgConnection, PgPool};

use crate::error::{DbError, MealKey};
use crate::repository::{MealRepository, validate_new_meal};

/// Operations on the `meals` table.
#[derive(Debug, Clone)]
pub struct PgMealStore {
    pool: PgPool,
}

impl PgMealStore {
    /// Create a new meal store bound to a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A row from the `meals` table.
#[derive(Debug, Clone, sqlx::FromRow)]
struct MealRow {
    id: i64,
    name: String,
    cuisine: String,
    price: f64,
    difficulty: String,
    deleted: bool,
}

impl MealRow {
    /// Convert a live row into a [`Meal`], or report it deleted.
    fn into_live_meal(self, key: MealKey) -> Result<Meal, DbError> {
        if self.deleted {
            tracing::info!(%key, "Meal has been deleted");
            return Err(DbError::AlreadyDeleted(key));
        }
        Ok(Meal::from_parts(
            MealId(self.id),
            self.name,
            self.cuisine,
            self.price,
            &self.difficulty,
        )?)
    }
}

/// A leaderboard row: meal attributes plus counters.
#[derive(Debug, Clone, sqlx::FromRow)]
struct LeaderboardRow {
    id: i64,
    name: String,
    cuisine: String,
    price: f64,
    difficulty: String,
    battles: i64,
    wins: i64,
}

impl TryFrom<LeaderboardRow> for LeaderboardEntry {
    type Error = DbError;

    fn try_from(row: LeaderboardRow) -> Result<Self, Self::Error> {
        let id = MealId(row.id);
        let stats = MealStats {
            battles: u64::try_from(row.battles)
                .ok()
                .ok_or(DbError::CorruptStats(id))?,
            wins: u64::try_from(row.wins)
                .ok()
                .ok_or(DbError::CorruptStats(id))?,
        };
        let meal = Meal::from_parts(id, row.name, row.cuisine, row.price, &row.difficulty)?;
        Ok(Self::new(meal, stats))
    }
}

/// Lock a meal row and apply one outcome to it.
async fn apply_outcome(
    conn: &mut PgConnection,
    id: MealId,
    outcome: BattleOutcome,
) -> Result<(), DbError> {
    let row: Option<(bool,)> = sqlx::query_as(r"SELECT deleted FROM meals WHERE id = $1 FOR UPDATE")
        .bind(id.into_inner())
        .fetch_optional(&mut *conn)
        .await?;

    match row {
        None => {
            tracing::info!(meal_id = %id, "Meal not found");
            return Err(DbError::NotFound(id.into()));
        }
        Some((true,)) => {
            tracing::info!(meal_id = %id, "Meal has been deleted");
            return Err(DbError::AlreadyDeleted(id.into()));
        }
        Some((false,)) => {}
    }

    sqlx::query(
        r"UPDATE meals
          SET battles = battles + 1,
              wins = wins + CASE WHEN $2 THEN 1 ELSE 0 END
          WHERE id = $1",
    )
    .bind(id.into_inner())
    .bind(outcome.is_win())
    .execute(&mut *conn)
    .await?;

    tracing::debug!(meal_id = %id, %outcome, "Recorded battle outcome");
    Ok(())
}

/// Map a unique-index violation on insert to [`DbError::DuplicateName`].
fn map_insert_error(err: sqlx::Error, name: &str) -> DbError {
    let duplicate = err
        .as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation());
    if duplicate {
        tracing::error!(name, "Duplicate meal name");
        DbError::DuplicateName(name.to_owned())
    } else {
        tracing::error!(error = %err, "Database error");
        DbError::Postgres(err)
    }
}

impl MealRepository for PgMealStore {
    async fn create_meal(
        &self,
        name: &str,
        cuisine: &str,
        price: f64,
        difficulty: Difficulty,
    ) -> Result<Meal, DbError> {
        validate_new_meal(name, cuisine, price, difficulty)?;

        let (id,): (i64,) = sqlx::query_as(
            r"INSERT INTO meals (name, cuisine, price, difficulty)
              VALUES ($1, $2, $3, $4)
              RETURNING id",
        )
        .bind(name)
        .bind(cuisine)
        .bind(price)
        .bind(difficulty.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_insert_error(e, name))?;

        tracing::info!(meal_id = id, name, "Meal successfully added to the database");
        Ok(Meal::new(MealId(id), name, cuisine, price, difficulty)?)
    }

    async fn get_meal_by_id(&self, id: MealId) -> Result<Meal, DbError> {
        let row = sqlx::query_as::<_, MealRow>(
            r"SELECT id, name, cuisine, price, difficulty, deleted
              FROM meals
              WHERE id = $1",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => row.into_live_meal(id.into()),
            None => {
                tracing::info!(meal_id = %id, "Meal not found");
                Err(DbError::NotFound(id.into()))
            }
        }
    }

    async fn get_meal_by_name(&self, name: &str) -> Result<Meal, DbError> {
        // A live row wins over deleted rows that share the name.
        let row = sqlx::query_as::<_, MealRow>(
            r"SELECT id, name, cuisine, price, difficulty, deleted
              FROM meals
              WHERE name = $1
              ORDER BY deleted ASC, id DESC
              LIMIT 1",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        let key = MealKey::Name(name.to_owned());
        match row {
            Some(row) => row.into_live_meal(key),
            None => {
                tracing::info!(name, "Meal not found");
                Err(DbError::NotFound(key))
            }
        }
    }

    async fn get_all_meals(&self) -> Result<Vec<Meal>, DbError> {
        let rows = sqlx::query_as::<_, MealRow>(
            r"SELECT id, name, cuisine, price, difficulty, deleted
              FROM meals
              WHERE deleted = FALSE
              ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        let meals = rows
            .into_iter()
            .map(|row| {
                let key = MealKey::Id(MealId(row.id));
                row.into_live_meal(key)
            })
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(count = meals.len(), "All meals retrieved successfully");
        Ok(meals)
    }

    async fn delete_meal(&self, id: MealId) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(bool,)> =
            sqlx::query_as(r"SELECT deleted FROM meals WHERE id = $1 FOR UPDATE")
                .bind(id.into_inner())
                .fetch_optional(&mut *tx)
                .await?;

        match row {
            None => {
                tracing::info!(meal_id = %id, "Meal not found");
                return Err(DbError::NotFound(id.into()));
            }
            Some((true,)) => {
                tracing::info!(meal_id = %id, "Meal has already been deleted");
                return Err(DbError::AlreadyDeleted(id.into()));
            }
            Some((false,)) => {}
        }

        sqlx::query(r"UPDATE meals SET deleted = TRUE WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(meal_id = %id, "Meal marked as deleted");
        Ok(())
    }

    async fn clear_meals(&self) -> Result<(), DbError> {
        sqlx::query(r"TRUNCATE meals RESTART IDENTITY")
            .execute(&self.pool)
            .await?;
        tracing::info!("Meals cleared successfully");
        Ok(())
    }

    async fn get_leaderboard(
        &self,
        sort: LeaderboardSort,
    ) -> Result<Vec<LeaderboardEntry>, DbError> {
        let order_by = match sort {
            LeaderboardSort::Wins => "wins DESC",
            LeaderboardSort::WinPct => "(wins::float8 / battles::float8) DESC",
        };
        let query = format!(
            "SELECT id, name, cuisine, price, difficulty, battles, wins
             FROM meals
             WHERE deleted = FALSE AND battles > 0
             ORDER BY {order_by}, id ASC"
        );

        let rows = sqlx::query_as::<_, LeaderboardRow>(&query)
            .fetch_all(&self.pool)
            .await?;

        let entries = rows
            .into_iter()
            .map(LeaderboardEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        tracing::info!(?sort, count = entries.len(), "Leaderboard retrieved successfully");
        Ok(entries)
    }

    async fn record_battle_outcome(
        &self,
        id: MealId,
        outcome: BattleOutcome,
    ) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        apply_outcome(&mut tx, id, outcome).await?;
        tx.commit().await?;
        Ok(())
    }

    async fn record_bout(&self, winner: MealId, loser: MealId) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;
        apply_outcome(&mut tx, winner, BattleOutcome::Win).await?;
        apply_outcome(&mut tx, loser, BattleOutcome::Loss).await?;
        tx.commit().await?;

        tracing::info!(%winner, %loser, "Recorded battle result");
        Ok(())
    }
}
