//! Command-line parsing and command execution.
//!
//! ```text
//! mealmax-arena add <name> <cuisine> <price> <LOW|MED|HIGH>
//! mealmax-arena delete <id>
//! mealmax-arena list
//! mealmax-arena battle <meal-a> <meal-b>
//! mealmax-arena leaderboard [wins|win_pct]
//! mealmax-arena clear
//! ```
//!
//! Arguments are parsed by `clap`. Execution is generic over the
//! [`MealRepository`] and [`RandomSource`], so tests drive it with the
//! in-memory store and a fixed draw.

use clap::{Parser, Subcommand};
use mealmax_battle::{BattleModel, RandomSource};
use mealmax_db::MealRepository;
use mealmax_types::{Difficulty, LeaderboardSort, MealId};
use tracing::info;

use crate::error::ArenaError;

/// Manage meals, run battles and show the leaderboard.
#[derive(Debug, Parser)]
#[command(name = "mealmax-arena")]
#[command(about = "Meal battles backed by PostgreSQL and random.org", long_about = None)]
#[command(version)]
pub struct Cli {
    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// A parsed arena command.
#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Create a meal
    Add {
        /// Display name, unique among live meals
        name: String,
        /// Cuisine label
        cuisine: String,
        /// Price, must be positive
        #[arg(allow_negative_numbers = true)]
        price: f64,
        /// Preparation difficulty: LOW, MED or HIGH
        difficulty: Difficulty,
    },
    /// Soft-delete a meal
    Delete {
        /// Meal id
        #[arg(value_name = "ID")]
        id: MealId,
    },
    /// List live meals
    List,
    /// Battle two meals by name
    Battle {
        /// First combatant
        first: String,
        /// Second combatant
        second: String,
    },
    /// Show the leaderboard
    Leaderboard {
        /// Sort key: wins or win_pct
        #[arg(default_value = "wins")]
        sort: LeaderboardSort,
    },
    /// Remove every meal
    Clear,
}

impl Command {
    /// Run the command and return its JSON output.
    ///
    /// # Errors
    ///
    /// Propagates storage and battle errors unchanged.
    pub async fn execute<R, S>(self, random: R, store: S) -> Result<serde_json::Value, ArenaError>
    where
        R: RandomSource,
        S: MealRepository,
    {
        match self {
            Self::Add {
                name,
                cuisine,
                price,
                difficulty,
            } => {
                let meal = store.create_meal(&name, &cuisine, price, difficulty).await?;
                Ok(serde_json::to_value(meal)?)
            }
            Self::Delete { id } => {
                store.delete_meal(id).await?;
                Ok(serde_json::json!({ "deleted": id }))
            }
            Self::List => Ok(serde_json::to_value(store.get_all_meals().await?)?),
            Self::Battle { first, second } => {
                let first = store.get_meal_by_name(&first).await?;
                let second = store.get_meal_by_name(&second).await?;

                let mut model = BattleModel::new(random, store);
                model.stage(first)?;
                model.stage(second)?;
                let report = model.resolve_report().await?;

                info!(
                    winner = report.winner.name(),
                    delta = report.delta,
                    random_fraction = report.random_fraction,
                    "Battle complete"
                );
                Ok(serde_json::json!({
                    "winner": report.winner.name(),
                    "loser": report.loser.name(),
                    "scores": [report.score_1, report.score_2],
                    "delta": report.delta,
                    "random_fraction": report.random_fraction,
                }))
            }
            Self::Leaderboard { sort } => {
                Ok(serde_json::to_value(store.get_leaderboard(sort).await?)?)
            }
            Self::Clear => {
                store.clear_meals().await?;
                Ok(serde_json::json!({ "cleared": true }))
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use mealmax_battle::FixedRandomSource;
    use mealmax_db::{DbError, MemoryMealStore};

    use super::*;

    fn parse(args: &[&str]) -> Result<Command, clap::Error> {
        Cli::try_parse_from(core::iter::once("mealmax-arena").chain(args.iter().copied()))
            .map(|cli| cli.command)
    }

    #[test]
    fn parses_add() {
        let cmd = parse(&["add", "Pizza", "Italian", "10.5", "LOW"]).unwrap();
        assert_eq!(
            cmd,
            Command::Add {
                name: "Pizza".to_owned(),
                cuisine: "Italian".to_owned(),
                price: 10.5,
                difficulty: Difficulty::Low,
            }
        );
    }

    #[test]
    fn negative_price_reaches_validation() {
        let cmd = parse(&["add", "Pizza", "Italian", "-3", "LOW"]).unwrap();
        assert!(matches!(cmd, Command::Add { price, .. } if price < 0.0));
    }

    #[test]
    fn parses_remaining_commands() {
        assert_eq!(parse(&["delete", "3"]).unwrap(), Command::Delete { id: MealId(3) });
        assert_eq!(parse(&["list"]).unwrap(), Command::List);
        assert_eq!(
            parse(&["battle", "Pizza", "Sushi"]).unwrap(),
            Command::Battle {
                first: "Pizza".to_owned(),
                second: "Sushi".to_owned(),
            }
        );
        assert_eq!(
            parse(&["leaderboard"]).unwrap(),
            Command::Leaderboard {
                sort: LeaderboardSort::Wins,
            }
        );
        assert_eq!(
            parse(&["leaderboard", "win_pct"]).unwrap(),
            Command::Leaderboard {
                sort: LeaderboardSort::WinPct,
            }
        );
        assert_eq!(parse(&["clear"]).unwrap(), Command::Clear);
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["fight"]).is_err());
        assert!(parse(&["battle", "Pizza"]).is_err());
        assert!(parse(&["add", "Pizza", "Italian", "cheap", "LOW"]).is_err());
        assert!(parse(&["add", "Pizza", "Italian", "10", "EXTREME"]).is_err());
        assert!(parse(&["leaderboard", "battles"]).is_err());
        assert!(parse(&["delete", "three"]).is_err());
    }

    #[test]
    fn bad_difficulty_reports_the_value() {
        let err = parse(&["add", "Pizza", "Italian", "10", "EXTREME"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
        assert!(err.to_string().contains("EXTREME"));
    }

    #[tokio::test]
    async fn battle_command_records_result() {
        let store = MemoryMealStore::new();
        let random = FixedRandomSource::new(0.15);
        for args in [
            ["add", "Pizza", "Italian", "10", "LOW"],
            ["add", "Sushi", "Japanese", "15", "MED"],
        ] {
            parse(&args)
                .unwrap()
                .execute(random, store.clone())
                .await
                .unwrap();
        }

        let out = parse(&["battle", "Pizza", "Sushi"])
            .unwrap()
            .execute(random, store.clone())
            .await
            .unwrap();
        assert_eq!(out["winner"], "Sushi");
        assert_eq!(out["loser"], "Pizza");

        let board = Command::Leaderboard {
            sort: LeaderboardSort::Wins,
        }
        .execute(random, store)
        .await
        .unwrap();
        assert_eq!(board[0]["meal"]["name"], "Sushi");
        assert_eq!(board[0]["wins"], 1);
    }

    #[tokio::test]
    async fn battle_with_deleted_meal_fails() {
        let store = MemoryMealStore::new();
        let random = FixedRandomSource::new(0.15);
        let pizza = store
            .create_meal("Pizza", "Italian", 10.0, Difficulty::Low)
            .await
            .unwrap();
        store
            .create_meal("Sushi", "Japanese", 15.0, Difficulty::Med)
            .await
            .unwrap();
        store.delete_meal(pizza.id()).await.unwrap();

        let err = Command::Battle {
            first: "Pizza".to_owned(),
            second: "Sushi".to_owned(),
        }
        .execute(random, store)
        .await
        .unwrap_err();
        assert!(matches!(err, ArenaError::Db(DbError::AlreadyDeleted(_))));
    }
}
