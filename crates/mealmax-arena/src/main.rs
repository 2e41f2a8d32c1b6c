//! Command-line entry point for MealMax.
//!
//! Wires the persistence gateway, the random.org client and the battle
//! engine together and runs one command per invocation.
//!
//! # Startup Sequence
//!
//! 1. Parse the command line
//! 2. Load configuration (`mealmax.yaml` + environment overrides)
//! 3. Initialize structured logging (tracing)
//! 4. Connect to `PostgreSQL` and run migrations (`database.url` is required)
//! 5. Execute the command and print its JSON result

mod command;
mod config;
mod error;

use clap::Parser;
use mealmax_battle::RandomOrgClient;
use mealmax_db::PostgresPool;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::command::Cli;
use crate::config::ArenaConfig;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, connection or the command fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Parse the command line.
    let cli = Cli::parse();

    // 2. Load configuration.
    let config = ArenaConfig::load()?;

    // 3. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!(
        random_url = config.random.url,
        random_timeout_secs = config.random.timeout_secs,
        "mealmax-arena starting"
    );

    let random = RandomOrgClient::new(&config.random.client_config())?;

    // 4. Connect to PostgreSQL.
    let pool = PostgresPool::connect(&config.database.postgres()?).await?;
    pool.run_migrations().await?;

    // 5. Run.
    let result = cli.command.execute(random, pool.meal_store()).await;
    pool.close().await;
    let output = result?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
