//! Battle engine for MealMax.
//!
//! Two staged meals are scored with a fixed formula; a random fraction from
//! an external source decides whether a close contest goes to the lower
//! scorer. Results are written back through the persistence gateway.
//!
//! # Modules
//!
//! - [`model`] -- [`BattleModel`]: combatant staging and resolution
//! - [`score`] -- The pure battle score function
//! - [`random`] -- [`RandomSource`] trait, random.org client, fixed source
//! - [`error`] -- Battle and random source errors

pub mod error;
pub mod model;
pub mod random;
pub mod score;

pub use error::{BattleError, RandomSourceError};
pub use model::{BattleModel, BattleReport, MAX_COMBATANTS};
pub use random::{
    DEFAULT_RANDOM_ORG_URL, FixedRandomSource, RandomOrgClient, RandomOrgConfig, RandomSource,
    parse_fraction,
};
pub use score::{battle_score, difficulty_modifier};
