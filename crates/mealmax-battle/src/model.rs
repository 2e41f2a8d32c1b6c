//! The battle engine: combatant staging and battle resolution.
//!
//! ## Staging
//!
//! ```text
//! EMPTY --stage--> ONE_STAGED --stage--> TWO_STAGED --stage--> CapacityExceeded
//!   ^                   ^                    |
//!   |                   +------resolve-------+
//!   +--------------- clear (from any state)
//! ```
//!
//! ## Resolution
//!
//! 1. Score both combatants (see [`battle_score`]).
//! 2. `delta = |score_1 - score_2| / 100`.
//! 3. Draw a fresh fraction from the [`RandomSource`].
//! 4. The nominal winner is the first combatant if its score is strictly
//!    higher, otherwise the second. If `delta <= fraction` the decision
//!    flips to the other combatant.
//! 5. Record win/loss through the [`MealRepository`] as one unit, then
//!    drop the loser from staging.
//!
//! A failure at step 3 or 5 leaves staging untouched.
//!
//! The engine is single-owner (`&mut self`, no internal locking); give each
//! session its own instance.

use mealmax_db::MealRepository;
use mealmax_types::Meal;

use crate::error::BattleError;
use crate::random::RandomSource;
use crate::score::battle_score;

/// Number of combatants a battle needs.
pub const MAX_COMBATANTS: usize = 2;

/// Divisor that brings the score gap onto the random fraction's scale.
const DELTA_SCALE: f64 = 100.0;

/// The outcome of one resolved battle, for callers that need more than the
/// winner's name.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleReport {
    /// The winning meal (still staged).
    pub winner: Meal,
    /// The losing meal (removed from staging).
    pub loser: Meal,
    /// Score of the first-staged combatant.
    pub score_1: f64,
    /// Score of the second-staged combatant.
    pub score_2: f64,
    /// Normalised score gap.
    pub delta: f64,
    /// The random fraction drawn for this battle.
    pub random_fraction: f64,
}

/// Whether the first-staged combatant wins.
///
/// The strict `>` makes the second combatant the nominal winner on a tie,
/// and a zero delta then always flips, so exact ties go to the first.
const fn first_combatant_wins(
    score_1: f64,
    score_2: f64,
    delta: f64,
    random_fraction: f64,
) -> bool {
    let first_is_nominal = score_1 > score_2;
    let flip = delta <= random_fraction;
    first_is_nominal != flip
}

/// Stages up to two meals and resolves battles between them.
#[derive(Debug)]
pub struct BattleModel<R, S> {
    combatants: Vec<Meal>,
    random: R,
    store: S,
}

impl<R, S> BattleModel<R, S>
where
    R: RandomSource,
    S: MealRepository,
{
    /// Create an engine with nothing staged.
    pub fn new(random: R, store: S) -> Self {
        Self {
            combatants: Vec::with_capacity(MAX_COMBATANTS),
            random,
            store,
        }
    }

    /// Stage a meal for the next battle.
    ///
    /// # Errors
    ///
    /// Returns [`BattleError::CapacityExceeded`] if two meals are already
    /// staged; the meal is not added.
    pub fn stage(&mut self, meal: Meal) -> Result<(), BattleError> {
        if self.combatants.len() >= MAX_COMBATANTS {
            tracing::error!(
                meal = meal.name(),
                "Attempted to add combatant while combatant list is full"
            );
            return Err(BattleError::CapacityExceeded);
        }

        tracing::info!(meal = meal.name(), "Adding combatant to combatants list");
        self.combatants.push(meal);
        Ok(())
    }

    /// The staged meals in the order they were staged.
    pub fn combatants(&self) -> &[Meal] {
        &self.combatants
    }

    /// Remove every staged meal. Clearing an empty list is a no-op.
    pub fn clear_combatants(&mut self) {
        tracing::info!(count = self.combatants.len(), "Clearing the combatants list");
        self.combatants.clear();
    }

    /// Resolve a battle between the two staged meals and return the
    /// winner's name.
    ///
    /// # Errors
    ///
    /// See [`BattleModel::resolve_report`].
    pub async fn resolve(&mut self) -> Result<String, BattleError> {
        let report = self.resolve_report().await?;
        Ok(report.winner.name().to_owned())
    }

    /// Resolve a battle and return the full [`BattleReport`].
    ///
    /// # Errors
    ///
    /// - [`BattleError::InsufficientCombatants`] unless exactly two meals are
    ///   staged.
    /// - [`BattleError::RandomSource`] if no fraction could be drawn.
    /// - [`BattleError::Persistence`] if the result could not be recorded.
    ///
    /// Staging is unchanged on every error.
    pub async fn resolve_report(&mut self) -> Result<BattleReport, BattleError> {
        let [first, second] = self.combatants.as_slice() else {
            tracing::error!(
                staged = self.combatants.len(),
                "Not enough combatants to start a battle"
            );
            return Err(BattleError::InsufficientCombatants {
                staged: self.combatants.len(),
            });
        };

        tracing::info!(
            first = first.name(),
            second = second.name(),
            "Two meals enter, one meal leaves!"
        );

        let score_1 = battle_score(first);
        let score_2 = battle_score(second);
        let delta = (score_1 - score_2).abs() / DELTA_SCALE;
        tracing::debug!(score_1, score_2, delta, "Computed battle scores");

        let random_fraction = self.random.fetch_fraction().await?;
        tracing::debug!(random_fraction, "Drew random fraction");

        let (winner, loser) = if first_combatant_wins(score_1, score_2, delta, random_fraction) {
            (first, second)
        } else {
            (second, first)
        };

        self.store.record_bout(winner.id(), loser.id()).await?;

        let report = BattleReport {
            winner: winner.clone(),
            loser: loser.clone(),
            score_1,
            score_2,
            delta,
            random_fraction,
        };

        // Only the winner stays staged for the next bout.
        self.combatants.clear();
        self.combatants.push(report.winner.clone());

        tracing::info!(
            winner = report.winner.name(),
            loser = report.loser.name(),
            "Battle resolved"
        );
        Ok(report)
    }
}
