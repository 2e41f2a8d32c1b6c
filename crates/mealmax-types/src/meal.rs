//! The meal entity and its validated attributes.
//!
//! A [`Meal`] is a frozen value: every attribute is checked once in
//! [`Meal::new`] and there are no mutators afterwards. Staged combatants,
//! rows read back from storage and freshly created meals all go through the
//! same constructor, so an invalid meal can never reach the battle engine.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ids::MealId;

/// Errors raised while constructing a [`Meal`] or parsing its attributes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MealError {
    /// An attribute failed validation.
    #[error("invalid {attribute}: {reason}")]
    InvalidAttribute {
        /// The attribute that was rejected (`name`, `price`, `difficulty`).
        attribute: &'static str,
        /// Why it was rejected.
        reason: String,
    },
}

impl MealError {
    fn invalid(attribute: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            attribute,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Difficulty
// ---------------------------------------------------------------------------

/// How hard a meal is to prepare.
///
/// Stored and parsed as the upper-case strings `LOW`, `MED` and `HIGH`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    /// Quick to prepare.
    Low,
    /// Moderate effort.
    Med,
    /// Demanding preparation.
    High,
}

impl Difficulty {
    /// All difficulty levels, easiest first.
    pub const ALL: [Self; 3] = [Self::Low, Self::Med, Self::High];

    /// The canonical upper-case label.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Med => "MED",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = MealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "LOW" => Ok(Self::Low),
            "MED" => Ok(Self::Med),
            "HIGH" => Ok(Self::High),
            other => Err(MealError::invalid(
                "difficulty",
                format!("{other:?} is not one of LOW, MED, HIGH"),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Meal
// ---------------------------------------------------------------------------

/// A meal that can be stored, looked up and staged for battle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Meal {
    id: MealId,
    name: String,
    cuisine: String,
    price: f64,
    difficulty: Difficulty,
}

impl Meal {
    /// Build a validated meal.
    ///
    /// # Errors
    ///
    /// Returns [`MealError::InvalidAttribute`] if `name` is empty or `price`
    /// is negative or not a finite number.
    pub fn new(
        id: MealId,
        name: impl Into<String>,
        cuisine: impl Into<String>,
        price: f64,
        difficulty: Difficulty,
    ) -> Result<Self, MealError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(MealError::invalid("name", "must not be empty"));
        }
        if !price.is_finite() || price < 0.0 {
            return Err(MealError::invalid(
                "price",
                format!("{price} must be a non-negative number"),
            ));
        }

        Ok(Self {
            id,
            name,
            cuisine: cuisine.into(),
            price,
            difficulty,
        })
    }

    /// Build a meal from raw text attributes, parsing the difficulty label.
    ///
    /// # Errors
    ///
    /// Returns [`MealError::InvalidAttribute`] for an unknown difficulty or
    /// any of the conditions checked by [`Meal::new`].
    pub fn from_parts(
        id: MealId,
        name: impl Into<String>,
        cuisine: impl Into<String>,
        price: f64,
        difficulty: &str,
    ) -> Result<Self, MealError> {
        let difficulty = difficulty.parse()?;
        Self::new(id, name, cuisine, price, difficulty)
    }

    /// The gateway-assigned identifier.
    pub const fn id(&self) -> MealId {
        self.id
    }

    /// The display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The cuisine label (possibly empty).
    pub fn cuisine(&self) -> &str {
        &self.cuisine
    }

    /// The price, never negative.
    pub const fn price(&self) -> f64 {
        self.price
    }

    /// The preparation difficulty.
    pub const fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_parses_canonical_labels() {
        for level in Difficulty::ALL {
            assert_eq!(level.as_str().parse::<Difficulty>().unwrap(), level);
        }
    }

    #[test]
    fn difficulty_rejects_unknown_and_lowercase_labels() {
        assert!("EXTREME".parse::<Difficulty>().is_err());
        assert!("low".parse::<Difficulty>().is_err());
        assert!("".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_serializes_upper_case() {
        let json = serde_json::to_string(&Difficulty::Med).unwrap();
        assert_eq!(json, "\"MED\"");
    }

    #[test]
    fn meal_accepts_zero_price_and_empty_cuisine() {
        let meal = Meal::new(MealId(1), "Water", "", 0.0, Difficulty::Low).unwrap();
        assert_eq!(meal.cuisine(), "");
        assert!(meal.price().abs() < f64::EPSILON);
    }

    #[test]
    fn meal_rejects_negative_price() {
        let err = Meal::new(MealId(1), "Pizza", "Italian", -1.0, Difficulty::Low).unwrap_err();
        assert!(matches!(
            err,
            MealError::InvalidAttribute {
                attribute: "price",
                ..
            }
        ));
    }

    #[test]
    fn meal_rejects_nan_price() {
        assert!(Meal::new(MealId(1), "Pizza", "Italian", f64::NAN, Difficulty::Low).is_err());
    }

    #[test]
    fn meal_rejects_empty_name() {
        let err = Meal::new(MealId(1), "  ", "Italian", 10.0, Difficulty::Low).unwrap_err();
        assert!(matches!(
            err,
            MealError::InvalidAttribute {
                attribute: "name",
                ..
            }
        ));
    }

    #[test]
    fn meal_from_parts_rejects_bad_difficulty() {
        let err = Meal::from_parts(MealId(1), "Pizza", "Italian", 10.0, "EXTREME").unwrap_err();
        assert!(matches!(
            err,
            MealError::InvalidAttribute {
                attribute: "difficulty",
                ..
            }
        ));
    }

    #[test]
    fn meals_with_identical_fields_are_equal() {
        let a = Meal::from_parts(MealId(2), "Sushi", "Japanese", 15.0, "MED").unwrap();
        let b = Meal::new(MealId(2), "Sushi", "Japanese", 15.0, Difficulty::Med).unwrap();
        assert_eq!(a, b);
    }
}
