//! Battle score computation.
//!
//! ```text
//! score = price * chars(cuisine) - difficulty_modifier(difficulty)
//! ```
//!
//! Harder meals carry a smaller penalty, so between otherwise equal meals
//! the harder one scores higher. The function is pure and works on any
//! [`Meal`], staged or not.

use mealmax_types::{Difficulty, Meal};

/// Penalty subtracted from the raw score for a difficulty level.
pub const fn difficulty_modifier(difficulty: Difficulty) -> f64 {
    match difficulty {
        Difficulty::High => 1.0,
        Difficulty::Med => 2.0,
        Difficulty::Low => 3.0,
    }
}

/// Number of characters (not bytes) in the cuisine label, as a float.
fn cuisine_length(meal: &Meal) -> f64 {
    let chars = meal.cuisine().chars().count();
    u32::try_from(chars).map_or(f64::from(u32::MAX), f64::from)
}

/// Deterministic battle score for a meal.
pub fn battle_score(meal: &Meal) -> f64 {
    meal.price() * cuisine_length(meal) - difficulty_modifier(meal.difficulty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mealmax_types::MealId;

    use super::*;

    fn meal(cuisine: &str, price: f64, difficulty: Difficulty) -> Meal {
        Meal::new(MealId(1), "Test", cuisine, price, difficulty).unwrap()
    }

    #[test]
    fn italian_low_scores_67() {
        let score = battle_score(&meal("Italian", 10.0, Difficulty::Low));
        assert!((score - 67.0).abs() < f64::EPSILON);
    }

    #[test]
    fn japanese_med_scores_118() {
        let score = battle_score(&meal("Japanese", 15.0, Difficulty::Med));
        assert!((score - 118.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_cuisine_scores_only_the_penalty() {
        let score = battle_score(&meal("", 50.0, Difficulty::High));
        assert!((score + 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cuisine_length_counts_characters() {
        // "Café" is 4 characters but 5 bytes.
        let score = battle_score(&meal("Café", 1.0, Difficulty::High));
        assert!((score - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn harder_meals_score_higher_all_else_equal() {
        let low = battle_score(&meal("Thai", 5.0, Difficulty::Low));
        let med = battle_score(&meal("Thai", 5.0, Difficulty::Med));
        let high = battle_score(&meal("Thai", 5.0, Difficulty::High));
        assert!(low < med && med < high);
    }

    #[test]
    fn score_is_repeatable() {
        let m = meal("Mexican", 8.5, Difficulty::Med);
        assert!((battle_score(&m) - battle_score(&m)).abs() < f64::EPSILON);
    }
}
