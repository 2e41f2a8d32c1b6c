//! Battle statistics and leaderboard types.

use core::cmp::Ordering;
use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::meal::Meal;

/// The result of one battle from a single meal's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BattleOutcome {
    /// The meal won; both its battle and win counters increase.
    Win,
    /// The meal lost; only its battle counter increases.
    Loss,
}

impl BattleOutcome {
    /// Whether this outcome counts towards the win counter.
    pub const fn is_win(self) -> bool {
        matches!(self, Self::Win)
    }
}

impl fmt::Display for BattleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Win => "win",
            Self::Loss => "loss",
        })
    }
}

/// Error returned when a leaderboard sort key is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid sort_by parameter: {0}")]
pub struct InvalidSort(pub String);

/// Ordering key for the leaderboard (always descending).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardSort {
    /// Most wins first.
    #[default]
    Wins,
    /// Highest win percentage first.
    WinPct,
}

impl FromStr for LeaderboardSort {
    type Err = InvalidSort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wins" => Ok(Self::Wins),
            "win_pct" => Ok(Self::WinPct),
            other => Err(InvalidSort(other.to_owned())),
        }
    }
}

/// Win/loss counters for a stored meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MealStats {
    /// Battles fought.
    pub battles: u64,
    /// Battles won.
    pub wins: u64,
}

impl MealStats {
    /// Counters after applying one more outcome, or `None` on overflow.
    #[must_use]
    pub fn record(self, outcome: BattleOutcome) -> Option<Self> {
        let battles = self.battles.checked_add(1)?;
        let wins = if outcome.is_win() {
            self.wins.checked_add(1)?
        } else {
            self.wins
        };
        Some(Self { battles, wins })
    }

    /// Win percentage rounded to one decimal place; `0.0` before any battle.
    #[allow(clippy::cast_precision_loss)]
    pub fn win_pct(self) -> f64 {
        if self.battles == 0 {
            return 0.0;
        }
        let ratio = self.wins as f64 / self.battles as f64;
        (ratio * 1000.0).round() / 10.0
    }

    /// Compare exact win ratios (`wins / battles`) without rounding.
    ///
    /// Meals with no battles rank as a ratio of zero.
    pub fn cmp_win_ratio(self, other: Self) -> Ordering {
        // u64 * u64 always fits in u128.
        let lhs = u128::from(self.wins).saturating_mul(u128::from(other.battles.max(1)));
        let rhs = u128::from(other.wins).saturating_mul(u128::from(self.battles.max(1)));
        lhs.cmp(&rhs)
    }
}

/// One row of the leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    /// The ranked meal.
    pub meal: Meal,
    /// Battles fought.
    pub battles: u64,
    /// Battles won.
    pub wins: u64,
    /// Win percentage, one decimal place.
    pub win_pct: f64,
}

impl LeaderboardEntry {
    /// Build an entry, deriving `win_pct` from the counters.
    pub fn new(meal: Meal, stats: MealStats) -> Self {
        Self {
            meal,
            battles: stats.battles,
            wins: stats.wins,
            win_pct: stats.win_pct(),
        }
    }

    /// The raw counters behind this entry.
    pub const fn stats(&self) -> MealStats {
        MealStats {
            battles: self.battles,
            wins: self.wins,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn record_win_bumps_both_counters() {
        let stats = MealStats::default().record(BattleOutcome::Win).unwrap();
        assert_eq!(stats, MealStats { battles: 1, wins: 1 });
    }

    #[test]
    fn record_loss_bumps_battles_only() {
        let stats = MealStats { battles: 2, wins: 1 }
            .record(BattleOutcome::Loss)
            .unwrap();
        assert_eq!(stats, MealStats { battles: 3, wins: 1 });
    }

    #[test]
    fn record_reports_overflow() {
        let stats = MealStats {
            battles: u64::MAX,
            wins: 0,
        };
        assert!(stats.record(BattleOutcome::Loss).is_none());
    }

    #[test]
    fn win_pct_rounds_to_one_decimal() {
        let stats = MealStats { battles: 3, wins: 2 };
        assert!((stats.win_pct() - 66.7).abs() < 1e-9);
        assert!(MealStats::default().win_pct().abs() < f64::EPSILON);
    }

    #[test]
    fn win_ratio_compares_exact_values() {
        let two_thirds = MealStats { battles: 3, wins: 2 };
        let slightly_more = MealStats {
            battles: 1000,
            wins: 667,
        };
        // Both display as 66.7.
        assert!((two_thirds.win_pct() - slightly_more.win_pct()).abs() < f64::EPSILON);
        assert_eq!(two_thirds.cmp_win_ratio(slightly_more), Ordering::Less);
        assert_eq!(
            two_thirds.cmp_win_ratio(MealStats { battles: 6, wins: 4 }),
            Ordering::Equal
        );
        assert_eq!(
            MealStats::default().cmp_win_ratio(MealStats { battles: 1, wins: 0 }),
            Ordering::Equal
        );
    }

    #[test]
    fn sort_key_parsing() {
        assert_eq!("wins".parse::<LeaderboardSort>().unwrap(), LeaderboardSort::Wins);
        assert_eq!(
            "win_pct".parse::<LeaderboardSort>().unwrap(),
            LeaderboardSort::WinPct
        );
        assert_eq!(
            "battles".parse::<LeaderboardSort>().unwrap_err(),
            InvalidSort("battles".to_owned())
        );
    }

    #[test]
    fn outcome_labels() {
        assert_eq!(BattleOutcome::Win.to_string(), "win");
        assert_eq!(BattleOutcome::Loss.to_string(), "loss");
    }
}
