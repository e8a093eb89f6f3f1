//! Core value types: die, roll bound, target, and query results.
//!
//! [`Die`], [`RollCount`] and [`Target`] are validated on construction, so the
//! engine in [`crate::density::table`] can index without re-checking them.
//! Results ([`QueryResult`], [`CdfCurve`]) are plain immutable values
//! produced fresh per query.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DISPLAY_PRECISION, MIN_DIE_SIDES};
use crate::error::{ProbabilityError, Result};

/// A fair die with faces 1..=sides, each with probability 1/sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Die {
    sides: u32,
}

impl Die {
    pub fn new(sides: u32) -> Result<Self> {
        if sides < MIN_DIE_SIDES {
            return Err(ProbabilityError::InvalidDie { sides });
        }
        Ok(Self { sides })
    }

    #[inline(always)]
    pub fn sides(self) -> u32 {
        self.sides
    }

    /// Probability of any single face.
    #[inline(always)]
    pub fn face_probability(self) -> f64 {
        1.0 / self.sides as f64
    }
}

/// Maximum number of rolls considered, R ≥ 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RollCount(u32);

impl RollCount {
    pub fn new(max_rolls: u32) -> Result<Self> {
        if max_rolls < 1 {
            return Err(ProbabilityError::InvalidRollCount { max_rolls });
        }
        Ok(Self(max_rolls))
    }

    #[inline(always)]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// A target sum in [1, sides × max_rolls].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Target(u32);

impl Target {
    /// Accepts `target` only if it is reachable with `rolls` rolls of `die`.
    pub fn new(target: u32, die: Die, rolls: RollCount) -> Result<Self> {
        let max_target = die.sides() as u64 * rolls.get() as u64;
        if target < 1 || target as u64 > max_target {
            return Err(ProbabilityError::InvalidTarget { target, max_target });
        }
        Ok(Self(target))
    }

    #[inline(always)]
    pub fn get(self) -> u32 {
        self.0
    }
}

/// Win / partial-win / loss split for one (die, target, max rolls) query.
///
/// `loss` is derived as `1 - win - partial_win`, so the three always sum to 1.
/// Because partial win adds the "one under" and "one over" landings across
/// all rolls, small dice can push `win + partial_win` above 1, making `loss`
/// negative. This is the literal computed quantity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    pub win: f64,
    pub partial_win: f64,
    pub loss: f64,
}

impl QueryResult {
    pub fn from_win_partial(win: f64, partial_win: f64) -> Self {
        Self {
            win,
            partial_win,
            loss: 1.0 - win - partial_win,
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Win Probability:         {:.*}",
            DISPLAY_PRECISION, self.win
        )?;
        writeln!(
            f,
            "Partial Win Probability: {:.*}",
            DISPLAY_PRECISION, self.partial_win
        )?;
        write!(
            f,
            "Loss Probability:        {:.*}",
            DISPLAY_PRECISION, self.loss
        )
    }
}

/// One point of the per-target curve.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CdfPoint {
    pub target: u32,
    pub cumulative_probability: f64,
}

/// Roll-summed exact-landing probability for targets 1..=max_target, in order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CdfCurve {
    pub points: Vec<CdfPoint>,
}

impl CdfCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CdfPoint> {
        self.points.iter()
    }

    /// Probability for `target`, or `None` if it lies outside the curve.
    pub fn probability_at(&self, target: u32) -> Option<f64> {
        let idx = (target as usize).checked_sub(1)?;
        self.points.get(idx).map(|p| p.cumulative_probability)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_die_rejects_fewer_than_two_sides() {
        assert_eq!(Die::new(0), Err(ProbabilityError::InvalidDie { sides: 0 }));
        assert_eq!(Die::new(1), Err(ProbabilityError::InvalidDie { sides: 1 }));
        assert_eq!(Die::new(2).map(Die::sides), Ok(2));
    }

    #[test]
    fn test_roll_count_rejects_zero() {
        assert_eq!(
            RollCount::new(0),
            Err(ProbabilityError::InvalidRollCount { max_rolls: 0 })
        );
        assert_eq!(RollCount::new(1).map(RollCount::get), Ok(1));
    }

    #[test]
    fn test_target_bounds() {
        let die = Die::new(6).unwrap();
        let rolls = RollCount::new(2).unwrap();
        assert!(Target::new(1, die, rolls).is_ok());
        assert!(Target::new(12, die, rolls).is_ok());
        assert_eq!(
            Target::new(13, die, rolls),
            Err(ProbabilityError::InvalidTarget {
                target: 13,
                max_target: 12
            })
        );
        assert!(matches!(
            Target::new(0, die, rolls),
            Err(ProbabilityError::InvalidTarget { .. })
        ));
    }

    #[test]
    fn test_query_result_display_uses_six_decimals() {
        let r = QueryResult::from_win_partial(1.0 / 6.0, 1.0 / 6.0);
        let text = r.to_string();
        assert!(text.contains("Win Probability:         0.166667"));
        assert!(text.contains("Loss Probability:        0.666667"));
    }

    #[test]
    fn test_curve_probability_at() {
        let curve = CdfCurve {
            points: vec![
                CdfPoint {
                    target: 1,
                    cumulative_probability: 0.25,
                },
                CdfPoint {
                    target: 2,
                    cumulative_probability: 0.5,
                },
            ],
        };
        assert_eq!(curve.probability_at(0), None);
        assert_eq!(curve.probability_at(2), Some(0.5));
        assert_eq!(curve.probability_at(3), None);
    }
}
