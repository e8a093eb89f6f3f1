//! Query layer: validation, caching, and reductions over PMF tables.
//!
//! [`ProbabilityCalculator`] answers the three questions asked of the engine:
//!
//! | Query | Table | Reduction |
//! |-------|-------|-----------|
//! | win | [`build_win_table`] (sums ≤ T+1) | Σ_r P(r, T) |
//! | partial win | same table | Σ_r P(r, T-1) + P(r, T+1), T-1 term only if T ≥ 2 |
//! | curve | [`build_cdf_table`] (sums ≤ M) | Σ_r P(r, t) for t = 1..=M |
//!
//! Win / partial-win pairs are memoized in the calculator's own
//! [`ProbabilityCache`]; curves are not cached.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

use crate::cache::{CacheKey, ProbabilityCache};
use crate::constants::{is_supported_die, MAX_ROLLS};
use crate::density::table::{build_cdf_table, build_win_table, PmfTable};
use crate::error::{ProbabilityError, Result};
use crate::types::{CdfCurve, CdfPoint, Die, QueryResult, RollCount, Target};

/// Check the engine's own preconditions: F ≥ 2, R ≥ 1, 1 ≤ T ≤ F·R.
pub fn validate_query(sides: u32, target: u32, max_rolls: u32) -> Result<(Die, Target, RollCount)> {
    let die = Die::new(sides)?;
    let rolls = RollCount::new(max_rolls)?;
    let target = Target::new(target, die, rolls)?;
    Ok((die, target, rolls))
}

/// [`validate_query`] plus the limits of the outer surfaces: a supported die
/// size and at most [`MAX_ROLLS`] rolls.
pub fn validate_request(sides: u32, target: u32, max_rolls: u32) -> Result<(Die, Target, RollCount)> {
    check_surface_limits(sides, max_rolls)?;
    validate_query(sides, target, max_rolls)
}

/// Limits shared by every outer surface, checked before any engine precondition.
pub fn check_surface_limits(sides: u32, max_rolls: u32) -> Result<()> {
    if !is_supported_die(sides) {
        return Err(ProbabilityError::UnsupportedDie { sides });
    }
    if !(1..=MAX_ROLLS).contains(&max_rolls) {
        return Err(ProbabilityError::RollCountOutOfRange {
            max_rolls,
            limit: MAX_ROLLS,
        });
    }
    Ok(())
}

/// Exact win / partial-win / curve queries with a private memo.
///
/// `Send + Sync`: share it behind an `Arc` across server handlers or rayon
/// workers.
#[derive(Debug, Default)]
pub struct ProbabilityCalculator {
    cache: ProbabilityCache,
    tables_built: AtomicUsize,
}

impl ProbabilityCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Calculator backed by a caller-supplied (possibly pre-filled) cache.
    pub fn with_cache(cache: ProbabilityCache) -> Self {
        Self {
            cache,
            tables_built: AtomicUsize::new(0),
        }
    }

    /// Probability of landing exactly on `target` within `max_rolls` rolls,
    /// and of landing one below or one above it.
    pub fn win_and_partial_win(&self, sides: u32, target: u32, max_rolls: u32) -> Result<(f64, f64)> {
        let (die, target, rolls) = validate_query(sides, target, max_rolls)?;

        let key = CacheKey {
            sides,
            max_rolls,
            target: target.get(),
        };
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let table = self.record(build_win_table(die, target.get(), rolls));
        let pair = reduce_win_partial(&table, target.get() as usize);
        debug!(
            sides,
            target = target.get(),
            max_rolls,
            win = pair.0,
            partial_win = pair.1,
            "computed win/partial-win"
        );

        self.cache.insert(key, pair);
        Ok(pair)
    }

    /// [`Self::win_and_partial_win`] with the derived loss probability.
    pub fn query(&self, sides: u32, target: u32, max_rolls: u32) -> Result<QueryResult> {
        let (win, partial_win) = self.win_and_partial_win(sides, target, max_rolls)?;
        Ok(QueryResult::from_win_partial(win, partial_win))
    }

    /// Roll-summed exact-landing probability for every target 1..=`max_target`.
    ///
    /// One table up to `max_target` serves every point: a cell never depends on
    /// the table's upper bound, so reading column t here gives the same value
    /// as building a separate table truncated at t.
    pub fn cdf_curve(&self, sides: u32, max_target: u32, max_rolls: u32) -> Result<CdfCurve> {
        let die = Die::new(sides)?;
        let rolls = RollCount::new(max_rolls)?;
        if max_target < 1 {
            return Err(ProbabilityError::InvalidCurveBound { max_target });
        }

        let table = self.record(build_cdf_table(die, max_target, rolls));
        let points = (1..=max_target)
            .map(|t| CdfPoint {
                target: t,
                cumulative_probability: table.column_sum(t as usize),
            })
            .collect();

        Ok(CdfCurve { points })
    }

    /// Number of PMF tables this calculator has built.
    pub fn tables_built(&self) -> usize {
        self.tables_built.load(Ordering::Relaxed)
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub(crate) fn record(&self, table: PmfTable) -> PmfTable {
        self.tables_built.fetch_add(1, Ordering::Relaxed);
        table
    }

    /// Store a pair computed outside [`Self::win_and_partial_win`].
    pub(crate) fn seed(&self, key: CacheKey, pair: (f64, f64)) {
        self.cache.insert(key, pair);
    }
}

/// Reduce a table that tracks sums up to at least `target + 1` to
/// (win, partial win). Partial win is accumulated per roll: under-by-one
/// first (skipped for target 1), then over-by-one.
pub(crate) fn reduce_win_partial(table: &PmfTable, target: usize) -> (f64, f64) {
    let win = table.column_sum(target);

    let mut partial = 0.0f64;
    for r in 1..=table.max_rolls() {
        if target >= 2 {
            partial += table.get(r, target - 1);
        }
        partial += table.get(r, target + 1);
    }

    (win, partial)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::PROBABILITY_TOLERANCE;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < PROBABILITY_TOLERANCE
    }

    #[test]
    fn test_seven_on_d6() {
        let calc = ProbabilityCalculator::new();
        assert!(matches!(
            calc.win_and_partial_win(6, 7, 1),
            Err(ProbabilityError::InvalidTarget { .. })
        ));

        let (win2, _) = calc.win_and_partial_win(6, 7, 2).unwrap();
        assert!(close(win2, 6.0 / 36.0), "win={win2}");
    }

    #[test]
    fn test_target_one_skips_under_term() {
        let calc = ProbabilityCalculator::new();
        let (win, partial) = calc.win_and_partial_win(6, 1, 1).unwrap();
        assert_eq!(win, 1.0 / 6.0);
        assert_eq!(partial, 1.0 / 6.0);
    }

    #[test]
    fn test_partial_win_counts_both_neighbours() {
        // d4, target 3, one roll: win = P(3), partial = P(2) + P(4).
        let calc = ProbabilityCalculator::new();
        let (win, partial) = calc.win_and_partial_win(4, 3, 1).unwrap();
        assert!(close(win, 0.25));
        assert!(close(partial, 0.5));
    }

    #[test]
    fn test_second_query_hits_cache() {
        let calc = ProbabilityCalculator::new();
        let first = calc.win_and_partial_win(6, 25, 10).unwrap();
        assert_eq!(calc.tables_built(), 1);

        let second = calc.win_and_partial_win(6, 25, 10).unwrap();
        assert_eq!(calc.tables_built(), 1);
        assert_eq!(first.0.to_bits(), second.0.to_bits());
        assert_eq!(first.1.to_bits(), second.1.to_bits());
        assert_eq!(calc.cache_len(), 1);
    }

    #[test]
    fn test_different_die_does_not_share_cache_entry() {
        let calc = ProbabilityCalculator::new();
        let d6 = calc.win_and_partial_win(6, 7, 2).unwrap();
        let d8 = calc.win_and_partial_win(8, 7, 2).unwrap();
        assert_eq!(calc.tables_built(), 2);
        assert_ne!(d6, d8);
    }

    #[test]
    fn test_prefilled_cache_is_returned_verbatim() {
        let cache = ProbabilityCache::new();
        cache.insert(
            CacheKey {
                sides: 6,
                max_rolls: 3,
                target: 4,
            },
            (0.125, 0.375),
        );
        let calc = ProbabilityCalculator::with_cache(cache);
        assert_eq!(calc.win_and_partial_win(6, 4, 3).unwrap(), (0.125, 0.375));
        assert_eq!(calc.tables_built(), 0);
    }

    #[test]
    fn test_invalid_input_builds_nothing() {
        let calc = ProbabilityCalculator::new();
        assert_eq!(
            calc.win_and_partial_win(1, 1, 1),
            Err(ProbabilityError::InvalidDie { sides: 1 })
        );
        assert_eq!(
            calc.win_and_partial_win(6, 1, 0),
            Err(ProbabilityError::InvalidRollCount { max_rolls: 0 })
        );
        assert_eq!(
            calc.win_and_partial_win(6, 13, 2),
            Err(ProbabilityError::InvalidTarget {
                target: 13,
                max_target: 12
            })
        );
        assert_eq!(
            calc.cdf_curve(6, 0, 2),
            Err(ProbabilityError::InvalidCurveBound { max_target: 0 })
        );
        assert_eq!(calc.tables_built(), 0);
        assert_eq!(calc.cache_len(), 0);
    }

    #[test]
    fn test_query_sums_to_one() {
        let calc = ProbabilityCalculator::new();
        let r = calc.query(6, 25, 10).unwrap();
        assert!(close(r.win + r.partial_win + r.loss, 1.0));
    }

    #[test]
    fn test_curve_matches_per_target_tables() {
        let calc = ProbabilityCalculator::new();
        let curve = calc.cdf_curve(6, 30, 8).unwrap();
        assert_eq!(curve.len(), 30);
        assert_eq!(calc.tables_built(), 1);

        let die = Die::new(6).unwrap();
        let rolls = RollCount::new(8).unwrap();
        for point in curve.iter() {
            let own = build_cdf_table(die, point.target, rolls).column_sum(point.target as usize);
            assert_eq!(
                point.cumulative_probability.to_bits(),
                own.to_bits(),
                "target={}",
                point.target
            );
        }
    }

    #[test]
    fn test_curve_is_not_cached() {
        let calc = ProbabilityCalculator::new();
        calc.cdf_curve(6, 10, 3).unwrap();
        calc.cdf_curve(6, 10, 3).unwrap();
        assert_eq!(calc.tables_built(), 2);
        assert_eq!(calc.cache_len(), 0);
    }

    #[test]
    fn test_surface_limits() {
        assert_eq!(
            validate_request(7, 1, 1).map(|_| ()),
            Err(ProbabilityError::UnsupportedDie { sides: 7 })
        );
        assert_eq!(
            validate_request(6, 1, 101).map(|_| ()),
            Err(ProbabilityError::RollCountOutOfRange {
                max_rolls: 101,
                limit: 100
            })
        );
        assert!(validate_request(20, 2000, 100).is_ok());
        assert!(validate_query(7, 1, 1).is_ok());
    }
}
