//! Roll-by-roll PMF tables — exact distribution of the running sum.
//!
//! Cell (r, s) holds P(the running sum after exactly r rolls equals s). Row 1
//! is the uniform face distribution; each later row is the previous row
//! convolved with one more die:
//!
//! ```text
//! P(1, s) = 1/F                                  for s in [1, min(F, U)]
//! P(r, s) = Σ_{face=1..F, s-face>0} P(r-1, s-face) / F
//! ```
//!
//! Sums above the upper bound U are never stored, so any mass that would
//! land there is dropped (truncation). Truncated rows therefore sum to less
//! than 1 once r·F exceeds U; [`build_full_table`] sets U = R·F and keeps
//! every row normalized.
//!
//! Cell (r, s) depends only on row r-1 at sums below s, with a fixed face
//! order, so the value at (r, s) is identical for every U ≥ s and for
//! parallel or sequential fills.

use rayon::prelude::*;
use tracing::debug;

use crate::constants::PARALLEL_MIN_SUMS;
use crate::types::{Die, RollCount};

/// Dense PMF grid over rolls 1..=max_rolls and sums 0..=upper_bound.
///
/// Layout: row-major, `cells[(r - 1) * stride + s]` with `stride = upper_bound + 1`.
/// Column 0 is always zero (at least one roll has been made).
#[derive(Clone, Debug, PartialEq)]
pub struct PmfTable {
    sides: u32,
    max_rolls: usize,
    upper_bound: usize,
    stride: usize,
    cells: Vec<f64>,
}

impl PmfTable {
    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn max_rolls(&self) -> usize {
        self.max_rolls
    }

    /// Largest sum tracked by this table.
    pub fn upper_bound(&self) -> usize {
        self.upper_bound
    }

    /// P(sum after exactly `roll` rolls == `sum`). Zero outside the table.
    #[inline]
    pub fn get(&self, roll: usize, sum: usize) -> f64 {
        if roll == 0 || roll > self.max_rolls || sum > self.upper_bound {
            return 0.0;
        }
        self.cells[(roll - 1) * self.stride + sum]
    }

    /// The distribution after exactly `roll` rolls, indexed by sum.
    pub fn row(&self, roll: usize) -> Option<&[f64]> {
        if roll == 0 || roll > self.max_rolls {
            return None;
        }
        let start = (roll - 1) * self.stride;
        Some(&self.cells[start..start + self.stride])
    }

    /// Total mass kept in row `roll`. Equals 1 unless truncation dropped some.
    pub fn row_mass(&self, roll: usize) -> f64 {
        self.row(roll).map_or(0.0, |row| row.iter().sum())
    }

    /// Σ_{r=1..R} P(r, sum): probability of landing exactly on `sum` at some roll.
    ///
    /// Landing on a given sum can happen at most once (every roll adds ≥ 1),
    /// so the per-roll events are disjoint and the sum needs no correction.
    pub fn column_sum(&self, sum: usize) -> f64 {
        (1..=self.max_rolls).map(|r| self.get(r, sum)).sum()
    }
}

/// Build the PMF table for `rolls` rolls of `die`, tracking sums 0..=`upper_bound`.
///
/// Rows at least [`PARALLEL_MIN_SUMS`] wide are filled on the rayon pool.
pub fn build_table(die: Die, upper_bound: usize, rolls: RollCount) -> PmfTable {
    build_table_with(die, upper_bound, rolls, true)
}

/// Table for the win / partial-win query: sums up to `target + 1`, so that
/// "one over" landings are visible.
pub fn build_win_table(die: Die, target: u32, rolls: RollCount) -> PmfTable {
    build_table(die, target as usize + 1, rolls)
}

/// Table for one point of the per-target curve: sums up to `target`.
pub fn build_cdf_table(die: Die, target: u32, rolls: RollCount) -> PmfTable {
    build_table(die, target as usize, rolls)
}

/// Untruncated table: sums up to `rolls × sides`, every row sums to 1.
pub fn build_full_table(die: Die, rolls: RollCount) -> PmfTable {
    let upper = die.sides() as usize * rolls.get() as usize;
    build_table(die, upper, rolls)
}

fn build_table_with(die: Die, upper_bound: usize, rolls: RollCount, parallel: bool) -> PmfTable {
    let sides = die.sides() as usize;
    let max_rolls = rolls.get() as usize;
    let stride = upper_bound + 1;
    let mut cells = vec![0.0f64; max_rolls * stride];

    // Row 1: uniform over the faces that fit under the bound.
    let p_face = die.face_probability();
    for s in 1..=sides.min(upper_bound) {
        cells[s] = p_face;
    }

    let parallel = parallel && stride >= PARALLEL_MIN_SUMS;
    let divisor = die.sides() as f64;
    for r in 1..max_rolls {
        let (filled, rest) = cells.split_at_mut(r * stride);
        let prev = &filled[(r - 1) * stride..];
        let next = &mut rest[..stride];

        if parallel {
            next.par_iter_mut()
                .enumerate()
                .skip(1)
                .for_each(|(s, cell)| *cell = convolve_cell(prev, s, sides, divisor));
        } else {
            for (s, cell) in next.iter_mut().enumerate().skip(1) {
                *cell = convolve_cell(prev, s, sides, divisor);
            }
        }
    }

    debug!(
        sides,
        upper_bound,
        max_rolls,
        parallel,
        "built PMF table ({} cells)",
        cells.len()
    );

    PmfTable {
        sides: die.sides(),
        max_rolls,
        upper_bound,
        stride,
        cells,
    }
}

/// One cell of the recurrence. Faces with `sum - face <= 0` contribute nothing:
/// a previous row (≥ 1 roll) never has mass at sum 0.
#[inline(always)]
fn convolve_cell(prev: &[f64], sum: usize, sides: usize, divisor: f64) -> f64 {
    let mut acc = 0.0f64;
    for face in 1..=sides.min(sum - 1) {
        acc += prev[sum - face] / divisor;
    }
    acc
}
