//! Target sweep: win / partial-win / loss for every reachable target of one die.
//!
//! A single untruncated table serves all targets (cells never depend on the
//! table's bound), and the per-target reductions run on the rayon pool. Each
//! result is seeded into the calculator's cache, so later point queries for
//! the same die and roll bound are free.

use std::io::{self, Write};
use std::time::Instant;

use rayon::prelude::*;
use serde::Serialize;
use tracing::info;

use crate::api_computations::{reduce_win_partial, ProbabilityCalculator};
use crate::cache::CacheKey;
use crate::constants::{max_reachable_sum, DISPLAY_PRECISION};
use crate::density::table::build_full_table;
use crate::error::Result;
use crate::types::{Die, QueryResult, RollCount};

/// One row of a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct TargetOutcome {
    pub target: u32,
    #[serde(flatten)]
    pub result: QueryResult,
}

/// Evaluate every target 1..=sides·max_rolls. Rows are ordered by target.
pub fn sweep_targets(
    calc: &ProbabilityCalculator,
    sides: u32,
    max_rolls: u32,
) -> Result<Vec<TargetOutcome>> {
    let die = Die::new(sides)?;
    let rolls = RollCount::new(max_rolls)?;
    let max_target = u32::try_from(max_reachable_sum(sides, max_rolls)).unwrap_or(u32::MAX);

    let t_start = Instant::now();
    let table = calc.record(build_full_table(die, rolls));

    let rows: Vec<TargetOutcome> = (1..=max_target)
        .into_par_iter()
        .map(|target| {
            let pair = reduce_win_partial(&table, target as usize);
            calc.seed(
                CacheKey {
                    sides,
                    max_rolls,
                    target,
                },
                pair,
            );
            TargetOutcome {
                target,
                result: QueryResult::from_win_partial(pair.0, pair.1),
            }
        })
        .collect();

    info!(
        sides,
        max_rolls,
        targets = rows.len(),
        "sweep complete in {:.3}s",
        t_start.elapsed().as_secs_f64()
    );

    Ok(rows)
}

/// Write rows as `target,win,partial_win,loss` CSV.
pub fn write_csv<W: Write>(rows: &[TargetOutcome], mut out: W) -> io::Result<()> {
    writeln!(out, "target,win,partial_win,loss")?;
    for row in rows {
        writeln!(
            out,
            "{},{:.p$},{:.p$},{:.p$}",
            row.target,
            row.result.win,
            row.result.partial_win,
            row.result.loss,
            p = DISPLAY_PRECISION
        )?;
    }
    out.flush()
}
