//! Dice limits, query defaults, and numeric thresholds.
//!
//! The engine accepts any die with at least [`MIN_DIE_SIDES`] faces. The
//! outer surfaces (CLI, HTTP API, sweep) additionally restrict input to the
//! polyhedral set in [`SUPPORTED_DIE_SIDES`] and at most [`MAX_ROLLS`] rolls,
//! which bounds the worst-case table at 100 × 2001 cells.

/// Smallest die the engine can model (a coin).
pub const MIN_DIE_SIDES: u32 = 2;

/// Die sizes offered by the outer surfaces.
pub const SUPPORTED_DIE_SIDES: [u32; 6] = [4, 6, 8, 10, 12, 20];

/// Upper bound on the roll count accepted by the outer surfaces.
pub const MAX_ROLLS: u32 = 100;

pub const DEFAULT_DIE_SIDES: u32 = 6;
pub const DEFAULT_TARGET: u32 = 25;
pub const DEFAULT_MAX_ROLLS: u32 = 10;

/// Tolerance used when comparing probabilities that should agree exactly
/// up to floating-point accumulation error.
pub const PROBABILITY_TOLERANCE: f64 = 1e-9;

/// Rows narrower than this are filled sequentially; wider rows are split
/// across the rayon pool.
pub const PARALLEL_MIN_SUMS: usize = 512;

/// Decimal places used when printing probabilities.
pub const DISPLAY_PRECISION: usize = 6;

/// Default HTTP port for `dice-odds-server`.
pub const DEFAULT_PORT: u16 = 9000;

/// Highest sum reachable with `max_rolls` rolls of a `sides`-faced die.
#[inline(always)]
pub fn max_reachable_sum(sides: u32, max_rolls: u32) -> u64 {
    sides as u64 * max_rolls as u64
}

/// Whether `sides` is one of the die sizes offered by the outer surfaces.
#[inline]
pub fn is_supported_die(sides: u32) -> bool {
    SUPPORTED_DIE_SIDES.contains(&sides)
}
