//! # Dice Odds — exact target-sum probabilities for repeated dice rolls
//!
//! Roll one fair F-sided die up to R times, keeping a running sum. What is the
//! chance the running sum lands exactly on a target T at some roll? Exactly
//! one below or above it? This crate answers those questions exactly, by
//! convolving the full distribution roll by roll, never by sampling.
//!
//! ## Layout
//!
//! | Layer | Module | Description |
//! |-------|--------|-------------|
//! | Engine | [`density::table`] | PMF of the running sum after exactly r rolls, truncated at an explicit upper sum |
//! | Queries | [`api_computations`] | Validation, win / partial-win reduction, per-target curve |
//! | Memo | [`cache`] | Win / partial-win results keyed by (sides, max rolls, target) |
//! | Sweep | [`sweep`] | Every reachable target for one die, in parallel |
//! | Server | [`server`] | Axum JSON API over a shared calculator |
//!
//! ## Quantities
//!
//! - **win** = Σ_{r=1..R} P(sum after r rolls = T)
//! - **partial win** = Σ_{r=1..R} P(sum after r rolls = T-1) + P(sum after r rolls = T+1),
//!   without the T-1 term when T = 1
//! - **loss** = 1 - win - partial win
//! - **curve** point t = Σ_{r=1..R} P(sum after r rolls = t). Despite the "CDF"
//!   name this is the roll-summed exact-landing probability, not P(sum ≥ t).
//!
//! Each per-roll event "land on s at roll r" is disjoint across r for fixed s
//! (the running sum strictly increases), so the sums need no overlap
//! correction.

#![allow(clippy::needless_range_loop)]

pub mod api_computations;
pub mod cache;
pub mod constants;
pub mod density;
pub mod env_config;
pub mod error;
pub mod server;
pub mod sweep;
pub mod types;
