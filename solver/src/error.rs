//! Input validation errors.
//!
//! Every query is validated before any table is built, so an error never
//! leaves partial work behind.

use thiserror::Error;

/// Errors surfaced by the probability calculator and its outer surfaces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbabilityError {
    #[error("a die needs at least 2 sides, got {sides}")]
    InvalidDie { sides: u32 },

    #[error("the maximum number of rolls must be at least 1, got {max_rolls}")]
    InvalidRollCount { max_rolls: u32 },

    #[error(
        "the target number should be between 1 and the maximum possible score ({max_target}), got {target}"
    )]
    InvalidTarget { target: u32, max_target: u64 },

    #[error("the curve needs a maximum target of at least 1, got {max_target}")]
    InvalidCurveBound { max_target: u32 },

    #[error("unsupported die: {sides} sides (supported: 4, 6, 8, 10, 12, 20)")]
    UnsupportedDie { sides: u32 },

    #[error("the maximum number of rolls must be between 1 and {limit}, got {max_rolls}")]
    RollCountOutOfRange { max_rolls: u32, limit: u32 },
}

pub type Result<T> = std::result::Result<T, ProbabilityError>;
