//! Shared environment configuration for the dice-odds binaries.
//!
//! Consolidates `RUST_LOG`, `RAYON_NUM_THREADS` and `DICE_ODDS_PORT` reads.

use tracing_subscriber::EnvFilter;

use crate::constants::DEFAULT_PORT;

/// Install the stderr fmt subscriber. `RUST_LOG` overrides the `info` default.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (e.g. from tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Read `RAYON_NUM_THREADS` (fallback `OMP_NUM_THREADS`) and size the global
/// pool. Without either variable rayon picks its own default. Tolerates an
/// already-initialized pool. Returns the thread count in use.
pub fn init_rayon_threads() -> usize {
    let requested: Option<usize> = std::env::var("RAYON_NUM_THREADS")
        .or_else(|_| std::env::var("OMP_NUM_THREADS"))
        .ok()
        .and_then(|s| s.parse().ok());

    if let Some(n) = requested {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(n).build_global() {
            tracing::warn!("rayon pool already initialized: {e}");
        }
    }

    let threads = rayon::current_num_threads();
    tracing::info!(threads, "rayon pool ready");
    threads
}

/// Read `DICE_ODDS_PORT` (default [`DEFAULT_PORT`]).
pub fn server_port() -> u16 {
    std::env::var("DICE_ODDS_PORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}
