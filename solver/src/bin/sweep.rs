//! dice-odds-sweep: win / partial-win / loss for every reachable target of one die.
//!
//! Writes `target,win,partial_win,loss` CSV to `--output` (or stdout).

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use dice_odds::api_computations::{check_surface_limits, ProbabilityCalculator};
use dice_odds::constants::{DEFAULT_DIE_SIDES, DEFAULT_MAX_ROLLS};
use dice_odds::env_config;
use dice_odds::sweep::{sweep_targets, write_csv};

/// Sweep every target for one die and roll bound
#[derive(Parser)]
#[command(name = "dice-odds-sweep")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of sides on the die (4, 6, 8, 10, 12 or 20)
    #[arg(short, long, default_value_t = DEFAULT_DIE_SIDES)]
    sides: u32,

    /// Maximum number of rolls (1-100)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_ROLLS)]
    max_rolls: u32,

    /// CSV output path; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_config::init_tracing();
    let cli = Cli::parse();
    let threads = env_config::init_rayon_threads();

    check_surface_limits(cli.sides, cli.max_rolls)?;

    info!(
        "=== dice-odds-sweep: d{} × {} rolls, {} threads ===",
        cli.sides, cli.max_rolls, threads
    );

    let calc = ProbabilityCalculator::new();
    let rows = sweep_targets(&calc, cli.sides, cli.max_rolls)?;

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            write_csv(&rows, BufWriter::new(file))?;
            info!("Wrote {} rows to {}", rows.len(), path.display());
        }
        None => write_csv(&rows, io::stdout().lock())?,
    }

    Ok(())
}
