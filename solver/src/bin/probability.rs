//! dice-odds: chance of landing on a target sum with repeated rolls of one die.
//!
//! Prints win / partial win / loss with six decimals, and optionally the
//! per-target curve up to the target.

use clap::Parser;

use dice_odds::api_computations::{validate_request, ProbabilityCalculator};
use dice_odds::constants::{
    max_reachable_sum, DEFAULT_DIE_SIDES, DEFAULT_MAX_ROLLS, DEFAULT_TARGET, DISPLAY_PRECISION,
};
use dice_odds::env_config;

/// Dice probability calculator
#[derive(Parser)]
#[command(name = "dice-odds")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Number of sides on the die (4, 6, 8, 10, 12 or 20)
    #[arg(short, long, default_value_t = DEFAULT_DIE_SIDES)]
    sides: u32,

    /// Target number
    #[arg(short, long, default_value_t = DEFAULT_TARGET)]
    target: u32,

    /// Maximum number of rolls (1-100)
    #[arg(short = 'r', long, default_value_t = DEFAULT_MAX_ROLLS)]
    max_rolls: u32,

    /// Also print the curve for every target up to the target number
    #[arg(long)]
    cdf: bool,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_config::init_tracing();
    let cli = Cli::parse();

    if !cli.json {
        println!(
            "Maximum possible target number is {}",
            max_reachable_sum(cli.sides, cli.max_rolls)
        );
    }

    if let Err(e) = validate_request(cli.sides, cli.target, cli.max_rolls) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    let calc = ProbabilityCalculator::new();
    let result = calc.query(cli.sides, cli.target, cli.max_rolls)?;
    let curve = if cli.cdf {
        Some(calc.cdf_curve(cli.sides, cli.target, cli.max_rolls)?)
    } else {
        None
    };

    if cli.json {
        let mut out = serde_json::json!({
            "dice_sides": cli.sides,
            "target_number": cli.target,
            "max_rolls": cli.max_rolls,
            "win": result.win,
            "partial_win": result.partial_win,
            "loss": result.loss,
        });
        if let Some(curve) = &curve {
            out["cdf"] = serde_json::json!(curve.points);
        }
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!(
        "Chances of hitting {} with up to {} rolls of a d{}",
        cli.target, cli.max_rolls, cli.sides
    );
    println!("{result}");

    if let Some(curve) = curve {
        println!();
        println!("{:>6}  {:>12}", "target", "probability");
        for point in curve.iter() {
            println!(
                "{:>6}  {:>12.*}",
                point.target, DISPLAY_PRECISION, point.cumulative_probability
            );
        }
    }

    Ok(())
}
