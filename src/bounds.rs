//! Combinatorial bounds on the number of rods
//!
//! These are cheap to compute and bracket the optimum of the integer program:
//! `lower_bound <= optimum <= upper_bound`. They are used for diagnostics (explaining an
//! infeasible result caused by too few rod slots) and by the `bounds` subcommand.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use crate::problem::CuttingProblem;

/// Material lower bound: no packing can use fewer rods than total length over rod length.
///
/// Saturates at `u64::MAX`.
pub fn lower_bound(problem: &CuttingProblem) -> u64 {
    let rods = problem
        .total_demand_length()
        .div_ceil(problem.rod_length as u128);
    u64::try_from(rods).unwrap_or(u64::MAX)
}

/// Rods needed when every rod only carries pieces of a single cut type.
///
/// Returns `None` if some cut is longer than the rod, in which case no packing exists.
/// Any `max_rods` at least this large makes the model feasible.
pub fn upper_bound(problem: &CuttingProblem) -> Option<u64> {
    problem
        .cuts
        .iter()
        .map(|cut| {
            let per_rod = (problem.rod_length / cut.length) as u64;
            (per_rod > 0).then(|| (cut.demand as u64).div_ceil(per_rod))
        })
        .sum()
}

/// Command-line arguments for the bounds command.
#[derive(Parser, Debug)]
pub struct BoundsArgs {
    #[clap(flatten)]
    pub problem: crate::solve::ProblemArgs,

    /// Write the bounds as JSON to this file
    #[clap(long)]
    pub json: Option<PathBuf>,
}

#[derive(Debug, serde::Serialize)]
struct BoundsReport {
    lower_bound: u64,
    upper_bound: Option<u64>,
    max_rods: u32,
}

/// Print the rod-count bounds of a problem.
pub fn bounds_main(args: BoundsArgs) -> Result<()> {
    let problem = args.problem.load()?;

    let report = BoundsReport {
        lower_bound: lower_bound(&problem),
        upper_bound: upper_bound(&problem),
        max_rods: problem.max_rods,
    };

    println!("Lower bound: {}", report.lower_bound);
    match report.upper_bound {
        Some(ub) => println!("Upper bound: {}", ub),
        None => println!("Upper bound: none (a cut is longer than the rod)"),
    }
    println!("Max rods: {}", report.max_rods);

    if let Some(path) = args.json {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
    }

    Ok(())
}
