//! Bounded one-dimensional cutting-stock optimisation
//!
//! Given a stock rod length and a list of cut types, each with a length and a demanded
//! quantity, this library finds how to cut the demanded pieces from the fewest rods. The
//! problem is modelled as an integer program over a fixed number of rod slots and solved
//! by an LP backend (Coin CBC by default, Gurobi behind a feature).
//!
//! # Main Workflows
//!
//! 1. **Solving** ([`solve`]): build the model, solve it and read back a per-rod cutting plan
//! 2. **Bounds** ([`bounds`]): cheap lower and upper bounds on the number of rods
//!
//! # Usage Example
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use rodcut::{CutType, CuttingProblem, solve_problem};
//!
//! let problem = CuttingProblem::new(600, vec![CutType::new(20, 5), CutType::new(30, 2)]);
//! let plan = solve_problem(&problem)?;
//!
//! for rod in &plan.rods {
//!     println!("rod {}: {} used, {} wasted", rod.slot + 1, rod.used_length, rod.slack);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - **[`problem`]**: problem input, validation and JSON problem files
//! - **[`solve`]**: model construction, solution interpretation and reports
//! - **[`bounds`]**: rod-count bounds used for diagnostics
//! - **[`lp_solver`]**: linear programming solver abstraction layer
//! - **[`logging`]**: `tracing` subscriber setup for the command-line tool

use clap::Parser;
use thiserror::Error;

pub mod bounds;
pub mod logging;
pub mod lp_solver;
pub mod problem;
pub mod solve;

// Re-export the main functions for easy access
pub use bounds::{BoundsArgs, bounds_main};
pub use problem::{CutType, CuttingProblem, DEFAULT_MAX_RODS, read_problem};
pub use solve::{CuttingPlan, SolveArgs, SolveStatus, solve_main, solve_problem, solve_problem_with};

/// Application-level errors.
///
/// A solve that ends in any status but Optimal is turned into the matching variant by the
/// command-line tool, after the status has been printed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AppError {
    /// The problem was rejected before a model was built.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// No cutting plan satisfies the demand within the available rods.
    #[error("Problem Infeasible")]
    Infeasible,
    #[error("Problem Unbounded")]
    Unbounded,
    /// The solver stopped without proving optimality, e.g. on a time limit.
    #[error("Problem Not Solved")]
    NotSolved,
}

/// Command-line interface arguments for rodcut.
///
/// - `Solve`: find the cutting plan using the fewest rods
/// - `Bounds`: print lower and upper bounds on the number of rods
#[derive(Debug, Parser)]
#[clap(
    name = "rodcut",
    about = "Minimise the stock rods needed to cut a list of pieces"
)]
pub enum CLIArguments {
    /// Solve a cutting-stock problem and print the cutting plan.
    Solve(SolveArgs),
    /// Print bounds on the number of rods a problem needs, without solving it.
    Bounds(BoundsArgs),
}
