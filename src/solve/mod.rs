//! Cutting-plan optimisation.
//!
//! The pipeline has three stages, each in its own module:
//!
//! 1. [`model`] builds the integer program for a [`CuttingProblem`];
//! 2. an [`LPSolver`] backend solves it;
//! 3. [`interpret`] turns the variable assignment into a [`CuttingPlan`], one report per
//!    rod actually used.
//!
//! [`report`] renders a plan as a text report, JSON or CSV.
//!
//! # Usage Example
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use rodcut::problem::{CutType, CuttingProblem};
//! use rodcut::solve::{SolveStatus, solve_problem};
//!
//! let problem = CuttingProblem::new(600, vec![CutType::new(20, 5), CutType::new(30, 2)]);
//! let plan = solve_problem(&problem)?;
//!
//! assert_eq!(plan.status, SolveStatus::Optimal);
//! assert_eq!(plan.objective, Some(1));
//! assert_eq!(plan.rods[0].slack, 440);
//! # Ok(())
//! # }
//! ```

use std::{
    fs,
    io::{self, BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::{Context, Result};
use clap::{Args, Parser};

use crate::AppError;
use crate::bounds;
use crate::lp_solver::{LPSolver, SolverBackend};
use crate::problem::{CutType, CuttingProblem, read_problem};

pub mod interpret;
pub mod model;
pub mod report;

pub use interpret::{CutCount, CuttingPlan, RodReport, SolveStatus, interpret};
pub use model::{CuttingStock, CuttingStockModel, build_model};

/// Problem inputs shared by every subcommand.
///
/// Flags override the corresponding fields of `--input`.
#[derive(Args, Debug, Clone)]
pub struct ProblemArgs {
    /// JSON problem file ({"rod_length": .., "cuts": [{"length": .., "demand": ..}], "max_rods": ..})
    #[clap(short, long)]
    pub input: Option<PathBuf>,

    /// Stock rod length
    #[clap(short('l'), long)]
    pub rod_length: Option<u32>,

    /// Cut type as LENGTH:DEMAND (repeatable, e.g. --cut 20:5 --cut 30:2)
    #[clap(short, long = "cut")]
    pub cuts: Vec<CutType>,

    /// Number of rod slots in the model (upper bound on rods used)
    #[clap(short, long)]
    pub max_rods: Option<u32>,
}

impl ProblemArgs {
    /// Assemble and validate the problem.
    pub fn load(&self) -> Result<CuttingProblem> {
        let mut problem = match &self.input {
            Some(path) => read_problem(path)?,
            None => {
                let rod_length = self.rod_length.ok_or_else(|| {
                    AppError::InvalidInput(
                        "a rod length is required (--rod-length or --input)".to_string(),
                    )
                })?;
                CuttingProblem::new(rod_length, Vec::new())
            }
        };

        if let Some(rod_length) = self.rod_length {
            problem.rod_length = rod_length;
        }
        if !self.cuts.is_empty() {
            problem.cuts = self.cuts.clone();
        }
        if let Some(max_rods) = self.max_rods {
            problem.max_rods = max_rods;
        }

        problem.validate()?;
        Ok(problem)
    }
}

/// Command-line arguments for the solve command.
#[derive(Parser, Debug)]
pub struct SolveArgs {
    #[clap(flatten)]
    pub problem: ProblemArgs,

    /// LP backend: coin_cbc or gurobi (overrides RODCUT_LP_SOLVER)
    #[clap(long)]
    pub solver: Option<String>,

    /// Give up after this many seconds and report the problem as not solved
    #[clap(long)]
    pub time_limit: Option<f64>,

    /// Output JSON file with the cutting plan
    #[clap(long)]
    pub json: Option<PathBuf>,

    /// Output CSV file with one row per rod and cut length
    #[clap(long)]
    pub csv: Option<PathBuf>,

    /// Don't print the text report
    #[clap(short, long)]
    pub quiet: bool,
}

/// Solve a problem with the backend selected by `RODCUT_LP_SOLVER` (or the default one).
pub fn solve_problem(problem: &CuttingProblem) -> Result<CuttingPlan> {
    let solver = SolverBackend::from_env_or_default()?;
    solve_problem_with(problem, &solver, None)
}

/// Build, solve and interpret a problem.
///
/// Invalid input is rejected before a model is built. A non-optimal solve is not an
/// error: the returned plan carries the status and no rods.
pub fn solve_problem_with<S: LPSolver>(
    problem: &CuttingProblem,
    solver: &S,
    time_limit: Option<Duration>,
) -> Result<CuttingPlan> {
    problem.validate()?;

    let mut model = build_model(problem);
    model.builder.set_time_limit(time_limit);

    let solution = model.builder.solve_with(solver)?;
    Ok(interpret(problem, &model, &solution))
}

fn parse_time_limit(seconds: f64) -> Result<Duration, AppError> {
    Duration::try_from_secs_f64(seconds)
        .ok()
        .filter(|limit| !limit.is_zero())
        .ok_or_else(|| {
            AppError::InvalidInput(format!(
                "time limit must be a positive number of seconds, got {}",
                seconds
            ))
        })
}

/// Reasons an infeasible problem could not be packed, most certain first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfeasibilityHint {
    /// Cut type (1-based) longer than the rod
    OversizedCut { cut_type: usize, length: u32 },
    /// The material alone needs more rods than there are slots
    MaterialExceedsSlots { needed: u64 },
    /// Cutting one type per rod needs more rods than there are slots
    OneTypePerRodExceedsSlots { upper_bound: u64 },
}

fn infeasibility_hints(problem: &CuttingProblem) -> Vec<InfeasibilityHint> {
    let mut hints: Vec<_> = problem
        .oversized_cuts()
        .map(|j| InfeasibilityHint::OversizedCut {
            cut_type: j + 1,
            length: problem.cuts[j].length,
        })
        .collect();

    let max_rods = problem.max_rods as u64;
    let needed = bounds::lower_bound(problem);
    if needed > max_rods {
        hints.push(InfeasibilityHint::MaterialExceedsSlots { needed });
    } else if let Some(upper_bound) = bounds::upper_bound(problem).filter(|&ub| ub > max_rods) {
        hints.push(InfeasibilityHint::OneTypePerRodExceedsSlots { upper_bound });
    }

    hints
}

/// Log why an infeasible problem could not be packed.
fn explain_infeasibility(problem: &CuttingProblem) {
    for hint in infeasibility_hints(problem) {
        match hint {
            InfeasibilityHint::OversizedCut { cut_type, length } => tracing::warn!(
                cut_type,
                length,
                rod_length = problem.rod_length,
                "cut is longer than the rod"
            ),
            InfeasibilityHint::MaterialExceedsSlots { needed } => tracing::warn!(
                needed,
                max_rods = problem.max_rods,
                "demand needs more rods than the model allows; raise --max-rods"
            ),
            InfeasibilityHint::OneTypePerRodExceedsSlots { upper_bound } => tracing::warn!(
                upper_bound,
                max_rods = problem.max_rods,
                "demand may need more rods than the model allows; \
                 cutting one type per rod takes {} rods, try --max-rods {}",
                upper_bound,
                upper_bound
            ),
        }
    }
}

/// Solve a cutting-stock problem and write the requested outputs.
///
/// The text report is always printed unless `--quiet`; the JSON and CSV files are written
/// for every status. A status other than Optimal is returned as the matching [`AppError`]
/// after the outputs are written.
pub fn solve_main(args: SolveArgs) -> Result<()> {
    let SolveArgs {
        ref problem,
        ref solver,
        time_limit,
        ref json,
        ref csv,
        quiet,
    } = args;

    let problem = problem.load()?;
    let solver = match solver {
        Some(name) => SolverBackend::from_name(name)?,
        None => SolverBackend::from_env_or_default()?,
    };
    let time_limit = time_limit.map(parse_time_limit).transpose()?;

    tracing::info!(
        rod_length = problem.rod_length,
        cut_types = problem.cuts.len(),
        pieces = problem.total_pieces(),
        max_rods = problem.max_rods,
        solver = solver.name(),
        "solving cutting-stock problem"
    );

    let plan = solve_problem_with(&problem, &solver, time_limit)?;

    tracing::info!(status = %plan.status, objective = ?plan.objective, "solve finished");
    if plan.status == SolveStatus::Infeasible {
        explain_infeasibility(&problem);
    }

    if !quiet {
        let stdout = io::stdout();
        report::write_text(&mut stdout.lock(), &plan)?;
    }

    if let Some(output) = json {
        let file = fs::File::create(output)
            .with_context(|| format!("creating {}", output.display()))?;
        let mut out_file = BufWriter::new(file);
        report::write_json(&mut out_file, &plan)?;
        out_file.flush()?;
    }

    if let Some(output) = csv {
        let file = fs::File::create(output)
            .with_context(|| format!("creating {}", output.display()))?;
        let mut out_file = BufWriter::new(file);
        report::write_csv(&mut out_file, &plan)?;
        out_file.flush()?;
    }

    plan.status.into_result()?;
    Ok(())
}
