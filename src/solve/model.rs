//! Integer program for the bounded cutting-stock problem.
//!
//! For `max_rods` rod slots `i` and cut types `j`:
//!
//! - `rod_used[i]` is binary, 1 when slot `i` is cut at all;
//! - `cuts[i][j]` is a non-negative integer, the pieces of type `j` taken from slot `i`;
//! - each slot obeys `sum_j length[j] * cuts[i][j] <= rod_length * rod_used[i]`, which both
//!   caps the used length and forces `rod_used[i] = 0` on an empty slot;
//! - each cut type obeys `sum_i cuts[i][j] == demand[j]`;
//! - the objective minimises `sum_i rod_used[i]`.
//!
//! Nothing here checks whether the instance is feasible. A cut longer than the rod, or a
//! demand that needs more than `max_rods` rods, is left for the solver to report.

use crate::constraint;
use crate::lp_solver::*;
use crate::problem::CuttingProblem;

/// Brand of cutting-stock models.
pub struct CuttingStock;

/// A built model together with the variables needed to read its solution.
pub struct CuttingStockModel {
    pub builder: LPModelBuilder<CuttingStock>,
    /// `rod_used[i]`, one per rod slot
    pub rod_used: Vec<VariableId<CuttingStock>>,
    /// `cuts[i][j]`, indexed by rod slot then cut type
    pub cuts: Vec<Vec<VariableId<CuttingStock>>>,
}

/// Build the integer program for `problem`.
///
/// Never fails: an empty cut list gives a model whose optimum is zero rods.
pub fn build_model(problem: &CuttingProblem) -> CuttingStockModel {
    let mut builder = LPModelBuilder::<CuttingStock>::new();
    let rod_length = problem.rod_length as f64;

    let rod_used: Vec<_> = (0..problem.max_rods)
        .map(|i| builder.add_variable(format!("rod_used_{}", i), VariableType::Binary, 0.0, 1.0))
        .collect();

    let cuts: Vec<Vec<_>> = (0..problem.max_rods)
        .map(|i| {
            (0..problem.cuts.len())
                .map(|j| {
                    builder.add_variable(
                        format!("cut_{}_{}", i, j),
                        VariableType::Integer,
                        0.0,
                        f64::INFINITY,
                    )
                })
                .collect()
        })
        .collect();

    for (i, (&used, slot)) in rod_used.iter().zip(&cuts).enumerate() {
        let used_length: LinearExpression<_> = slot
            .iter()
            .zip(&problem.cuts)
            .map(|(&pieces, cut)| cut.length as f64 * pieces)
            .sum();

        builder.add_constraint(constraint!(
            format!("capacity_{}", i),
            (used_length - rod_length * used) <= 0.0
        ));
    }

    for (j, cut) in problem.cuts.iter().enumerate() {
        let placed: LinearExpression<_> = cuts.iter().map(|slot| slot[j]).sum();

        builder.add_constraint(constraint!(format!("demand_{}", j), (placed) == cut.demand));
    }

    builder.set_objective(
        rod_used.iter().copied().sum(),
        OptimizationSense::Minimize,
    );

    tracing::debug!(
        variables = builder.num_variables(),
        constraints = builder.num_constraints(),
        "built cutting-stock model"
    );

    CuttingStockModel {
        builder,
        rod_used,
        cuts,
    }
}
