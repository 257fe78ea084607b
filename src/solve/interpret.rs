//! Reading a cutting plan out of a solved model.

use std::fmt;

use serde::Serialize;

use crate::AppError;
use crate::lp_solver::{LPSolution, OptimizationStatus};
use crate::problem::CuttingProblem;

use super::model::{CuttingStock, CuttingStockModel};

/// Outcome of a solve, as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    NotSolved,
}

impl SolveStatus {
    pub fn label(&self) -> &'static str {
        match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::NotSolved => "Not Solved",
        }
    }

    /// `Ok` for Optimal, otherwise the matching [`AppError`].
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            SolveStatus::Optimal => Ok(()),
            SolveStatus::Infeasible => Err(AppError::Infeasible),
            SolveStatus::Unbounded => Err(AppError::Unbounded),
            SolveStatus::NotSolved => Err(AppError::NotSolved),
        }
    }
}

impl From<OptimizationStatus> for SolveStatus {
    fn from(status: OptimizationStatus) -> Self {
        match status {
            OptimizationStatus::Optimal => SolveStatus::Optimal,
            // the rod count is bounded below by zero, so only infeasibility is possible
            OptimizationStatus::Infeasible | OptimizationStatus::InfeasibleOrUnbounded => {
                SolveStatus::Infeasible
            }
            OptimizationStatus::Unbounded => SolveStatus::Unbounded,
            OptimizationStatus::Feasible | OptimizationStatus::Other(_) => SolveStatus::NotSolved,
        }
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Pieces of one cut type taken from one rod.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CutCount {
    /// Index of the cut type in the submitted problem
    pub cut_index: usize,
    pub length: u32,
    pub count: u32,
}

/// One rod that the plan actually cuts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RodReport {
    /// Rod slot in the model, zero based
    pub slot: usize,
    pub cuts: Vec<CutCount>,
    pub used_length: u64,
    pub slack: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CuttingPlan {
    pub status: SolveStatus,
    /// Rods used; only present for an optimal solve
    pub objective: Option<u32>,
    pub rod_length: u32,
    /// Used rods in ascending slot order; empty unless optimal
    pub rods: Vec<RodReport>,
}

impl CuttingPlan {
    /// A plan with no result, for every status but Optimal.
    pub fn unsolved(status: SolveStatus, rod_length: u32) -> Self {
        Self {
            status,
            objective: None,
            rod_length,
            rods: Vec::new(),
        }
    }

    pub fn rods_used(&self) -> usize {
        self.rods.len()
    }

    /// Pieces of cut type `cut_index` over all rods.
    pub fn pieces_of(&self, cut_index: usize) -> u64 {
        self.rods
            .iter()
            .flat_map(|rod| &rod.cuts)
            .filter(|c| c.cut_index == cut_index)
            .map(|c| c.count as u64)
            .sum()
    }

    pub fn total_waste(&self) -> u64 {
        self.rods.iter().map(|rod| rod.slack).sum()
    }
}

/// Integer value of a solved variable.
///
/// Solvers return values such as `4.999999997` for 5, so values are rounded to the
/// nearest integer before anything is compared with zero. Missing, negative and NaN values
/// count as 0.
fn rounded_count(value: Option<f64>) -> u32 {
    value
        .map(f64::round)
        .filter(|v| *v >= 1.0)
        .map(|v| v as u32)
        .unwrap_or(0)
}

/// Reconstruct the per-rod cutting plan from a solution of `model`.
///
/// Only an Optimal solution yields rods. Slots whose usage indicator rounds to zero are
/// skipped even if their piece counts carry solver noise.
pub fn interpret(
    problem: &CuttingProblem,
    model: &CuttingStockModel,
    solution: &LPSolution<CuttingStock>,
) -> CuttingPlan {
    let status = SolveStatus::from(solution.status);
    if status != SolveStatus::Optimal {
        return CuttingPlan::unsolved(status, problem.rod_length);
    }

    let rod_length = problem.rod_length as u64;
    let rods: Vec<RodReport> = model
        .rod_used
        .iter()
        .zip(&model.cuts)
        .enumerate()
        .filter(|(_, (used, _))| rounded_count(solution.get_value(**used)) > 0)
        .map(|(slot, (_, pieces))| {
            let cuts: Vec<CutCount> = pieces
                .iter()
                .zip(&problem.cuts)
                .enumerate()
                .filter_map(|(cut_index, (&var, cut))| {
                    let count = rounded_count(solution.get_value(var));
                    (count > 0).then_some(CutCount {
                        cut_index,
                        length: cut.length,
                        count,
                    })
                })
                .collect();

            let used_length = cuts
                .iter()
                .map(|c| c.length as u64 * c.count as u64)
                .fold(0, u64::saturating_add);
            if used_length > rod_length {
                tracing::warn!(
                    slot,
                    used_length,
                    rod_length,
                    "solver assigned more than a rod's length"
                );
            }

            RodReport {
                slot,
                cuts,
                used_length,
                slack: rod_length.saturating_sub(used_length),
            }
        })
        .collect();

    let plan = CuttingPlan {
        status,
        objective: Some(solution.objective_value.round().max(0.0) as u32),
        rod_length: problem.rod_length,
        rods,
    };

    for (j, cut) in problem.cuts.iter().enumerate() {
        let placed = plan.pieces_of(j);
        if placed != cut.demand as u64 {
            tracing::warn!(
                cut_type = j + 1,
                placed,
                demand = cut.demand,
                "cutting plan does not match demand"
            );
        }
    }

    tracing::debug!(
        rods = plan.rods_used(),
        waste = plan.total_waste(),
        "interpreted solution"
    );

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::CutType;
    use crate::solve::model::build_model;

    fn reference_problem() -> CuttingProblem {
        CuttingProblem::new(600, vec![CutType::new(20, 5), CutType::new(30, 2)])
    }

    /// Solution where `slots` lists (slot, usage, piece counts); every other variable is 0.
    fn solution(
        model: &CuttingStockModel,
        status: OptimizationStatus,
        objective: f64,
        slots: &[(usize, f64, &[f64])],
    ) -> LPSolution<CuttingStock> {
        let mut values = vec![0.0; model.builder.num_variables()];
        for &(slot, used, pieces) in slots {
            values[model.rod_used[slot].index()] = used;
            for (&var, &value) in model.cuts[slot].iter().zip(pieces) {
                values[var.index()] = value;
            }
        }
        LPSolution::new(status, objective, values)
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(SolveStatus::Optimal.to_string(), "Optimal");
        assert_eq!(SolveStatus::Infeasible.to_string(), "Infeasible");
        assert_eq!(SolveStatus::Unbounded.to_string(), "Unbounded");
        assert_eq!(SolveStatus::NotSolved.to_string(), "Not Solved");
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(SolveStatus::from(OptimizationStatus::Optimal), SolveStatus::Optimal);
        assert_eq!(
            SolveStatus::from(OptimizationStatus::InfeasibleOrUnbounded),
            SolveStatus::Infeasible
        );
        assert_eq!(SolveStatus::from(OptimizationStatus::Unbounded), SolveStatus::Unbounded);
        assert_eq!(SolveStatus::from(OptimizationStatus::Feasible), SolveStatus::NotSolved);
        assert_eq!(
            SolveStatus::from(OptimizationStatus::Other("time limit reached")),
            SolveStatus::NotSolved
        );
    }

    #[test]
    fn test_status_into_result() {
        assert!(SolveStatus::Optimal.into_result().is_ok());
        assert!(matches!(
            SolveStatus::Infeasible.into_result(),
            Err(AppError::Infeasible)
        ));
        assert!(matches!(
            SolveStatus::NotSolved.into_result(),
            Err(AppError::NotSolved)
        ));
    }

    #[test]
    fn test_rounded_count() {
        assert_eq!(rounded_count(Some(4.999999997)), 5);
        assert_eq!(rounded_count(Some(5.000000002)), 5);
        assert_eq!(rounded_count(Some(1e-9)), 0);
        assert_eq!(rounded_count(Some(-1e-9)), 0);
        assert_eq!(rounded_count(Some(0.4999)), 0);
        assert_eq!(rounded_count(Some(f64::NAN)), 0);
        assert_eq!(rounded_count(None), 0);
    }

    #[test]
    fn test_single_rod_plan() {
        let problem = reference_problem();
        let model = build_model(&problem);
        let solution = solution(
            &model,
            OptimizationStatus::Optimal,
            1.0,
            &[(4, 1.0, &[5.0, 2.0])],
        );

        let plan = interpret(&problem, &model, &solution);

        assert_eq!(plan.status, SolveStatus::Optimal);
        assert_eq!(plan.objective, Some(1));
        assert_eq!(plan.rods.len(), 1);

        let rod = &plan.rods[0];
        assert_eq!(rod.slot, 4);
        assert_eq!(
            rod.cuts,
            vec![
                CutCount { cut_index: 0, length: 20, count: 5 },
                CutCount { cut_index: 1, length: 30, count: 2 },
            ]
        );
        assert_eq!(rod.used_length, 160);
        assert_eq!(rod.slack, 440);
    }

    #[test]
    fn test_noisy_values_are_rounded() {
        let problem = reference_problem();
        let model = build_model(&problem);
        let solution = solution(
            &model,
            OptimizationStatus::Optimal,
            1.0000000002,
            &[
                (0, 0.9999999996, &[4.999999997, 2.0000000001]),
                // unused slot with residue on its piece counts
                (1, 3e-10, &[1e-9, 0.0]),
            ],
        );

        let plan = interpret(&problem, &model, &solution);

        assert_eq!(plan.objective, Some(1));
        assert_eq!(plan.rods.len(), 1);
        assert_eq!(plan.rods[0].slot, 0);
        assert_eq!(plan.rods[0].cuts[0].count, 5);
        assert_eq!(plan.rods[0].cuts[1].count, 2);
        assert_eq!(plan.pieces_of(0), 5);
        assert_eq!(plan.pieces_of(1), 2);
    }

    #[test]
    fn test_rods_are_reported_in_slot_order_without_zero_counts() {
        let problem = CuttingProblem::new(100, vec![CutType::new(60, 2), CutType::new(30, 2)]);
        let model = build_model(&problem);
        let solution = solution(
            &model,
            OptimizationStatus::Optimal,
            2.0,
            &[(7, 1.0, &[1.0, 1.0]), (2, 1.0, &[1.0, 1.0])],
        );

        let plan = interpret(&problem, &model, &solution);

        assert_eq!(plan.rods.iter().map(|r| r.slot).collect::<Vec<_>>(), vec![2, 7]);
        assert!(plan.rods.iter().all(|r| r.used_length == 90 && r.slack == 10));
        assert_eq!(plan.total_waste(), 20);

        let solution = solution_with_gap(&model);
        let plan = interpret(&problem, &model, &solution);
        assert_eq!(plan.rods[0].cuts, vec![CutCount { cut_index: 1, length: 30, count: 2 }]);
    }

    fn solution_with_gap(model: &CuttingStockModel) -> LPSolution<CuttingStock> {
        solution(
            model,
            OptimizationStatus::Optimal,
            2.0,
            &[(0, 1.0, &[0.0, 2.0]), (1, 1.0, &[2.0, 0.0])],
        )
    }

    #[test]
    fn test_non_optimal_statuses_yield_no_rods() {
        let problem = reference_problem();
        let model = build_model(&problem);

        for (status, expected) in [
            (OptimizationStatus::Infeasible, SolveStatus::Infeasible),
            (OptimizationStatus::Unbounded, SolveStatus::Unbounded),
            (OptimizationStatus::Feasible, SolveStatus::NotSolved),
            (OptimizationStatus::Other("Unknown status"), SolveStatus::NotSolved),
        ] {
            // values present, but they must not leak into the plan
            let solution = solution(&model, status, 1.0, &[(0, 1.0, &[5.0, 2.0])]);
            let plan = interpret(&problem, &model, &solution);

            assert_eq!(plan.status, expected);
            assert_eq!(plan.objective, None);
            assert!(plan.rods.is_empty());
        }
    }

    #[test]
    fn test_empty_problem_plan() {
        let problem = CuttingProblem::new(600, vec![]);
        let model = build_model(&problem);
        let solution = solution(&model, OptimizationStatus::Optimal, 0.0, &[]);

        let plan = interpret(&problem, &model, &solution);

        assert_eq!(plan.status, SolveStatus::Optimal);
        assert_eq!(plan.objective, Some(0));
        assert!(plan.rods.is_empty());
    }

    #[test]
    fn test_large_counts_are_reported_exactly() {
        let problem = CuttingProblem::new(123456789, vec![CutType::new(1, 123456789)])
            .with_max_rods(1);
        let model = build_model(&problem);
        let solution = solution(
            &model,
            OptimizationStatus::Optimal,
            1.0,
            &[(0, 1.0, &[123456789.0])],
        );

        let plan = interpret(&problem, &model, &solution);

        assert_eq!(plan.rods[0].cuts[0].count, 123456789);
        assert_eq!(plan.rods[0].used_length, 123456789);
        assert_eq!(plan.rods[0].slack, 0);
        assert_eq!(plan.pieces_of(0), 123456789);
    }

    #[test]
    fn test_overfull_rod_saturates_slack() {
        let problem = CuttingProblem::new(50, vec![CutType::new(30, 2)]);
        let model = build_model(&problem);
        let solution = solution(&model, OptimizationStatus::Optimal, 1.0, &[(0, 1.0, &[2.0])]);

        let plan = interpret(&problem, &model, &solution);

        assert_eq!(plan.rods[0].used_length, 60);
        assert_eq!(plan.rods[0].slack, 0);
    }
}
