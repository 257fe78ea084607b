use anyhow::{Result, anyhow};

use crate::lp_solver::output_suppression::GagHandle;
use crate::lp_solver::*;
use ::coin_cbc::{Col, Model, Sense};

/// Distance from an integer below which a CBC value is treated as that integer.
const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Snap values within [`INTEGRALITY_TOLERANCE`] of an integer onto it, leave the rest alone.
///
/// This masks floating point residue in CBC's column values without touching the
/// magnitude of large counts.
fn snap_to_integer(value: f64) -> f64 {
    let nearest = value.round();
    if (value - nearest).abs() <= INTEGRALITY_TOLERANCE {
        nearest
    } else {
        value
    }
}

/// Solve a model using Coin CBC
pub fn solve_coin_cbc<Brand>(builder: &LPModelBuilder<Brand>) -> Result<LPSolution<Brand>> {
    let mut model = Model::default();

    // columns are created in VariableId order, so a column's position is the variable index
    let cols: Vec<Col> = builder
        .variables
        .iter()
        .map(|var_info| match var_info.var_type {
            VariableType::Continuous => {
                let col = model.add_col();
                model.set_col_lower(col, var_info.lower_bound);
                model.set_col_upper(col, var_info.upper_bound);
                col
            }
            VariableType::Integer => {
                let col = model.add_integer();
                model.set_col_lower(col, var_info.lower_bound);
                model.set_col_upper(col, var_info.upper_bound);
                col
            }
            VariableType::Binary => model.add_binary(),
        })
        .collect();

    let col_of = |variable: VariableId<Brand>| {
        cols.get(variable.id)
            .copied()
            .ok_or_else(|| anyhow!("Variable {:?} not found in model", variable))
    };

    for constraint in &builder.constraints {
        let row = model.add_row();

        for term in &constraint.expression.terms {
            model.set_weight(row, col_of(term.variable)?, term.coefficient);
        }

        let rhs_adjusted = constraint.rhs - constraint.expression.constant;

        match constraint.sense {
            ConstraintSense::LessEqual => model.set_row_upper(row, rhs_adjusted),
            ConstraintSense::Equal => model.set_row_equal(row, rhs_adjusted),
            ConstraintSense::GreaterEqual => model.set_row_lower(row, rhs_adjusted),
        }
    }

    if let Some(obj_info) = &builder.objective {
        for term in &obj_info.expression.terms {
            model.set_obj_coeff(col_of(term.variable)?, term.coefficient);
        }

        model.set_obj_sense(match obj_info.sense {
            OptimizationSense::Minimize => Sense::Minimize,
            OptimizationSense::Maximize => Sense::Maximize,
        });
    }

    model.set_parameter("logLevel", "0");
    if let Some(limit) = builder.time_limit {
        model.set_parameter("seconds", &format!("{:.3}", limit.as_secs_f64()));
    }

    tracing::debug!(
        columns = cols.len(),
        rows = builder.constraints.len(),
        time_limit = ?builder.time_limit,
        "solving with CBC"
    );

    let solution = {
        // CBC logs straight to stdout
        let _gag_handle = GagHandle::stdout()?;
        model.solve()
    };

    let variable_values: Vec<f64> = cols
        .iter()
        .map(|&col| snap_to_integer(solution.col(col)))
        .collect();

    let raw = solution.raw();
    let status = if raw.is_proven_optimal() {
        OptimizationStatus::Optimal
    } else if raw.is_proven_infeasible() {
        OptimizationStatus::Infeasible
    } else if raw.is_continuous_unbounded() {
        OptimizationStatus::Unbounded
    } else if raw.is_seconds_limit_reached() {
        OptimizationStatus::Other("time limit reached")
    } else {
        OptimizationStatus::Other("Unknown status")
    };

    let objective_value = match status {
        OptimizationStatus::Optimal => {
            snap_to_integer(builder.objective_value(&variable_values))
        }
        _ => 0.0,
    };

    tracing::debug!(?status, objective_value, "CBC finished");

    Ok(LPSolution::new(status, objective_value, variable_values))
}
