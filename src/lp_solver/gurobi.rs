use anyhow::{Result, anyhow};

use ::gurobi::{ConstrSense, Env, LinExpr, Model, ModelSense, Status, Var, VarType, attr, param};

use crate::lp_solver::output_suppression::{GagHandle, suppress_output};
use crate::lp_solver::*;

/// Solve a model using Gurobi
pub fn solve_gurobi<Brand>(builder: &LPModelBuilder<Brand>) -> Result<LPSolution<Brand>> {
    let mut env = {
        // the licence banner is printed on both streams before OutputFlag can be set
        let _gag_handles = suppress_output()?;
        Env::new("")?
    };
    env.set(param::OutputFlag, 0)?;
    if let Some(limit) = builder.time_limit {
        env.set(param::TimeLimit, limit.as_secs_f64())?;
    }
    let mut model = Model::new("rodcut", &env)?;

    let mut vars: Vec<Var> = Vec::with_capacity(builder.variables.len());
    for var_info in &builder.variables {
        let vtype = match var_info.var_type {
            VariableType::Continuous => VarType::Continuous,
            VariableType::Integer => VarType::Integer,
            VariableType::Binary => VarType::Binary,
        };

        vars.push(model.add_var(
            &var_info.name,
            vtype,
            0.0, // objective coefficient
            var_info.lower_bound,
            var_info.upper_bound,
            &[], // coefficients for existing constraints
            &[], // constraint indices
        )?);
    }
    model.update()?;

    let linear = |expression: &LinearExpression<Brand>| -> Result<LinExpr> {
        let mut gurobi_expr = LinExpr::new();
        for term in &expression.terms {
            let var = vars
                .get(term.variable.id)
                .ok_or_else(|| anyhow!("Variable {:?} not found in model", term.variable))?;
            gurobi_expr = gurobi_expr.add_term(term.coefficient, var.clone());
        }
        Ok(gurobi_expr.add_constant(expression.constant))
    };

    for constraint in &builder.constraints {
        let sense = match constraint.sense {
            ConstraintSense::LessEqual => ConstrSense::Less,
            ConstraintSense::Equal => ConstrSense::Equal,
            ConstraintSense::GreaterEqual => ConstrSense::Greater,
        };

        model.add_constr(
            &constraint.name,
            linear(&constraint.expression)?,
            sense,
            constraint.rhs,
        )?;
    }

    model.update()?;

    if let Some(obj_info) = &builder.objective {
        let sense = match obj_info.sense {
            OptimizationSense::Minimize => ModelSense::Minimize,
            OptimizationSense::Maximize => ModelSense::Maximize,
        };

        model.set_objective(linear(&obj_info.expression)?, sense)?;
    }

    tracing::debug!(
        columns = vars.len(),
        rows = builder.constraints.len(),
        time_limit = ?builder.time_limit,
        "solving with Gurobi"
    );

    {
        let _gag_handle = GagHandle::stdout()?;
        model.optimize()?;
    }

    let optimization_status = match model.status()? {
        Status::Optimal => OptimizationStatus::Optimal,
        Status::SubOptimal => OptimizationStatus::Feasible,
        Status::Infeasible => OptimizationStatus::Infeasible,
        Status::Unbounded => OptimizationStatus::Unbounded,
        Status::InfOrUnbd => OptimizationStatus::InfeasibleOrUnbounded,
        Status::TimeLimit => OptimizationStatus::Other("time limit reached"),
        _ => OptimizationStatus::Other("Unknown status"),
    };

    // values are only defined once the model is solved
    let mut variable_values = vec![0.0; vars.len()];
    let objective_value = match optimization_status {
        OptimizationStatus::Optimal => {
            for (value, var) in variable_values.iter_mut().zip(&vars) {
                *value = var.get(&model, attr::X)?;
            }
            model.get(attr::ObjVal)?
        }
        _ => 0.0,
    };

    tracing::debug!(status = ?optimization_status, objective_value, "Gurobi finished");

    Ok(LPSolution::new(
        optimization_status,
        objective_value,
        variable_values,
    ))
}
