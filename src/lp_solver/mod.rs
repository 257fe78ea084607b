//! Linear and integer programming abstraction layer
//!
//! Models are assembled with [`LPModelBuilder`] independently of the backend that will
//! eventually solve them. A backend is anything implementing [`LPSolver`]; the crate ships
//! COIN-OR CBC (`coin_cbc` feature, on by default) and Gurobi (`gurobi` feature).
//!
//! # Branded Types
//!
//! `VariableId`, `LinearExpression`, `Constraint`, `LPModelBuilder` and `LPSolution` are all
//! generic over a zero-sized `Brand`. A variable created by one builder cannot be placed in a
//! constraint of another builder, nor looked up in another model's solution:
//!
//! ```rust
//! use rodcut::constraint;
//! use rodcut::lp_model_builder;
//! use rodcut::lp_solver::VariableType;
//!
//! let mut stock = lp_model_builder!(Stock);
//! let mut other = lp_model_builder!(Other);
//!
//! let x = stock.add_variable("x", VariableType::Integer, 0.0, f64::INFINITY);
//! let _y = other.add_variable("y", VariableType::Binary, 0.0, 1.0);
//!
//! stock.add_constraint(constraint!("cap", (3.0 * x) <= 10.0));
//! // stock.add_constraint(constraint!((_y) <= 1.0)); // does not compile
//! ```
//!
//! When the builder has to be named in a signature, declare a brand struct and use
//! `LPModelBuilder::<MyBrand>::new()` directly.
//!
//! # Building Models
//!
//! Expressions are written with ordinary arithmetic on variables and `f64` coefficients,
//! constraints with the [`constraint!`](crate::constraint) macro or the [`Constraint`]
//! helpers:
//!
//! ```rust,no_run
//! use rodcut::constraint;
//! use rodcut::lp_model_builder;
//! use rodcut::lp_solver::{Constraint, OptimizationSense, VariableType};
//!
//! let mut builder = lp_model_builder!();
//! let used = builder.add_variable("used", VariableType::Binary, 0.0, 1.0);
//! let pieces = builder.add_variable("pieces", VariableType::Integer, 0.0, f64::INFINITY);
//!
//! builder.add_constraint(constraint!("capacity", (20.0 * pieces - 600.0 * used) <= 0.0));
//! builder.add_constraint(Constraint::eq("demand", pieces, 5.0));
//! builder.set_objective(used.into(), OptimizationSense::Minimize);
//!
//! let solution = builder.solve().unwrap();
//! assert_eq!(solution.get_value(pieces), Some(5.0));
//! ```
//!
//! # Solver Selection
//!
//! [`LPModelBuilder::solve`] picks the backend from the `RODCUT_LP_SOLVER` environment
//! variable (`gurobi`, `coin_cbc`/`coin-cbc`/`cbc`). If unset, Gurobi is preferred when
//! compiled in, otherwise CBC. [`LPModelBuilder::solve_with`] takes an explicit solver.

use anyhow::{Result, anyhow};
use std::env;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// Environment variable naming the default backend.
pub const SOLVER_ENV_VAR: &str = "RODCUT_LP_SOLVER";

/// Variable types supported by LP solvers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum VariableType {
    /// Continuous variable (can take any real value)
    Continuous,
    /// Integer variable (can only take integer values)
    Integer,
    /// Binary variable (can only take values 0 or 1)
    Binary,
}

/// Constraint sense for linear constraints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSense {
    /// Less than or equal to (≤)
    LessEqual,
    /// Equal to (=)
    Equal,
    /// Greater than or equal to (≥)
    GreaterEqual,
}

/// Optimization direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptimizationSense {
    Minimize,
    Maximize,
}

/// Status reported by a backend after optimisation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(dead_code)]
pub enum OptimizationStatus {
    /// Optimal solution found
    Optimal,
    /// Feasible solution found, but not proven optimal
    Feasible,
    /// Problem is infeasible (no solution exists)
    Infeasible,
    /// Problem is unbounded
    Unbounded,
    /// Backend could only tell that the problem is infeasible or unbounded
    InfeasibleOrUnbounded,
    /// Other status (solver-specific)
    Other(&'static str),
}

/// A backend able to solve models built with [`LPModelBuilder`].
///
/// Implementations must build their native model from scratch on every call; a solver
/// value never carries constraints from one `solve` to the next.
pub trait LPSolver {
    fn solve<Brand>(&self, model: &LPModelBuilder<Brand>) -> Result<LPSolution<Brand>>;
}

/// Available LP solver backends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverBackend {
    #[cfg(feature = "gurobi")]
    /// Gurobi commercial solver
    Gurobi,
    #[cfg(feature = "coin_cbc")]
    /// Coin CBC open-source solver
    CoinCbc,
}

impl SolverBackend {
    /// Resolve a backend by name, failing if it is unknown or not compiled in.
    pub fn from_name(solver_name: &str) -> Result<Self> {
        match solver_name.to_lowercase().as_str() {
            "gurobi" => {
                #[cfg(feature = "gurobi")]
                return Ok(SolverBackend::Gurobi);
                #[cfg(not(feature = "gurobi"))]
                return Err(anyhow!(
                    "Gurobi solver requested but the gurobi feature is not enabled"
                ));
            }
            "coin_cbc" | "coin-cbc" | "cbc" => {
                #[cfg(feature = "coin_cbc")]
                return Ok(SolverBackend::CoinCbc);
                #[cfg(not(feature = "coin_cbc"))]
                return Err(anyhow!(
                    "Coin CBC solver requested but the coin_cbc feature is not enabled"
                ));
            }
            _ => Err(anyhow!(
                "Invalid solver '{}'. Valid options: gurobi, coin_cbc",
                solver_name
            )),
        }
    }

    /// Get the solver backend from `RODCUT_LP_SOLVER` or use fallback logic
    pub fn from_env_or_default() -> Result<Self> {
        if let Ok(solver_name) = env::var(SOLVER_ENV_VAR) {
            return Self::from_name(&solver_name)
                .map_err(|e| anyhow!("{} (from {})", e, SOLVER_ENV_VAR));
        }

        // prefer gurobi if available, then coin_cbc
        #[cfg(feature = "gurobi")]
        return Ok(SolverBackend::Gurobi);

        #[allow(unreachable_code)]
        #[cfg(feature = "coin_cbc")]
        return Ok(SolverBackend::CoinCbc);

        #[cfg(not(any(feature = "gurobi", feature = "coin_cbc")))]
        Err(anyhow!(
            "No LP solver backend available. Please enable a solver feature (e.g., 'gurobi' or 'coin_cbc')"
        ))
    }

    pub fn name(&self) -> &'static str {
        match *self {
            #[cfg(feature = "gurobi")]
            SolverBackend::Gurobi => "gurobi",
            #[cfg(feature = "coin_cbc")]
            SolverBackend::CoinCbc => "coin_cbc",
        }
    }
}

impl LPSolver for SolverBackend {
    fn solve<Brand>(&self, model: &LPModelBuilder<Brand>) -> Result<LPSolution<Brand>> {
        match *self {
            #[cfg(feature = "gurobi")]
            SolverBackend::Gurobi => gurobi::solve_gurobi(model),

            #[cfg(feature = "coin_cbc")]
            SolverBackend::CoinCbc => coin_cbc::solve_coin_cbc(model),
        }
    }
}

/// A linear expression term: coefficient * variable
#[derive(Debug, Clone)]
pub struct LinearTerm<Brand> {
    pub coefficient: f64,
    pub variable: VariableId<Brand>,
}

/// A linear expression: sum of terms plus constant
#[derive(Debug, Clone)]
pub struct LinearExpression<Brand> {
    pub terms: Vec<LinearTerm<Brand>>,
    pub constant: f64,
}

impl<Brand> LinearExpression<Brand> {
    /// Create a new linear expression with a constant term
    pub fn new(constant: f64) -> Self {
        Self {
            terms: Vec::new(),
            constant,
        }
    }

    /// Add a term to the expression
    pub fn add_term(&mut self, coefficient: f64, variable: VariableId<Brand>) {
        self.terms.push(LinearTerm {
            coefficient,
            variable,
        });
    }

    /// Create a linear expression from a single variable
    pub fn from_variable(variable: VariableId<Brand>) -> Self {
        Self {
            terms: vec![LinearTerm {
                coefficient: 1.0,
                variable,
            }],
            constant: 0.0,
        }
    }

    /// Evaluate the expression against a solution
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms.iter().fold(self.constant, |acc, term| {
            acc + term.coefficient * values.get(term.variable.id).copied().unwrap_or(0.0)
        })
    }
}

impl<Brand> From<VariableId<Brand>> for LinearExpression<Brand> {
    fn from(variable: VariableId<Brand>) -> Self {
        Self::from_variable(variable)
    }
}

impl<Brand> FromIterator<(f64, VariableId<Brand>)> for LinearExpression<Brand> {
    fn from_iter<I: IntoIterator<Item = (f64, VariableId<Brand>)>>(iter: I) -> Self {
        let mut expr = LinearExpression::new(0.0);
        for (coefficient, variable) in iter {
            expr.add_term(coefficient, variable);
        }
        expr
    }
}

/// Unique identifier for a variable in the LP model
///
/// The `Brand` type parameter ties the id to the builder that created it.
pub struct VariableId<Brand> {
    id: usize,
    _brand: PhantomData<fn() -> Brand>,
}

impl<Brand> VariableId<Brand> {
    /// Position of the variable in its model, in creation order
    pub fn index(&self) -> usize {
        self.id
    }
}

// Manual trait implementations that don't require Brand to implement anything
impl<Brand> std::fmt::Debug for VariableId<Brand> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VariableId").field("id", &self.id).finish()
    }
}

impl<Brand> Clone for VariableId<Brand> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Brand> Copy for VariableId<Brand> {}

impl<Brand> PartialEq for VariableId<Brand> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<Brand> Eq for VariableId<Brand> {}

impl<Brand> std::hash::Hash for VariableId<Brand> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Unique identifier for a constraint in the LP model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConstraintId(usize);

/// A named linear constraint `expression <sense> rhs`
///
/// ```rust,no_run
/// use rodcut::constraint;
/// use rodcut::lp_model_builder;
/// use rodcut::lp_solver::{Constraint, ConstraintSense, VariableType};
///
/// let mut builder = lp_model_builder!();
/// let x = builder.add_variable("x", VariableType::Integer, 0.0, 10.0);
/// let y = builder.add_variable("y", VariableType::Integer, 0.0, 10.0);
///
/// let c = constraint!((x + y) == 10.0);
/// let c = Constraint::eq("sum", x + y, 10.0);
/// let c = Constraint::new("sum", x + y, ConstraintSense::Equal, 10.0);
/// ```
#[derive(Debug, Clone)]
pub struct Constraint<Brand> {
    name: Arc<str>,
    expression: LinearExpression<Brand>,
    sense: ConstraintSense,
    rhs: f64,
}

impl<Brand> Constraint<Brand> {
    pub fn new(
        name: impl Into<Arc<str>>,
        expression: impl Into<LinearExpression<Brand>>,
        sense: ConstraintSense,
        rhs: f64,
    ) -> Self {
        Self {
            name: name.into(),
            expression: expression.into(),
            sense,
            rhs,
        }
    }

    /// Create an equality constraint: expression == rhs
    pub fn eq(
        name: impl Into<Arc<str>>,
        expression: impl Into<LinearExpression<Brand>>,
        rhs: f64,
    ) -> Self {
        Self::new(name, expression, ConstraintSense::Equal, rhs)
    }

    /// Create a less-than-or-equal constraint: expression <= rhs
    pub fn le(
        name: impl Into<Arc<str>>,
        expression: impl Into<LinearExpression<Brand>>,
        rhs: f64,
    ) -> Self {
        Self::new(name, expression, ConstraintSense::LessEqual, rhs)
    }

    /// Create a greater-than-or-equal constraint: expression >= rhs
    pub fn ge(
        name: impl Into<Arc<str>>,
        expression: impl Into<LinearExpression<Brand>>,
        rhs: f64,
    ) -> Self {
        Self::new(name, expression, ConstraintSense::GreaterEqual, rhs)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sense(&self) -> ConstraintSense {
        self.sense
    }

    pub fn rhs(&self) -> f64 {
        self.rhs
    }

    pub fn expression(&self) -> &LinearExpression<Brand> {
        &self.expression
    }

    /// Whether `values` satisfy this constraint within `tolerance`
    pub fn is_satisfied_by(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expression.evaluate(values);
        match self.sense {
            ConstraintSense::LessEqual => lhs <= self.rhs + tolerance,
            ConstraintSense::Equal => (lhs - self.rhs).abs() <= tolerance,
            ConstraintSense::GreaterEqual => lhs >= self.rhs - tolerance,
        }
    }
}

/// Variable information stored in the model
#[derive(Debug, Clone)]
struct VariableInfo {
    name: Arc<str>,
    var_type: VariableType,
    lower_bound: f64,
    upper_bound: f64,
}

/// Objective function information
#[derive(Debug, Clone)]
struct ObjectiveInfo<Brand> {
    expression: LinearExpression<Brand>,
    sense: OptimizationSense,
}

/// Result of solving a model
#[derive(Debug, Clone)]
pub struct LPSolution<Brand> {
    pub status: OptimizationStatus,
    pub objective_value: f64,
    variable_values: Vec<f64>,
    _brand: PhantomData<fn() -> Brand>,
}

impl<Brand> LPSolution<Brand> {
    /// Assemble a solution from raw backend output, indexed by [`VariableId::index`].
    pub fn new(status: OptimizationStatus, objective_value: f64, variable_values: Vec<f64>) -> Self {
        Self {
            status,
            objective_value,
            variable_values,
            _brand: PhantomData,
        }
    }

    /// Get the value of a variable from the solution
    pub fn get_value(&self, var_id: VariableId<Brand>) -> Option<f64> {
        self.variable_values.get(var_id.id).copied()
    }

    pub fn values(&self) -> &[f64] {
        &self.variable_values
    }
}

/// Builder for models that can be handed to any [`LPSolver`]
pub struct LPModelBuilder<Brand> {
    variables: Vec<VariableInfo>,
    constraints: Vec<Constraint<Brand>>,
    objective: Option<ObjectiveInfo<Brand>>,
    time_limit: Option<Duration>,
    _brand: PhantomData<fn() -> Brand>,
}

impl<Brand> LPModelBuilder<Brand> {
    /// Create a new LP model builder
    pub fn new() -> Self {
        Self {
            variables: Vec::new(),
            constraints: Vec::new(),
            objective: None,
            time_limit: None,
            _brand: PhantomData,
        }
    }

    /// Add a variable to the model
    pub fn add_variable(
        &mut self,
        name: impl Into<Arc<str>>,
        var_type: VariableType,
        lower_bound: f64,
        upper_bound: f64,
    ) -> VariableId<Brand> {
        let var_id = VariableId {
            id: self.variables.len(),
            _brand: PhantomData,
        };
        self.variables.push(VariableInfo {
            name: name.into(),
            var_type,
            lower_bound,
            upper_bound,
        });
        var_id
    }

    /// Add a constraint to the model
    pub fn add_constraint(&mut self, constraint: Constraint<Brand>) -> ConstraintId {
        let constr_id = ConstraintId(self.constraints.len());
        self.constraints.push(constraint);
        constr_id
    }

    /// Set the objective function
    pub fn set_objective(&mut self, expression: LinearExpression<Brand>, sense: OptimizationSense) {
        self.objective = Some(ObjectiveInfo { expression, sense });
    }

    /// Bound the wall-clock time a backend may spend on this model.
    pub fn set_time_limit(&mut self, limit: Option<Duration>) {
        self.time_limit = limit;
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    pub fn constraints(&self) -> &[Constraint<Brand>] {
        &self.constraints
    }

    pub fn variable_name(&self, var_id: VariableId<Brand>) -> Option<&str> {
        self.variables.get(var_id.id).map(|v| &*v.name)
    }

    pub fn variable_type(&self, var_id: VariableId<Brand>) -> Option<VariableType> {
        self.variables.get(var_id.id).map(|v| v.var_type)
    }

    pub fn objective_sense(&self) -> Option<OptimizationSense> {
        self.objective.as_ref().map(|o| o.sense)
    }

    /// Value of the objective for an assignment; 0 when no objective was set.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective
            .as_ref()
            .map(|o| o.expression.evaluate(values))
            .unwrap_or(0.0)
    }

    /// Solve using the backend named by `RODCUT_LP_SOLVER`, or the default one
    pub fn solve(&self) -> Result<LPSolution<Brand>> {
        let solver = SolverBackend::from_env_or_default()?;
        self.solve_with(&solver)
    }

    /// Solve using an explicit backend
    pub fn solve_with<S: LPSolver>(&self, solver: &S) -> Result<LPSolution<Brand>> {
        solver.solve(self)
    }
}

impl<Brand> Default for LPModelBuilder<Brand> {
    fn default() -> Self {
        Self::new()
    }
}

// Macros for convenient syntax
pub mod macros;

// Operator overloading for linear expressions
pub mod ops;

pub mod output_suppression;

#[cfg(feature = "gurobi")]
pub mod gurobi;

#[cfg(feature = "coin_cbc")]
pub mod coin_cbc;
