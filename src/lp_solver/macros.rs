//! Macros for the LP solver module

/// Create a new LP model builder with a unique brand
///
/// Each invocation defines a fresh brand type inside its own block, so builders made by
/// different invocations can never share variables.
///
/// ```rust
/// use rodcut::lp_model_builder;
/// use rodcut::lp_solver::VariableType;
///
/// let mut builder = lp_model_builder!();
/// let x = builder.add_variable("x", VariableType::Integer, 0.0, 10.0);
///
/// // Named brands read better in compiler errors
/// let mut rods = lp_model_builder!(RodModel);
/// let used = rods.add_variable("used", VariableType::Binary, 0.0, 1.0);
/// ```
#[macro_export]
macro_rules! lp_model_builder {
    ($brand_name:ident) => {{
        struct $brand_name;
        $crate::lp_solver::LPModelBuilder::<$brand_name>::new()
    }};

    () => {{
        struct UniqueBrand;
        $crate::lp_solver::LPModelBuilder::<UniqueBrand>::new()
    }};
}

/// Create constraints using comparison syntax
///
/// The left-hand side must be parenthesised. An optional leading name labels the row in
/// backends that support it.
///
/// ```rust
/// use rodcut::constraint;
/// use rodcut::lp_model_builder;
/// use rodcut::lp_solver::VariableType;
///
/// let mut builder = lp_model_builder!();
/// let x = builder.add_variable("x", VariableType::Integer, 0.0, 10.0);
/// let y = builder.add_variable("y", VariableType::Integer, 0.0, 10.0);
///
/// builder.add_constraint(constraint!((x + y) == 10.0));
/// builder.add_constraint(constraint!("cap", (20.0 * x + 30.0 * y) <= 600.0));
/// builder.add_constraint(constraint!((x - y) >= 0.0));
/// ```
#[macro_export]
macro_rules! constraint {
    (($lhs:expr) == $rhs:expr) => {
        $crate::constraint!("", ($lhs) == $rhs)
    };
    (($lhs:expr) <= $rhs:expr) => {
        $crate::constraint!("", ($lhs) <= $rhs)
    };
    (($lhs:expr) >= $rhs:expr) => {
        $crate::constraint!("", ($lhs) >= $rhs)
    };

    ($name:expr, ($lhs:expr) == $rhs:expr) => {
        $crate::lp_solver::Constraint::new(
            $name,
            $lhs,
            $crate::lp_solver::ConstraintSense::Equal,
            $rhs as f64,
        )
    };
    ($name:expr, ($lhs:expr) <= $rhs:expr) => {
        $crate::lp_solver::Constraint::new(
            $name,
            $lhs,
            $crate::lp_solver::ConstraintSense::LessEqual,
            $rhs as f64,
        )
    };
    ($name:expr, ($lhs:expr) >= $rhs:expr) => {
        $crate::lp_solver::Constraint::new(
            $name,
            $lhs,
            $crate::lp_solver::ConstraintSense::GreaterEqual,
            $rhs as f64,
        )
    };
}
