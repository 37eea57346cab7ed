// Domain service interface for solving optimization problems
// Any MILP backend plugs in behind this trait

use super::models::{OptimizationProblem, SolveResult};

/// Error types for the solver service
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    #[error("Invalid problem: {0}")]
    InvalidProblem(String),

    #[error("Solver not available: {0}")]
    SolverNotAvailable(String),

    #[error("Solver execution failed: {0}")]
    ExecutionFailed(String),
}

pub type Result<T> = std::result::Result<T, SolverError>;

/// Domain service interface for optimization solvers
///
/// Implementations receive a solver-neutral model and report back the status,
/// the objective value and one value per variable. Time limits and gap
/// tolerances travel in `problem.solver_config`.
pub trait SolverService: Send + Sync {
    /// Solve an optimization problem
    fn solve(&self, problem: &OptimizationProblem) -> Result<SolveResult>;

    /// Validate a problem without solving it
    fn validate(&self, problem: &OptimizationProblem) -> Result<()> {
        let mut errors = Vec::new();

        let num_vars = problem.num_variables();
        if num_vars == 0 {
            errors.push("Problem must declare at least one variable".to_string());
        }

        for &(i, _) in &problem.objective.terms {
            if i >= num_vars {
                errors.push(format!(
                    "Objective references variable {} but problem has {} variables",
                    i, num_vars
                ));
            }
        }

        for (c, constraint) in problem.constraints.iter().enumerate() {
            if constraint.terms.is_empty() {
                errors.push(format!("Constraint {} '{}' has no terms", c, constraint.name));
            }
            if let Some(&(i, _)) = constraint.terms.iter().find(|&&(i, _)| i >= num_vars) {
                errors.push(format!(
                    "Constraint {} '{}' references variable {} but problem has {} variables",
                    c, constraint.name, i, num_vars
                ));
            }
        }

        for (i, var) in problem.variables.iter().enumerate() {
            if let Some(upper) = var.upper_bound {
                if var.lower_bound > upper {
                    errors.push(format!(
                        "Variable {} '{}' has lower bound ({}) > upper bound ({})",
                        i, var.name, var.lower_bound, upper
                    ));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SolverError::InvalidProblem(errors.join("; ")))
        }
    }

    /// Get the name of this solver backend
    fn name(&self) -> &str;

    /// Check if this solver supports mixed-integer programming
    fn supports_mip(&self) -> bool;
}
