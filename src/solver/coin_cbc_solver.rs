// COIN-OR CBC adapter through good_lp

use crate::domain::{
    models::{OptimizationProblem, SolveResult, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus, VariableType},
};
use good_lp::{
    solvers::coin_cbc, variable, variables, Expression, ResolutionError,
    Solution as GoodLpSolutionTrait, SolutionStatus as GoodLpStatus, SolverModel,
    Variable as GoodLpVariable, WithMipGap, WithTimeLimit,
};
use std::time::Instant;

/// Row slack allowed when checking an incumbent CBC stopped early on
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

/// CBC only proves optimality when it finishes; a gap stop is merely feasible
fn map_status(status: GoodLpStatus) -> SolutionStatus {
    match status {
        GoodLpStatus::Optimal => SolutionStatus::Optimal,
        GoodLpStatus::TimeLimit => SolutionStatus::TimeLimit,
        GoodLpStatus::GapLimit => SolutionStatus::Feasible,
    }
}

pub struct CoinCbcSolver;

impl CoinCbcSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CoinCbcSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for CoinCbcSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<SolveResult> {
        self.validate(problem)?;

        let start_time = Instant::now();
        let config = &problem.solver_config;

        let mut vars = variables!();
        let lp_variables: Vec<GoodLpVariable> = problem
            .variables
            .iter()
            .map(|var_def| {
                let lower = var_def.lower_bound;
                let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);
                match var_def.variable_type {
                    VariableType::Binary => vars.add(variable().binary()),
                    VariableType::Integer => {
                        vars.add(variable().integer().min(lower).max(upper))
                    }
                    VariableType::Continuous => vars.add(variable().min(lower).max(upper)),
                }
            })
            .collect();

        // good_lp minimizes, so negate for maximization
        let sign = match problem.objective.optimization_type {
            OptimizationType::Minimize => 1.0,
            OptimizationType::Maximize => -1.0,
        };
        let mut obj_expr: Expression = 0.into();
        for &(i, coeff) in &problem.objective.terms {
            obj_expr += (sign * coeff) * lp_variables[i];
        }

        let mut lp_model = vars.minimise(obj_expr).using(coin_cbc::coin_cbc);
        lp_model.set_parameter("log", if config.verbose { "1" } else { "0" });
        if let Some(seconds) = config.time_limit {
            lp_model = lp_model.with_time_limit(seconds);
        }
        if let Some(gap) = config.gap_tolerance {
            lp_model = lp_model
                .with_mip_gap(gap as f32)
                .map_err(|e| SolverError::InvalidProblem(format!("bad MIP gap {}: {}", gap, e)))?;
        }

        for constraint in &problem.constraints {
            let mut lhs: Expression = 0.into();
            for &(i, coeff) in &constraint.terms {
                lhs += coeff * lp_variables[i];
            }

            lp_model = match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => lp_model.with(lhs.leq(constraint.bound)),
                ConstraintType::Equal => lp_model.with(lhs.eq(constraint.bound)),
                ConstraintType::GreaterThanOrEqual => lp_model.with(lhs.geq(constraint.bound)),
            };
        }

        let solution_result = lp_model.solve();
        let elapsed = start_time.elapsed();
        let statistics = SolverStatistics::for_problem(problem, elapsed.as_secs_f64() * 1000.0);

        match solution_result {
            Ok(sol) => {
                let variable_values: Vec<f64> =
                    lp_variables.iter().map(|&var| sol.value(var)).collect();

                let solution = match map_status(sol.status()) {
                    SolutionStatus::Optimal => {
                        let objective = problem.objective.evaluate(&variable_values);
                        let mut optimal = SolveResult::optimal(objective, variable_values);
                        optimal.message = format!("Optimal solution found for '{}'", problem.name);
                        optimal
                    }
                    stopped => SolveResult::stopped_early(
                        problem,
                        stopped,
                        variable_values,
                        FEASIBILITY_TOLERANCE,
                    ),
                };
                Ok(solution.with_statistics(statistics))
            }
            Err(ResolutionError::Infeasible) => Ok(SolveResult::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            Err(ResolutionError::Unbounded) => Ok(SolveResult::new(
                SolutionStatus::Unbounded,
                "Problem is unbounded: objective can be improved infinitely",
            )
            .with_statistics(statistics)),
            Err(e) => Err(SolverError::ExecutionFailed(format!("{:?}", e))),
        }
    }

    fn name(&self) -> &str {
        "COIN-OR CBC"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}
