// HiGHS Solver Adapter
// Translates the domain model into a HiGHS row problem

use crate::domain::{
    models::{OptimizationProblem, SolveResult, SolverStatistics},
    solver_service::{Result, SolverError, SolverService},
    value_objects::{ConstraintType, OptimizationType, SolutionStatus, VariableType},
};
use highs::{Col, HighsModelStatus, RowProblem, Sense};
use std::time::Instant;

/// Row slack allowed when checking a time-limited incumbent
const FEASIBILITY_TOLERANCE: f64 = 1e-6;

pub struct HighsSolver;

impl HighsSolver {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HighsSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverService for HighsSolver {
    fn solve(&self, problem: &OptimizationProblem) -> Result<SolveResult> {
        self.validate(problem)?;

        let start_time = Instant::now();
        let config = &problem.solver_config;

        let mut costs = vec![0.0; problem.num_variables()];
        for &(i, coeff) in &problem.objective.terms {
            costs[i] += coeff;
        }

        // Add variables first, then constraints
        let mut pb = RowProblem::default();
        let cols: Vec<Col> = problem
            .variables
            .iter()
            .zip(&costs)
            .map(|(var_def, &cost)| {
                let lower = var_def.lower_bound;
                let upper = var_def.upper_bound.unwrap_or(f64::INFINITY);
                match var_def.variable_type {
                    VariableType::Integer | VariableType::Binary => {
                        pb.add_integer_column(cost, lower..=upper)
                    }
                    VariableType::Continuous => pb.add_column(cost, lower..=upper),
                }
            })
            .collect();

        for constraint in &problem.constraints {
            let terms: Vec<(Col, f64)> = constraint
                .terms
                .iter()
                .map(|&(i, coeff)| (cols[i], coeff))
                .collect();

            match constraint.constraint_type {
                ConstraintType::LessThanOrEqual => {
                    pb.add_row(..=constraint.bound, &terms);
                }
                ConstraintType::Equal => {
                    pb.add_row(constraint.bound..=constraint.bound, &terms);
                }
                ConstraintType::GreaterThanOrEqual => {
                    pb.add_row(constraint.bound.., &terms);
                }
            }
        }

        let sense = match problem.objective.optimization_type {
            OptimizationType::Maximize => Sense::Maximise,
            OptimizationType::Minimize => Sense::Minimise,
        };

        let mut model = pb.optimise(sense);
        model.set_option("output_flag", config.verbose);
        if let Some(seconds) = config.time_limit {
            model.set_option("time_limit", seconds);
        }
        if let Some(gap) = config.gap_tolerance {
            model.set_option("mip_rel_gap", gap);
        }

        let solved = model.try_solve().map_err(|status| {
            SolverError::ExecutionFailed(format!("HiGHS failed to run: {:?}", status))
        })?;
        let statistics = SolverStatistics::for_problem(
            problem,
            start_time.elapsed().as_secs_f64() * 1000.0,
        );

        match solved.status() {
            HighsModelStatus::Optimal => {
                let variable_values = solved.get_solution().columns().to_vec();
                let objective = problem.objective.evaluate(&variable_values);

                let mut solution = SolveResult::optimal(objective, variable_values);
                solution.message = format!("Optimal solution found for '{}'", problem.name);
                Ok(solution.with_statistics(statistics))
            }
            HighsModelStatus::ReachedTimeLimit => {
                let variable_values = solved.get_solution().columns().to_vec();
                Ok(SolveResult::stopped_early(
                    problem,
                    SolutionStatus::TimeLimit,
                    variable_values,
                    FEASIBILITY_TOLERANCE,
                )
                .with_statistics(statistics))
            }
            HighsModelStatus::Infeasible => Ok(SolveResult::new(
                SolutionStatus::Infeasible,
                "Problem is infeasible: no solution satisfies all constraints",
            )
            .with_statistics(statistics)),
            HighsModelStatus::Unbounded | HighsModelStatus::UnboundedOrInfeasible => {
                Ok(SolveResult::new(
                    SolutionStatus::Unbounded,
                    "Problem is unbounded: objective can be improved infinitely",
                )
                .with_statistics(statistics))
            }
            status => Err(SolverError::ExecutionFailed(format!(
                "HiGHS solver returned status: {:?}",
                status
            ))),
        }
    }

    fn name(&self) -> &str {
        "HiGHS"
    }

    fn supports_mip(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Constraint, ObjectiveFunction, Variable};

    #[test]
    fn test_small_set_cover() {
        // Pick the cheapest pair of sets covering {a, b, c}.
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![
            (0, 1.0),
            (1, 1.0),
            (2, 3.0),
        ]))
        .with_variables(vec![
            Variable::binary("ab"),
            Variable::binary("c"),
            Variable::binary("abc"),
        ])
        .add_constraint(Constraint::new(
            ConstraintType::GreaterThanOrEqual,
            vec![(0, 1.0), (2, 1.0)],
            1.0,
        ))
        .add_constraint(Constraint::new(
            ConstraintType::GreaterThanOrEqual,
            vec![(1, 1.0), (2, 1.0)],
            1.0,
        ));

        let result = HighsSolver::new().solve(&problem).unwrap();
        assert!(result.is_optimal());
        assert!((result.objective_value.unwrap() - 2.0).abs() < 1e-6);
        assert!(result.variable_values[0] > 0.5);
        assert!(result.variable_values[1] > 0.5);
        assert!(result.variable_values[2] < 0.5);
    }

    #[test]
    fn test_reports_infeasible() {
        let problem = OptimizationProblem::new(ObjectiveFunction::minimize(vec![(0, 1.0)]))
            .with_variables(vec![Variable::binary("x")])
            .add_constraint(Constraint::new(
                ConstraintType::GreaterThanOrEqual,
                vec![(0, 1.0)],
                2.0,
            ));

        let result = HighsSolver::new().solve(&problem).unwrap();
        assert_ne!(result.status, SolutionStatus::Optimal);
        assert!(!result.has_incumbent());
    }
}
