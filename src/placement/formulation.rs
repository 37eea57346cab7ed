// Exact MILP formulation of interference-aware tower placement.
//
// Variables, per grid cell `c` in row-major order:
//
// * `x_c ∈ {0, 1}`: a tower is placed on `c`
// * `w_c ∈ [0, M_c]` integer: towers inside the Chebyshev window of
//   half-width `penalty_radius - 1` around `c`, where `M_c` is the clipped
//   window size
// * `p_c ∈ [0, M_c]`: stands for the product `x_c · w_c`
//
// The quadratic objective `Σ x_c · w_c` is linearized with McCormick rows
// `p_c ≥ w_c − M_c(1 − x_c)`, `p_c ≤ w_c`, `p_c ≤ M_c x_c`, which pin `p_c`
// to the product for every integral `x`.
//
// With `ExactObjective::TowerCount` only the `x_c` block exists and the
// objective is `Σ x_c`.

use crate::domain::{
    Constraint, ConstraintType, CoverageMode, ExactObjective, Instance, ObjectiveFunction,
    OptimizationProblem, Point, Solution, SolutionStatus, SolveResult, SolverConfig,
    SolverService, SolverStatistics, Term, Variable,
};
use crate::error::{PlacementError, Result};
use crate::geometry::{chebyshev_offsets, Grid};
use crate::placement::coverage::CoverageMap;

/// Values above this read as "selected" when decoding
const SELECTED_THRESHOLD: f64 = 0.5;

/// Knobs of the exact model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormulationOptions {
    pub coverage: CoverageMode,
    pub objective: ExactObjective,
}

impl FormulationOptions {
    pub fn with_coverage(mut self, coverage: CoverageMode) -> Self {
        self.coverage = coverage;
        self
    }

    pub fn with_objective(mut self, objective: ExactObjective) -> Self {
        self.objective = objective;
        self
    }
}

/// The MILP for one instance plus the variable layout needed to decode it
#[derive(Debug, Clone)]
pub struct TowerFormulation {
    grid: Grid,
    options: FormulationOptions,
    problem: OptimizationProblem,
}

impl TowerFormulation {
    pub fn build(instance: &Instance, coverage: &CoverageMap, options: FormulationOptions) -> Self {
        let grid = instance.grid();
        let n = grid.num_cells();

        let mut variables: Vec<Variable> = grid
            .cells()
            .map(|c| Variable::binary(format!("x_{}_{}", c.x, c.y)))
            .collect();
        let mut constraints = Vec::with_capacity(coverage.num_cities() + 3 * n);

        let (coverage_type, coverage_label) = match options.coverage {
            CoverageMode::AtLeastOne => (ConstraintType::GreaterThanOrEqual, "cover"),
            CoverageMode::ExactlyOne => (ConstraintType::Equal, "cover_once"),
        };
        for (city, cells) in coverage.iter() {
            let terms = cells.iter().map(|&c| (grid.index(c), 1.0)).collect();
            constraints.push(
                Constraint::new(coverage_type, terms, 1.0)
                    .with_name(format!("{}_{}_{}", coverage_label, city.x, city.y)),
            );
        }

        let objective = match options.objective {
            ExactObjective::TowerCount => {
                ObjectiveFunction::minimize((0..n).map(|i| (i, 1.0)).collect())
            }
            ExactObjective::Interference => {
                // A half-width of side - 1 already spans the grid from any cell
                let half_width = (instance.penalty_radius() - 1).min(grid.side() - 1);
                let window = chebyshev_offsets(half_width);
                let mut products = Vec::with_capacity(n);

                for cell in grid.cells() {
                    let i = grid.index(cell);
                    let (w, p) = (n + i, 2 * n + i);
                    let members: Vec<usize> =
                        grid.translate(cell, &window).map(|c| grid.index(c)).collect();
                    let big_m = members.len() as f64;

                    variables.push(
                        Variable::integer(format!("w_{}_{}", cell.x, cell.y))
                            .with_bounds(0.0, Some(big_m)),
                    );

                    // w_c = Σ x over the window
                    let mut terms: Vec<Term> = Vec::with_capacity(members.len() + 1);
                    terms.push((w, 1.0));
                    terms.extend(members.iter().map(|&m| (m, -1.0)));
                    constraints.push(
                        Constraint::new(ConstraintType::Equal, terms, 0.0)
                            .with_name(format!("density_{}_{}", cell.x, cell.y)),
                    );

                    constraints.extend(mccormick_rows(cell, i, w, p, big_m));
                    products.push((p, 1.0));
                }

                for cell in grid.cells() {
                    let i = grid.index(cell);
                    let big_m = variables[n + i].upper_bound.unwrap_or(0.0);
                    variables.push(
                        Variable::continuous(format!("p_{}_{}", cell.x, cell.y))
                            .with_bounds(0.0, Some(big_m)),
                    );
                }

                ObjectiveFunction::minimize(products)
            }
        };

        let problem = OptimizationProblem::new(objective)
            .with_name(format!(
                "towers {0}x{0}, {1} cities, penalty radius {2}",
                grid.side(),
                coverage.num_cities(),
                instance.penalty_radius()
            ))
            .with_variables(variables)
            .with_constraints(constraints);

        log::debug!(
            "formulation '{}': {} variables, {} constraints",
            problem.name,
            problem.num_variables(),
            problem.constraints.len()
        );

        Self {
            grid,
            options,
            problem,
        }
    }

    pub fn with_config(mut self, config: SolverConfig) -> Self {
        self.problem.solver_config = config;
        self
    }

    pub fn problem(&self) -> &OptimizationProblem {
        &self.problem
    }

    pub fn options(&self) -> FormulationOptions {
        self.options
    }

    pub fn selected_var(&self, cell: Point) -> usize {
        self.grid.index(cell)
    }

    pub fn density_var(&self, cell: Point) -> Option<usize> {
        self.has_density()
            .then(|| self.grid.num_cells() + self.grid.index(cell))
    }

    pub fn product_var(&self, cell: Point) -> Option<usize> {
        self.has_density()
            .then(|| 2 * self.grid.num_cells() + self.grid.index(cell))
    }

    fn has_density(&self) -> bool {
        self.options.objective == ExactObjective::Interference
    }

    /// Towers selected in `result`, row-major
    pub fn decode(&self, result: &SolveResult) -> Result<Vec<Point>> {
        let expected = self.problem.num_variables();
        if result.variable_values.len() != expected {
            return Err(PlacementError::MalformedResult {
                expected,
                got: result.variable_values.len(),
            });
        }

        Ok(self
            .grid
            .cells()
            .filter(|&c| result.variable_values[self.selected_var(c)] > SELECTED_THRESHOLD)
            .collect())
    }
}

/// Rows tying `p` to `x · w` for a binary `x` and `0 <= w <= big_m`
fn mccormick_rows(cell: Point, x: usize, w: usize, p: usize, big_m: f64) -> [Constraint; 3] {
    [
        // p - w - M x >= -M
        Constraint::new(
            ConstraintType::GreaterThanOrEqual,
            vec![(p, 1.0), (w, -1.0), (x, -big_m)],
            -big_m,
        )
        .with_name(format!("product_lower_{}_{}", cell.x, cell.y)),
        Constraint::new(ConstraintType::LessThanOrEqual, vec![(p, 1.0), (w, -1.0)], 0.0)
            .with_name(format!("product_density_{}_{}", cell.x, cell.y)),
        Constraint::new(
            ConstraintType::LessThanOrEqual,
            vec![(p, 1.0), (x, -big_m)],
            0.0,
        )
        .with_name(format!("product_selected_{}_{}", cell.x, cell.y)),
    ]
}

/// Outcome of an exact solve
#[derive(Debug, Clone)]
pub struct ExactPlacement<'a> {
    pub solution: Solution<'a>,
    pub status: SolutionStatus,
    pub objective_value: Option<f64>,
    pub statistics: SolverStatistics,
}

impl ExactPlacement<'_> {
    pub fn is_optimal(&self) -> bool {
        self.status == SolutionStatus::Optimal
    }
}

/// Build the formulation for `instance`, solve it and decode the towers.
///
/// A time-limited incumbent is accepted and reported as such. Infeasible or
/// unbounded answers are fatal.
pub fn exact_placement<'a>(
    instance: &'a Instance,
    solver: &dyn SolverService,
    options: FormulationOptions,
    config: SolverConfig,
) -> Result<ExactPlacement<'a>> {
    let coverage = CoverageMap::build(instance);
    let formulation = TowerFormulation::build(instance, &coverage, options).with_config(config);

    log::info!(
        "solving exact model with {}: {} variables, {} constraints",
        solver.name(),
        formulation.problem().num_variables(),
        formulation.problem().constraints.len()
    );
    let result = solver.solve(formulation.problem())?;

    match result.status {
        SolutionStatus::Infeasible | SolutionStatus::Unbounded => {
            return Err(PlacementError::InfeasibleFormulation {
                status: result.status,
                message: result.message,
            });
        }
        _ if !result.has_incumbent() => {
            return Err(PlacementError::NoIncumbent(result.message));
        }
        SolutionStatus::TimeLimit => {
            log::warn!("time limit reached, using best incumbent (not proven optimal)");
        }
        SolutionStatus::Feasible => {
            log::warn!("solver stopped on the MIP gap, using best incumbent (not proven optimal)");
        }
        _ => {}
    }

    let towers = formulation.decode(&result)?;
    log::info!(
        "exact solve finished: {} with {} towers, objective {:?} in {:.1} ms",
        result.status,
        towers.len(),
        result.objective_value,
        result.statistics.solve_time_ms
    );

    Ok(ExactPlacement {
        solution: Solution::new(instance, towers),
        status: result.status,
        objective_value: result.objective_value,
        statistics: result.statistics,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::domain::{DensityPenalty, OptimizationType, SolverError, VariableType};
    use crate::placement::greedy::greedy_placement;

    /// Exhaustive search over the tower block; density and product values are
    /// derived from the towers, then every row is checked.
    pub(crate) struct EnumerationSolver {
        pub instance: Instance,
    }

    impl SolverService for EnumerationSolver {
        fn solve(
            &self,
            problem: &OptimizationProblem,
        ) -> crate::domain::Result<SolveResult> {
            let grid = self.instance.grid();
            let n = grid.num_cells();
            if n > 16 {
                return Err(SolverError::SolverNotAvailable(
                    "enumeration is limited to 16 cells".to_string(),
                ));
            }
            let has_density = problem.num_variables() == 3 * n;

            let mut best: Option<(f64, Vec<f64>)> = None;
            for mask in 0u32..(1 << n) {
                let towers: Vec<Point> = (0..n)
                    .filter(|&i| mask & (1 << i) != 0)
                    .map(|i| grid.point(i))
                    .collect();
                let mut values = vec![0.0; problem.num_variables()];
                for &t in &towers {
                    values[grid.index(t)] = 1.0;
                }
                if has_density {
                    for cell in grid.cells() {
                        let i = grid.index(cell);
                        let w = DensityPenalty::density_at(&self.instance, cell, &towers) as f64;
                        values[n + i] = w;
                        values[2 * n + i] = values[i] * w;
                    }
                }
                if !problem
                    .constraints
                    .iter()
                    .all(|c| c.is_satisfied_by(&values, 1e-9))
                {
                    continue;
                }
                let value = problem.objective.evaluate(&values);
                if best.as_ref().map_or(true, |(b, _)| value < *b) {
                    best = Some((value, values));
                }
            }

            Ok(match best {
                Some((value, values)) => SolveResult::optimal(value, values),
                None => SolveResult::new(SolutionStatus::Infeasible, "no assignment"),
            })
        }

        fn name(&self) -> &str {
            "enumeration"
        }

        fn supports_mip(&self) -> bool {
            true
        }
    }

    fn corners(side: i32) -> Vec<Point> {
        let m = side - 1;
        vec![
            Point::new(0, 0),
            Point::new(0, m),
            Point::new(m, 0),
            Point::new(m, m),
        ]
    }

    #[test]
    fn test_model_shape() {
        let instance = Instance::new(3, 2, [Point::new(1, 1)]).unwrap();
        let coverage = CoverageMap::build(&instance);
        let f = TowerFormulation::build(&instance, &coverage, FormulationOptions::default());
        let problem = f.problem();

        assert_eq!(problem.num_variables(), 27);
        assert_eq!(problem.num_binary_variables(), 9);
        assert_eq!(problem.num_integer_variables(), 18);
        assert_eq!(problem.constraints.len(), 1 + 9 + 27);
        assert_eq!(problem.objective.optimization_type, OptimizationType::Minimize);
        assert_eq!(problem.objective.terms.len(), 9);

        let cover = &problem.constraints[0];
        assert_eq!(cover.constraint_type, ConstraintType::GreaterThanOrEqual);
        assert_eq!(cover.terms.len(), 9);

        // Corner window is clipped to a 2x2 block.
        let corner = Point::new(0, 0);
        let w = f.density_var(corner).unwrap();
        assert_eq!(problem.variables[w].upper_bound, Some(4.0));
        assert_eq!(problem.variables[w].variable_type, VariableType::Integer);
        let p = f.product_var(corner).unwrap();
        assert_eq!(problem.variables[p].variable_type, VariableType::Continuous);
        assert_eq!(problem.variables[p].name, "p_0_0");
        let density_row = problem
            .constraints
            .iter()
            .find(|c| c.name == "density_0_0")
            .unwrap();
        assert_eq!(density_row.terms.len(), 5);
    }

    #[test]
    fn test_tower_count_objective_has_no_density_block() {
        let instance = Instance::new(4, 2, corners(4)).unwrap();
        let coverage = CoverageMap::build(&instance);
        let options = FormulationOptions::default()
            .with_objective(ExactObjective::TowerCount)
            .with_coverage(CoverageMode::ExactlyOne);
        let f = TowerFormulation::build(&instance, &coverage, options);

        assert_eq!(f.problem().num_variables(), 16);
        assert_eq!(f.problem().constraints.len(), 4);
        assert!(f
            .problem()
            .constraints
            .iter()
            .all(|c| c.constraint_type == ConstraintType::Equal));
        assert!(f.density_var(Point::new(0, 0)).is_none());
    }

    #[test]
    fn test_mccormick_pins_product() {
        let rows = mccormick_rows(Point::new(0, 0), 0, 1, 2, 4.0);
        let feasible = |x: f64, w: f64, p: f64| rows.iter().all(|r| r.is_satisfied_by(&[x, w, p], 1e-9));

        assert!(feasible(1.0, 3.0, 3.0));
        assert!(!feasible(1.0, 3.0, 2.0));
        assert!(feasible(0.0, 3.0, 0.0));
        assert!(!feasible(0.0, 3.0, 1.0));
    }

    #[test]
    fn test_objective_matches_density_penalty() {
        let instance = Instance::new(3, 2, [Point::new(0, 0), Point::new(2, 2)]).unwrap();
        let solver = EnumerationSolver {
            instance: instance.clone(),
        };
        let exact = exact_placement(
            &instance,
            &solver,
            FormulationOptions::default(),
            SolverConfig::default(),
        )
        .unwrap();

        assert!(exact.is_optimal());
        assert!(exact.solution.is_valid());
        let surrogate = exact.solution.penalty_with(&DensityPenalty);
        assert_eq!(exact.objective_value, Some(surrogate));
        // One tower covers both cities on a 3x3 grid.
        assert_eq!(surrogate, 1.0);
    }

    #[test]
    fn test_exact_never_uses_more_towers_than_greedy() {
        let instance = Instance::new(4, 2, corners(4)).unwrap();
        let solver = EnumerationSolver {
            instance: instance.clone(),
        };
        let options = FormulationOptions::default().with_objective(ExactObjective::TowerCount);
        let exact = exact_placement(&instance, &solver, options, SolverConfig::default()).unwrap();
        let greedy = greedy_placement(&instance);

        assert!(exact.solution.is_valid());
        assert!(exact.solution.towers().len() <= greedy.towers().len());
    }

    #[test]
    fn test_infeasible_answer_is_fatal() {
        struct Refusing;
        impl SolverService for Refusing {
            fn solve(
                &self,
                _problem: &OptimizationProblem,
            ) -> crate::domain::Result<SolveResult> {
                Ok(SolveResult::new(SolutionStatus::Infeasible, "refused"))
            }
            fn name(&self) -> &str {
                "refusing"
            }
            fn supports_mip(&self) -> bool {
                true
            }
        }

        let instance = Instance::new(3, 2, [Point::new(1, 1)]).unwrap();
        let err = exact_placement(
            &instance,
            &Refusing,
            FormulationOptions::default(),
            SolverConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            PlacementError::InfeasibleFormulation {
                status: SolutionStatus::Infeasible,
                ..
            }
        ));
    }

    #[test]
    fn test_time_limited_incumbent_is_accepted() {
        struct Stopped;
        impl SolverService for Stopped {
            fn solve(
                &self,
                problem: &OptimizationProblem,
            ) -> crate::domain::Result<SolveResult> {
                let mut values = vec![0.0; problem.num_variables()];
                values[4] = 1.0;
                Ok(SolveResult::time_limited(1.0, values))
            }
            fn name(&self) -> &str {
                "stopped"
            }
            fn supports_mip(&self) -> bool {
                true
            }
        }

        let instance = Instance::new(3, 2, [Point::new(1, 1)]).unwrap();
        let exact = exact_placement(
            &instance,
            &Stopped,
            FormulationOptions::default(),
            SolverConfig::default().with_time_limit(1.0),
        )
        .unwrap();
        assert_eq!(exact.status, SolutionStatus::TimeLimit);
        assert!(!exact.is_optimal());
        assert_eq!(exact.solution.towers(), &[Point::new(1, 1)]);
    }

    struct StopsWith {
        status: SolutionStatus,
        selected: Option<usize>,
    }

    impl SolverService for StopsWith {
        fn solve(&self, problem: &OptimizationProblem) -> crate::domain::Result<SolveResult> {
            let mut values = vec![0.0; problem.num_variables()];
            if let Some(i) = self.selected {
                values[i] = 1.0;
            }
            Ok(SolveResult::stopped_early(problem, self.status, values, 1e-6))
        }
        fn name(&self) -> &str {
            "stops early"
        }
        fn supports_mip(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_gap_stop_is_accepted_but_not_optimal() {
        let instance = Instance::new(3, 2, [Point::new(1, 1)]).unwrap();
        let solver = StopsWith {
            status: SolutionStatus::Feasible,
            selected: Some(4),
        };
        let options = FormulationOptions::default().with_objective(ExactObjective::TowerCount);
        let exact = exact_placement(&instance, &solver, options, SolverConfig::default()).unwrap();

        assert_eq!(exact.status, SolutionStatus::Feasible);
        assert!(!exact.is_optimal());
        assert_eq!(exact.solution.towers(), &[Point::new(1, 1)]);
    }

    #[test]
    fn test_time_limit_without_incumbent_is_reported() {
        let instance = Instance::new(3, 2, [Point::new(1, 1)]).unwrap();
        // All-zero columns leave the city uncovered.
        let solver = StopsWith {
            status: SolutionStatus::TimeLimit,
            selected: None,
        };
        let err = exact_placement(
            &instance,
            &solver,
            FormulationOptions::default(),
            SolverConfig::default().with_time_limit(1.0),
        )
        .unwrap_err();
        assert!(matches!(err, PlacementError::NoIncumbent(_)));
    }

    #[test]
    fn test_huge_penalty_radius_clips_window_to_grid() {
        let cities = [Point::new(1, 1)];
        let small = Instance::new(3, 3, cities).unwrap();
        let huge = Instance::new(3, 1_000_000, cities).unwrap();
        let build = |instance: &Instance| {
            TowerFormulation::build(
                instance,
                &CoverageMap::build(instance),
                FormulationOptions::default(),
            )
        };
        let (a, b) = (build(&small), build(&huge));

        assert_eq!(b.problem().num_variables(), 27);
        assert_eq!(a.problem().constraints.len(), b.problem().constraints.len());
        for cell in huge.grid().cells() {
            let w = b.density_var(cell).unwrap();
            assert_eq!(b.problem().variables[w].upper_bound, Some(9.0));
            assert_eq!(
                a.problem().variables[w].upper_bound,
                b.problem().variables[w].upper_bound
            );
        }
    }

    #[test]
    fn test_decode_rejects_wrong_length() {
        let instance = Instance::new(3, 2, [Point::new(1, 1)]).unwrap();
        let coverage = CoverageMap::build(&instance);
        let f = TowerFormulation::build(&instance, &coverage, FormulationOptions::default());
        let err = f.decode(&SolveResult::optimal(0.0, vec![1.0; 3])).unwrap_err();
        assert!(matches!(
            err,
            PlacementError::MalformedResult {
                expected: 27,
                got: 3
            }
        ));
    }
}
