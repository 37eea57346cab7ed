// Placement use case: run a strategy, insist on a valid answer, score it

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::{
    ExponentialPenalty, Instance, PenaltyModel, Solution, SolutionStatus, SolverConfig,
    SolverService,
};
use crate::error::{PlacementError, Result};
use crate::placement::{exact_placement, greedy_placement, FormulationOptions};
use crate::solver::SolverFactory;

/// How towers are chosen
#[derive(Debug, Clone)]
pub enum Strategy {
    /// One tower on every city
    Naive,
    /// Set-cover heuristic, no solver needed
    Greedy,
    /// MILP through a solver backend
    Exact {
        options: FormulationOptions,
        config: SolverConfig,
    },
}

impl Strategy {
    pub fn exact() -> Self {
        Strategy::Exact {
            options: FormulationOptions::default(),
            config: SolverConfig::default(),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Naive => write!(f, "naive"),
            Strategy::Greedy => write!(f, "greedy"),
            Strategy::Exact { config, .. } => write!(f, "exact ({})", config.backend),
        }
    }
}

/// A validated, scored placement
#[derive(Debug, Clone)]
pub struct PlacementReport<'a> {
    pub solution: Solution<'a>,
    pub strategy: String,
    /// Solver status for exact runs
    pub status: Option<SolutionStatus>,
    pub penalty: f64,
    pub elapsed_ms: f64,
}

impl PlacementReport<'_> {
    /// Only exact runs that finished to optimality are proven optimal
    pub fn is_proven_optimal(&self) -> bool {
        self.status == Some(SolutionStatus::Optimal)
    }
}

pub struct PlacementService {
    penalty_model: Arc<dyn PenaltyModel>,
    solver: Option<Arc<dyn SolverService>>,
}

impl PlacementService {
    pub fn new() -> Self {
        Self {
            penalty_model: Arc::new(ExponentialPenalty::default()),
            solver: None,
        }
    }

    pub fn with_penalty_model(mut self, model: Arc<dyn PenaltyModel>) -> Self {
        self.penalty_model = model;
        self
    }

    /// Use this solver for exact runs instead of the configured backend
    pub fn with_solver(mut self, solver: Arc<dyn SolverService>) -> Self {
        self.solver = Some(solver);
        self
    }

    pub fn solve<'a>(&self, instance: &'a Instance, strategy: &Strategy) -> Result<PlacementReport<'a>> {
        log::info!(
            "placing towers for {} cities on a {}x{} grid using {}",
            instance.cities().len(),
            instance.grid_side_length(),
            instance.grid_side_length(),
            strategy
        );
        let start = Instant::now();

        let (solution, status) = match strategy {
            Strategy::Naive => (Solution::new(instance, instance.cities().to_vec()), None),
            Strategy::Greedy => (greedy_placement(instance), None),
            Strategy::Exact { options, config } => {
                let solver = match &self.solver {
                    Some(solver) => Arc::clone(solver),
                    None => SolverFactory::create_solver(config)?,
                };
                log::info!("   Using solver: {}", solver.name());
                let exact = exact_placement(instance, solver.as_ref(), *options, config.clone())?;
                (exact.solution, Some(exact.status))
            }
        };
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        let report = self.score(solution, strategy.to_string(), status, elapsed_ms)?;
        log::info!(
            "{}: {} towers, {} penalty {:.3}{}",
            report.strategy,
            report.solution.towers().len(),
            self.penalty_model.name(),
            report.penalty,
            if report.status == Some(SolutionStatus::TimeLimit) {
                " (time limit, not proven optimal)"
            } else {
                ""
            }
        );
        Ok(report)
    }

    /// Validate and score a tower set produced elsewhere
    pub fn evaluate<'a>(&self, solution: Solution<'a>) -> Result<PlacementReport<'a>> {
        self.score(solution, "external".to_string(), None, 0.0)
    }

    fn score<'a>(
        &self,
        solution: Solution<'a>,
        strategy: String,
        status: Option<SolutionStatus>,
        elapsed_ms: f64,
    ) -> Result<PlacementReport<'a>> {
        if let Err(source) = solution.validate() {
            log::error!("{} returned an invalid placement: {}", strategy, source);
            return Err(PlacementError::InvalidSolution { strategy, source });
        }
        let penalty = solution.penalty_with(self.penalty_model.as_ref());

        Ok(PlacementReport {
            solution,
            strategy,
            status,
            penalty,
            elapsed_ms,
        })
    }
}

impl Default for PlacementService {
    fn default() -> Self {
        Self::new()
    }
}
