// Domain layer: instances, solutions, penalties and the MILP model
pub mod domain;

// Lattice shapes and grid clipping
pub mod geometry;

// Placement core: coverage sets, exact formulation, greedy heuristic
pub mod placement;

// Solver adapters: concrete implementations of SolverService
pub mod solver;

// Application layer: orchestration and file formats
pub mod application;

pub mod error;

// Re-export commonly used types
pub use domain::{
    CoverageMode, DensityPenalty, ExactObjective, ExponentialPenalty, Instance, InstanceError,
    OptimizationProblem, PenaltyModel, Point, Solution, SolutionStatus, SolveResult,
    SolverBackend, SolverConfig, SolverError, SolverService, ValidationError, SERVICE_RADIUS,
};

pub use application::{PlacementReport, PlacementService, Strategy};
pub use error::PlacementError;
pub use placement::{
    exact_placement, greedy_placement, thin_cities, CoverageMap, FormulationOptions,
    TowerFormulation,
};

#[cfg(feature = "cbc")]
pub use solver::CoinCbcSolver;
#[cfg(feature = "highs")]
pub use solver::HighsSolver;
pub use solver::SolverFactory;
