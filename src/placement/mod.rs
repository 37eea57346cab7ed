// Placement core: coverage sets and the solvers built on them

pub mod coverage;
pub mod formulation;
pub mod greedy;
pub mod thinning;

pub use coverage::CoverageMap;
pub use formulation::{exact_placement, ExactPlacement, FormulationOptions, TowerFormulation};
pub use greedy::{greedy_placement, greedy_steps, GreedyStep};
pub use thinning::thin_cities;
