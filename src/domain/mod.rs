// Domain module: placement model, MILP model and the solver contract

pub mod instance;
pub mod models;
pub mod penalty;
pub mod solution;
pub mod solver_service;
pub mod value_objects;

pub use instance::*;
pub use models::*;
pub use penalty::*;
pub use solution::*;
pub use solver_service::*;
pub use value_objects::*;
