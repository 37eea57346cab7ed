// Application layer: placement use case and text formats

pub mod io;
pub mod planner;

pub use planner::{PlacementReport, PlacementService, Strategy};
