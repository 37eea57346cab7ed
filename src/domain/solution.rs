use std::collections::HashSet;

use super::instance::Instance;
use super::penalty::{ExponentialPenalty, PenaltyModel};
use super::value_objects::Point;
use crate::geometry::within_radius;

/// Why a tower set does not answer its instance
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("city {0} is not within service radius of any tower")]
    UncoveredCity(Point),

    #[error("tower {tower} lies outside the {side}x{side} grid")]
    TowerOutOfBounds { tower: Point, side: i32 },

    #[error("tower {0} is listed more than once")]
    DuplicateTower(Point),
}

/// A tower set answering a specific instance
#[derive(Debug, Clone)]
pub struct Solution<'a> {
    instance: &'a Instance,
    towers: Vec<Point>,
}

impl<'a> Solution<'a> {
    pub fn new(instance: &'a Instance, towers: Vec<Point>) -> Self {
        Self { instance, towers }
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn towers(&self) -> &[Point] {
        &self.towers
    }

    pub fn into_towers(self) -> Vec<Point> {
        self.towers
    }

    /// Check bounds, distinctness and full coverage, reporting the first
    /// violation found.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let grid = self.instance.grid();
        let mut seen = HashSet::with_capacity(self.towers.len());
        for &tower in &self.towers {
            if !grid.contains(tower) {
                return Err(ValidationError::TowerOutOfBounds {
                    tower,
                    side: grid.side(),
                });
            }
            if !seen.insert(tower) {
                return Err(ValidationError::DuplicateTower(tower));
            }
        }

        let radius = self.instance.service_radius();
        match self
            .instance
            .cities()
            .iter()
            .find(|&&city| !self.towers.iter().any(|&t| within_radius(t, city, radius)))
        {
            Some(&city) => Err(ValidationError::UncoveredCity(city)),
            None => Ok(()),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Penalty under the default scoring rule
    pub fn penalty(&self) -> f64 {
        self.penalty_with(&ExponentialPenalty::default())
    }

    pub fn penalty_with(&self, model: &dyn PenaltyModel) -> f64 {
        model.penalty(self.instance, &self.towers)
    }
}
