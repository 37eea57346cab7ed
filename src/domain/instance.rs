use std::collections::HashSet;

use super::value_objects::Point;
use crate::geometry::Grid;

/// Euclidean radius within which a tower serves a city
pub const SERVICE_RADIUS: i32 = 3;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InstanceError {
    #[error("grid side length must be positive, got {0}")]
    NonPositiveGrid(i32),

    #[error("penalty radius must be positive, got {0}")]
    NonPositivePenaltyRadius(i32),

    #[error("city {city} lies outside the {side}x{side} grid")]
    CityOutOfBounds { city: Point, side: i32 },
}

/// A placement problem: cities on a square grid plus the penalty radius
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    grid_side_length: i32,
    penalty_radius: i32,
    cities: Vec<Point>,
}

impl Instance {
    /// Build a validated instance. Repeated city positions are collapsed,
    /// keeping the first occurrence in place.
    pub fn new(
        grid_side_length: i32,
        penalty_radius: i32,
        cities: impl IntoIterator<Item = Point>,
    ) -> Result<Self, InstanceError> {
        if grid_side_length <= 0 {
            return Err(InstanceError::NonPositiveGrid(grid_side_length));
        }
        if penalty_radius <= 0 {
            return Err(InstanceError::NonPositivePenaltyRadius(penalty_radius));
        }

        let grid = Grid::new(grid_side_length);
        let mut seen = HashSet::new();
        let mut unique = Vec::new();
        for city in cities {
            if !grid.contains(city) {
                return Err(InstanceError::CityOutOfBounds {
                    city,
                    side: grid_side_length,
                });
            }
            if seen.insert(city) {
                unique.push(city);
            } else {
                log::debug!("dropping duplicate city {}", city);
            }
        }

        Ok(Self {
            grid_side_length,
            penalty_radius,
            cities: unique,
        })
    }

    pub fn grid_side_length(&self) -> i32 {
        self.grid_side_length
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.grid_side_length)
    }

    pub fn service_radius(&self) -> i32 {
        SERVICE_RADIUS
    }

    pub fn penalty_radius(&self) -> i32 {
        self.penalty_radius
    }

    pub fn cities(&self) -> &[Point] {
        &self.cities
    }

    /// A copy of this instance over a different city list
    pub fn with_cities(
        &self,
        cities: impl IntoIterator<Item = Point>,
    ) -> Result<Self, InstanceError> {
        Self::new(self.grid_side_length, self.penalty_radius, cities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_parameters() {
        assert_eq!(
            Instance::new(0, 2, []),
            Err(InstanceError::NonPositiveGrid(0))
        );
        assert_eq!(
            Instance::new(5, 0, []),
            Err(InstanceError::NonPositivePenaltyRadius(0))
        );
        assert_eq!(
            Instance::new(5, 2, [Point::new(5, 0)]),
            Err(InstanceError::CityOutOfBounds {
                city: Point::new(5, 0),
                side: 5
            })
        );
    }

    #[test]
    fn test_duplicates_collapse_in_order() {
        let instance = Instance::new(
            10,
            2,
            [Point::new(3, 3), Point::new(1, 1), Point::new(3, 3)],
        )
        .unwrap();
        assert_eq!(instance.cities(), &[Point::new(3, 3), Point::new(1, 1)]);
        assert_eq!(instance.service_radius(), 3);
    }
}
