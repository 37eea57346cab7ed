// Interference penalty models
// The scoring rule is a configuration point; the exact formulation minimizes
// `DensityPenalty` as a surrogate for it.

use super::instance::Instance;
use super::value_objects::Point;
use crate::geometry::within_radius;

/// Interference cost of a realized tower set
pub trait PenaltyModel: Send + Sync {
    fn penalty(&self, instance: &Instance, towers: &[Point]) -> f64;

    fn name(&self) -> &str;
}

/// Scoring rule of the course harness: each tower pays
/// `scale · e^(rate · w)`, where `w` counts the other towers within Euclidean
/// distance `penalty_radius`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialPenalty {
    pub scale: f64,
    pub rate: f64,
}

impl Default for ExponentialPenalty {
    fn default() -> Self {
        Self {
            scale: 170.0,
            rate: 0.17,
        }
    }
}

impl PenaltyModel for ExponentialPenalty {
    fn penalty(&self, instance: &Instance, towers: &[Point]) -> f64 {
        let radius = instance.penalty_radius();
        towers
            .iter()
            .enumerate()
            .map(|(i, &tower)| {
                let neighbors = towers
                    .iter()
                    .enumerate()
                    .filter(|&(j, &other)| j != i && within_radius(tower, other, radius))
                    .count();
                self.scale * (self.rate * neighbors as f64).exp()
            })
            .sum()
    }

    fn name(&self) -> &str {
        "exponential"
    }
}

/// Sum over towers of the number of towers (itself included) inside the
/// Chebyshev window of half-width `penalty_radius - 1`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DensityPenalty;

impl DensityPenalty {
    /// Local density of `cell` under `towers`
    pub fn density_at(instance: &Instance, cell: Point, towers: &[Point]) -> usize {
        let half_width = instance.penalty_radius() - 1;
        towers
            .iter()
            .filter(|&&t| t.chebyshev_distance(cell) <= half_width)
            .count()
    }
}

impl PenaltyModel for DensityPenalty {
    fn penalty(&self, instance: &Instance, towers: &[Point]) -> f64 {
        towers
            .iter()
            .map(|&t| Self::density_at(instance, t, towers) as f64)
            .sum()
    }

    fn name(&self) -> &str {
        "density"
    }
}
