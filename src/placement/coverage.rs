// City → candidate tower cells, and the reverse cell → covered cities map.
//
// The exact formulation and the greedy heuristic both read coverage from here,
// so they always agree on which towers serve which city.

use std::collections::{HashMap, HashSet};

use crate::domain::{Instance, Point};
use crate::geometry::coverage_offsets;

#[derive(Debug, Clone)]
pub struct CoverageMap {
    cities: Vec<Point>,
    /// Candidate cells per city, aligned with `cities`
    candidates: Vec<Vec<Point>>,
    /// City indices covered by each cell that covers anything
    covered_by: HashMap<Point, Vec<usize>>,
}

impl CoverageMap {
    pub fn build(instance: &Instance) -> Self {
        let grid = instance.grid();
        let offsets = coverage_offsets(instance.service_radius());

        let cities = instance.cities().to_vec();
        let mut candidates = Vec::with_capacity(cities.len());
        let mut covered_by: HashMap<Point, Vec<usize>> = HashMap::new();

        for (i, &city) in cities.iter().enumerate() {
            let cells: Vec<Point> = grid.translate(city, &offsets).collect();
            for &cell in &cells {
                covered_by.entry(cell).or_default().push(i);
            }
            candidates.push(cells);
        }

        log::debug!(
            "coverage map: {} cities, {} candidate cells",
            cities.len(),
            covered_by.len()
        );

        Self {
            cities,
            candidates,
            covered_by,
        }
    }

    pub fn cities(&self) -> &[Point] {
        &self.cities
    }

    pub fn num_cities(&self) -> usize {
        self.cities.len()
    }

    /// Cells that would cover the `index`-th city
    pub fn candidates(&self, index: usize) -> &[Point] {
        &self.candidates[index]
    }

    /// Cells that would cover `city`, if it belongs to the instance
    pub fn candidates_for(&self, city: Point) -> Option<&[Point]> {
        self.cities
            .iter()
            .position(|&c| c == city)
            .map(|i| self.candidates(i))
    }

    /// Indices of the cities `cell` covers; empty if it covers none
    pub fn covered_by(&self, cell: Point) -> &[usize] {
        self.covered_by.get(&cell).map(Vec::as_slice).unwrap_or(&[])
    }

    /// `(city, candidate cells)` in city order
    pub fn iter(&self) -> impl Iterator<Item = (Point, &[Point])> + '_ {
        self.cities
            .iter()
            .copied()
            .zip(self.candidates.iter().map(Vec::as_slice))
    }

    /// Every cell covering at least one city: city positions first, in city
    /// order, then the remaining cells row-major.
    pub fn candidate_cells(&self) -> Vec<Point> {
        let at_city: HashSet<Point> = self.cities.iter().copied().collect();
        let mut rest: Vec<Point> = self
            .covered_by
            .keys()
            .copied()
            .filter(|cell| !at_city.contains(cell))
            .collect();
        rest.sort_unstable();

        let mut ordered = self.cities.clone();
        ordered.extend(rest);
        ordered
    }
}
