// Solver-free set-cover heuristic.
//
// Repeatedly places the tower covering the most still-uncovered cities. Ties
// go to the first candidate in `CoverageMap::candidate_cells` order, so a
// tower lands on a city whenever that is among the best picks. Interference is
// not considered.

use rayon::prelude::*;

use crate::domain::{Instance, Point, Solution};
use crate::placement::coverage::CoverageMap;

/// One iteration of the greedy loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GreedyStep {
    pub tower: Point,
    pub newly_covered: usize,
    /// Uncovered cities left after this step
    pub remaining: usize,
}

/// Greedy tower set for `instance`
pub fn greedy_placement(instance: &Instance) -> Solution<'_> {
    let coverage = CoverageMap::build(instance);
    let towers = greedy_steps(&coverage).into_iter().map(|s| s.tower).collect();
    Solution::new(instance, towers)
}

/// Run the greedy loop over a prebuilt coverage map, recording every step
pub fn greedy_steps(coverage: &CoverageMap) -> Vec<GreedyStep> {
    let candidates = coverage.candidate_cells();
    let mut uncovered = vec![true; coverage.num_cities()];
    let mut remaining = coverage.num_cities();
    let mut steps = Vec::new();

    while remaining > 0 {
        // Counting reads `uncovered` only; it is updated after the arg-max.
        let counts: Vec<usize> = candidates
            .par_iter()
            .map(|&cell| {
                coverage
                    .covered_by(cell)
                    .iter()
                    .filter(|&&i| uncovered[i])
                    .count()
            })
            .collect();

        let mut best = 0;
        let mut best_count = 0;
        for (i, &count) in counts.iter().enumerate() {
            if count > best_count {
                best = i;
                best_count = count;
            }
        }
        // Each uncovered city's own cell is a candidate that covers it.
        debug_assert!(best_count > 0, "no candidate covers the {} uncovered cities", remaining);

        let tower = candidates[best];
        for &i in coverage.covered_by(tower) {
            uncovered[i] = false;
        }
        remaining -= best_count;
        log::trace!(
            "greedy picked {} covering {} ({} left)",
            tower,
            best_count,
            remaining
        );
        steps.push(GreedyStep {
            tower,
            newly_covered: best_count,
            remaining,
        });
    }

    log::debug!("greedy placed {} towers", steps.len());
    steps
}
