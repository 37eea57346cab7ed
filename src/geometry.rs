// Lattice geometry: Euclidean coverage shapes, Chebyshev windows and grid
// clipping.
//
// Offset sets are produced unclipped; the caller translates and clips them
// through `Grid`.

use crate::domain::Point;

/// Relative lattice displacement (dx, dy)
pub type Offset = (i32, i32);

/// All offsets with `dx² + dy² <= radius²`, sorted by (dx, dy).
///
/// For radius 3 this is the full 5×5 block plus the four axis points at
/// distance exactly 3; (3, 1) lies at √10 and is excluded.
pub fn coverage_offsets(radius: i32) -> Vec<Offset> {
    let r = radius.max(0);
    let r2 = i64::from(r) * i64::from(r);
    let mut offsets = Vec::new();
    for dx in -r..=r {
        for dy in -r..=r {
            if i64::from(dx) * i64::from(dx) + i64::from(dy) * i64::from(dy) <= r2 {
                offsets.push((dx, dy));
            }
        }
    }
    offsets
}

/// All offsets with `max(|dx|, |dy|) <= half_width`, sorted by (dx, dy).
pub fn chebyshev_offsets(half_width: i32) -> Vec<Offset> {
    let h = half_width.max(0);
    (-h..=h)
        .flat_map(|dx| (-h..=h).map(move |dy| (dx, dy)))
        .collect()
}

/// Whether `a` and `b` are within Euclidean distance `radius` of each other
pub fn within_radius(a: Point, b: Point, radius: i32) -> bool {
    a.squared_distance(b) <= i64::from(radius) * i64::from(radius)
}

/// Square grid `[0, side)²` with row-major cell indexing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    side: i32,
}

impl Grid {
    pub fn new(side: i32) -> Self {
        Self { side: side.max(0) }
    }

    pub fn side(&self) -> i32 {
        self.side
    }

    pub fn num_cells(&self) -> usize {
        (self.side as usize) * (self.side as usize)
    }

    pub fn contains(&self, p: Point) -> bool {
        (0..self.side).contains(&p.x) && (0..self.side).contains(&p.y)
    }

    /// Row-major index of an in-bounds point
    pub fn index(&self, p: Point) -> usize {
        debug_assert!(self.contains(p), "{} outside grid of side {}", p, self.side);
        (p.x as usize) * (self.side as usize) + p.y as usize
    }

    pub fn point(&self, index: usize) -> Point {
        let side = self.side as usize;
        Point::new((index / side) as i32, (index % side) as i32)
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Point> + '_ {
        (0..self.side).flat_map(move |x| (0..self.side).map(move |y| Point::new(x, y)))
    }

    /// `offsets` translated to `center`, dropping points outside the grid
    pub fn translate<'a>(
        &'a self,
        center: Point,
        offsets: &'a [Offset],
    ) -> impl Iterator<Item = Point> + 'a {
        offsets
            .iter()
            .map(move |&(dx, dy)| center.offset(dx, dy))
            .filter(move |&p| self.contains(p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_radius_three_shape() {
        let offsets = coverage_offsets(3);
        let set: HashSet<Offset> = offsets.iter().copied().collect();
        assert_eq!(offsets.len(), 29);
        assert_eq!(set.len(), offsets.len(), "no duplicates");

        for dx in -2..=2 {
            for dy in -2..=2 {
                assert!(set.contains(&(dx, dy)));
            }
        }
        for axis in [(3, 0), (-3, 0), (0, 3), (0, -3)] {
            assert!(set.contains(&axis));
        }
        for excluded in [(3, 1), (3, -1), (-3, 1), (-3, -1), (1, 3), (-1, 3), (1, -3), (-1, -3)] {
            assert!(!set.contains(&excluded), "{:?} is at sqrt(10)", excluded);
        }
    }

    #[test]
    fn test_coverage_offsets_rotation_symmetric() {
        for radius in 0..=6 {
            let set: HashSet<Offset> = coverage_offsets(radius).into_iter().collect();
            for &(dx, dy) in &set {
                assert!(set.contains(&(-dy, dx)), "radius {} not symmetric", radius);
            }
        }
    }

    #[test]
    fn test_small_radii() {
        assert_eq!(coverage_offsets(0), vec![(0, 0)]);
        assert_eq!(coverage_offsets(1).len(), 5);
        assert_eq!(coverage_offsets(2).len(), 13);
    }

    #[test]
    fn test_chebyshev_window_is_square() {
        assert_eq!(chebyshev_offsets(0), vec![(0, 0)]);
        let window = chebyshev_offsets(2);
        assert_eq!(window.len(), 25);
        assert!(window.contains(&(2, 2)));
        assert!(!coverage_offsets(2).contains(&(2, 2)));
    }

    #[test]
    fn test_grid_index_roundtrip_and_clipping() {
        let grid = Grid::new(4);
        assert_eq!(grid.num_cells(), 16);
        assert_eq!(grid.index(Point::new(1, 2)), 6);
        assert_eq!(grid.point(6), Point::new(1, 2));
        assert_eq!(grid.cells().count(), 16);

        let offsets = coverage_offsets(3);
        let clipped: Vec<Point> = grid.translate(Point::new(0, 0), &offsets).collect();
        assert!(clipped.iter().all(|&p| grid.contains(p)));
        // Quadrant of the 5x5 core (9) plus the two inward axis spikes.
        assert_eq!(clipped.len(), 11);
    }

    #[test]
    fn test_within_radius() {
        assert!(within_radius(Point::new(0, 0), Point::new(3, 0), 3));
        assert!(within_radius(Point::new(0, 0), Point::new(2, 2), 3));
        assert!(!within_radius(Point::new(0, 0), Point::new(3, 1), 3));
    }
}
