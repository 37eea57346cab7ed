// Randomized instance reduction: drops cities that sit close to a jittered
// copy of another city. Towers placed for the reduced list are not
// guaranteed to cover the dropped cities.

use std::collections::HashSet;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{Instance, Point, SERVICE_RADIUS};
use crate::geometry::within_radius;

/// Largest per-axis jitter applied to each city
pub const JITTER: i32 = 2;

/// Reduced city list for `instance`, driven entirely by `rng`.
///
/// Every city is jittered by up to [`JITTER`] per axis and clamped to the
/// grid. Walking the jittered points in shuffled order, each one that is still
/// among the kept cities removes the kept cities that are also jittered points
/// within service radius of it (but not on it).
pub fn thin_cities<R: Rng>(instance: &Instance, rng: &mut R) -> Vec<Point> {
    let max = instance.grid_side_length() - 1;
    let mut jittered: Vec<Point> = instance
        .cities()
        .iter()
        .map(|c| {
            let dx = rng.random_range(-JITTER..=JITTER);
            let dy = rng.random_range(-JITTER..=JITTER);
            Point::new((c.x + dx).clamp(0, max), (c.y + dy).clamp(0, max))
        })
        .collect();

    let mut kept = instance.cities().to_vec();
    jittered.shuffle(rng);
    kept.shuffle(rng);

    let jittered_set: HashSet<Point> = jittered.iter().copied().collect();
    for &origin in &jittered {
        if !kept.contains(&origin) {
            continue;
        }
        kept.retain(|&other| {
            other == origin
                || !jittered_set.contains(&other)
                || !within_radius(origin, other, SERVICE_RADIUS)
        });
    }

    log::info!(
        "thinned {} cities down to {}",
        instance.cities().len(),
        kept.len()
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn clustered() -> Instance {
        let cities = (0..6)
            .flat_map(|x| (0..6).map(move |y| Point::new(x * 2, y * 2)))
            .collect::<Vec<_>>();
        Instance::new(15, 3, cities).unwrap()
    }

    #[test]
    fn test_same_seed_same_result() {
        let instance = clustered();
        let a = thin_cities(&instance, &mut StdRng::seed_from_u64(7));
        let b = thin_cities(&instance, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_result_is_subset_and_reduces_clusters() {
        let instance = clustered();
        let thinned = thin_cities(&instance, &mut StdRng::seed_from_u64(42));

        assert!(!thinned.is_empty());
        assert!(thinned.iter().all(|c| instance.cities().contains(c)));
        let unique: HashSet<Point> = thinned.iter().copied().collect();
        assert_eq!(unique.len(), thinned.len());
        assert!(thinned.len() <= instance.cities().len());
    }

    #[test]
    fn test_isolated_city_survives() {
        let instance = Instance::new(30, 3, [Point::new(0, 0), Point::new(29, 29)]).unwrap();
        let mut thinned = thin_cities(&instance, &mut StdRng::seed_from_u64(1));
        thinned.sort();
        assert_eq!(thinned, vec![Point::new(0, 0), Point::new(29, 29)]);
    }
}
