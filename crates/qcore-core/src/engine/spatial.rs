use crate::core::models::atom::Atom;
use kiddo::{ImmutableKdTree, SquaredEuclidean};
use nalgebra::Point3;
use std::collections::HashMap;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Relative slack applied to kd-tree radii; every hit is re-checked with the exact distance.
const RADIUS_SLACK: f64 = 1e-9;

/// Radius lookups over a fixed set of points, answered with point indices.
pub trait NeighborSearch {
    /// Indices of all points whose distance to `center` is at most `radius`, in ascending order.
    fn within(&self, center: &Point3<f64>, radius: f64) -> Vec<usize>;

    fn position(&self, index: usize) -> Option<&Point3<f64>>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A kd-tree over atom coordinates, indexed by position in the source slice.
///
/// The tree is built once over the distinct coordinates of the point set. Points that share
/// an exact coordinate are stored as one site, so stacked or coplanar atoms never force a
/// degenerate split. `tree` is `None` only for an empty point set.
pub struct AtomKdTree {
    tree: Option<ImmutableKdTree<f64, 3>>,
    /// Point indices at each distinct coordinate, in tree item order.
    sites: Vec<Vec<usize>>,
    positions: Vec<Point3<f64>>,
}

impl AtomKdTree {
    pub fn build(atoms: &[Atom]) -> Self {
        Self::from_positions(atoms.iter().map(|a| a.position).collect())
    }

    pub fn from_positions(positions: Vec<Point3<f64>>) -> Self {
        let mut site_of: HashMap<[u64; 3], usize> = HashMap::with_capacity(positions.len());
        let mut coords: Vec<[f64; 3]> = Vec::with_capacity(positions.len());
        let mut sites: Vec<Vec<usize>> = Vec::with_capacity(positions.len());

        for (idx, p) in positions.iter().enumerate() {
            // Adding zero folds -0.0 into 0.0 so both land on one site.
            let point = [p.x + 0.0, p.y + 0.0, p.z + 0.0];
            let key = point.map(f64::to_bits);
            let site = *site_of.entry(key).or_insert_with(|| {
                coords.push(point);
                sites.push(Vec::new());
                sites.len() - 1
            });
            sites[site].push(idx);
        }

        let tree = (!coords.is_empty()).then(|| ImmutableKdTree::new_from_slice(&coords));
        Self {
            tree,
            sites,
            positions,
        }
    }

    fn candidates(&self, center: &Point3<f64>, radius: f64) -> impl Iterator<Item = usize> + '_ {
        let padded = radius * (1.0 + RADIUS_SLACK) + RADIUS_SLACK;
        let query = [center.x, center.y, center.z];
        self.tree
            .iter()
            .flat_map(move |tree| {
                tree.within_unsorted::<SquaredEuclidean>(&query, padded * padded)
            })
            .flat_map(|nn| self.sites[nn.item as usize].iter().copied())
    }

    /// Every unordered index pair `(i, j)` with `i < j` and separation at most `radius`,
    /// tagged with the exact distance and sorted by `(i, j)`.
    pub fn pairs_within(&self, radius: f64) -> Vec<(usize, usize, f64)> {
        if radius.is_nan() || radius <= 0.0 || self.positions.is_empty() {
            return Vec::new();
        }

        let neighbours_of = |i: usize| -> Vec<(usize, usize, f64)> {
            let origin = &self.positions[i];
            let mut found: Vec<(usize, usize, f64)> = self
                .candidates(origin, radius)
                .filter(|&j| j > i)
                .filter_map(|j| {
                    let d = nalgebra::distance(origin, &self.positions[j]);
                    (d <= radius).then_some((i, j, d))
                })
                .collect();
            found.sort_unstable_by_key(|&(_, j, _)| j);
            found
        };

        #[cfg(not(feature = "parallel"))]
        let pairs: Vec<_> = (0..self.positions.len()).flat_map(neighbours_of).collect();

        #[cfg(feature = "parallel")]
        let pairs: Vec<_> = (0..self.positions.len())
            .into_par_iter()
            .flat_map_iter(neighbours_of)
            .collect();

        pairs
    }
}

impl NeighborSearch for AtomKdTree {
    fn within(&self, center: &Point3<f64>, radius: f64) -> Vec<usize> {
        if radius.is_nan() || radius < 0.0 || self.positions.is_empty() {
            return Vec::new();
        }
        let mut hits: Vec<usize> = self
            .candidates(center, radius)
            .filter(|&j| nalgebra::distance(center, &self.positions[j]) <= radius)
            .collect();
        hits.sort_unstable();
        hits
    }

    fn position(&self, index: usize) -> Option<&Point3<f64>> {
        self.positions.get(index)
    }

    fn len(&self) -> usize {
        self.positions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_of_points(n: usize, spacing: f64) -> AtomKdTree {
        AtomKdTree::from_positions(
            (0..n)
                .map(|i| Point3::new(i as f64 * spacing, (i % 3) as f64 * 0.1, (i % 5) as f64 * 0.01))
                .collect(),
        )
    }

    fn brute_force_pairs(tree: &AtomKdTree, radius: f64) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..tree.len() {
            for j in (i + 1)..tree.len() {
                if nalgebra::distance(&tree.positions[i], &tree.positions[j]) <= radius {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    #[test]
    fn within_includes_points_exactly_on_the_radius() {
        let tree = AtomKdTree::from_positions(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 0.0),
            Point3::new(1.5000001, 0.0, 0.0),
        ]);
        assert_eq!(tree.within(&Point3::origin(), 1.5), vec![0, 1]);
    }

    #[test]
    fn within_returns_nothing_for_negative_radius_or_empty_index() {
        let tree = line_of_points(4, 1.0);
        assert!(tree.within(&Point3::origin(), -1.0).is_empty());
        let empty = AtomKdTree::from_positions(Vec::new());
        assert!(empty.is_empty());
        assert!(empty.within(&Point3::origin(), 10.0).is_empty());
    }

    #[test]
    fn pairs_within_matches_brute_force() {
        let tree = line_of_points(40, 0.7);
        let pairs: Vec<_> = tree
            .pairs_within(2.0)
            .into_iter()
            .map(|(i, j, _)| (i, j))
            .collect();
        assert_eq!(pairs, brute_force_pairs(&tree, 2.0));
    }

    #[test]
    fn pairs_within_is_empty_for_non_positive_radius() {
        let tree = line_of_points(5, 1.0);
        assert!(tree.pairs_within(0.0).is_empty());
        assert!(tree.pairs_within(-3.0).is_empty());
    }

    #[test]
    fn many_points_sharing_one_axis_value_are_indexed() {
        let plane: Vec<Point3<f64>> = (0..200)
            .map(|i| Point3::new(0.0, (i % 20) as f64 * 1.5, (i / 20) as f64 * 1.5))
            .collect();
        let tree = AtomKdTree::from_positions(plane);
        let pairs: Vec<_> = tree
            .pairs_within(1.6)
            .into_iter()
            .map(|(i, j, _)| (i, j))
            .collect();
        assert_eq!(pairs, brute_force_pairs(&tree, 1.6));
        assert_eq!(pairs.len(), 19 * 10 + 20 * 9);
    }

    #[test]
    fn exact_duplicate_points_are_all_returned() {
        let tree = AtomKdTree::from_positions(vec![Point3::new(1.0, 2.0, 3.0); 100]);
        assert_eq!(tree.len(), 100);
        assert_eq!(
            tree.within(&Point3::new(1.0, 2.0, 3.0), 0.1),
            (0..100).collect::<Vec<_>>()
        );
        assert_eq!(tree.pairs_within(0.5).len(), 100 * 99 / 2);
    }

    #[test]
    fn stacked_points_mix_with_distinct_neighbours() {
        let mut points = vec![Point3::new(0.0, 0.0, 0.0); 50];
        points.push(Point3::new(0.0, 0.0, 1.0));
        points[7] = Point3::new(-0.0, 0.0, -0.0);
        points.extend(vec![Point3::new(5.0, 0.0, 0.0); 50]);
        let tree = AtomKdTree::from_positions(points);
        assert_eq!(tree.within(&Point3::new(0.0, 0.0, 0.5), 0.5), (0..51).collect::<Vec<_>>());
        assert_eq!(tree.within(&Point3::new(5.0, 0.0, 0.0), 1.0), (51..101).collect::<Vec<_>>());
        assert_eq!(tree.pairs_within(1.0).len(), 2 * (50 * 49 / 2) + 50);
    }

    #[test]
    fn pairs_carry_exact_distances() {
        let tree = AtomKdTree::from_positions(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(3.0, 4.0, 0.0),
        ]);
        assert_eq!(tree.pairs_within(5.0), vec![(0, 1, 5.0)]);
        assert!(tree.pairs_within(4.999).is_empty());
    }
}
