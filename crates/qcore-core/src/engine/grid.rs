use crate::core::models::atom::Atom;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::{Axis, BoundingBox, linspace_edges};
use crate::engine::error::EngineError;
use crate::engine::query::{distinct_sequence_numbers, expand_complete_residues};
use nalgebra::Point3;

/// One cell of a [`GridLattice`].
///
/// A coordinate belongs to the cell when `min <= v < max` on every axis, except that the
/// upper bound is inclusive for the last cell along an axis.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub bounds: BoundingBox,
    /// Whether this is the last cell along x, y and z.
    pub last: [bool; 3],
}

impl GridCell {
    pub fn index(&self) -> (usize, usize, usize) {
        (self.i, self.j, self.k)
    }

    pub fn contains(&self, p: &Point3<f64>) -> bool {
        (0..3).all(|axis| {
            let (lo, hi, v) = (self.bounds.min[axis], self.bounds.max[axis], p[axis]);
            lo <= v && (v < hi || (self.last[axis] && v <= hi))
        })
    }

    pub fn volume(&self) -> f64 {
        self.bounds.volume()
    }
}

/// A regular `nx x ny x nz` subdivision of a bounding box.
///
/// Edges are computed once per axis and shared by every cell, so neighbouring cells
/// agree exactly on their common boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct GridLattice {
    bounds: BoundingBox,
    counts: [usize; 3],
    edges: [Vec<f64>; 3],
}

fn slot(edges: &[f64], v: f64) -> Option<usize> {
    let n = edges.len() - 1;
    if !(edges[0] <= v && v <= edges[n]) {
        return None;
    }
    Some(edges[1..n].partition_point(|&e| e <= v))
}

fn clamped_slot(edges: &[f64], v: f64) -> usize {
    let n = edges.len() - 1;
    if v.is_nan() || v <= edges[0] {
        return 0;
    }
    edges[1..n].partition_point(|&e| e <= v)
}

impl GridLattice {
    pub fn new(bounds: BoundingBox, counts: [usize; 3]) -> Result<Self, EngineError> {
        let [nx, ny, nz] = counts;
        if nx == 0 || ny == 0 || nz == 0 {
            return Err(EngineError::InvalidGridCounts { nx, ny, nz });
        }
        let edges = Axis::ALL.map(|axis| {
            let (lo, hi) = bounds.axis_range(axis);
            linspace_edges(lo, hi, counts[axis.index()])
        });
        Ok(Self {
            bounds,
            counts,
            edges,
        })
    }

    /// The box the lattice subdivides.
    pub fn bounds(&self) -> &BoundingBox {
        &self.bounds
    }

    /// Cells along x, y and z.
    pub fn counts(&self) -> [usize; 3] {
        self.counts
    }

    /// The `n + 1` cell boundaries along `axis`, ascending. The first and last equal the
    /// lattice bounds exactly.
    pub fn edges(&self, axis: Axis) -> &[f64] {
        &self.edges[axis.index()]
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.counts.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Row-major position of `(i, j, k)` with `k` varying fastest.
    pub fn linear_index(&self, i: usize, j: usize, k: usize) -> usize {
        (i * self.counts[1] + j) * self.counts[2] + k
    }

    /// The cell at `(i, j, k)`, or `None` when any index is out of range.
    pub fn cell(&self, i: usize, j: usize, k: usize) -> Option<GridCell> {
        let [nx, ny, nz] = self.counts;
        if i >= nx || j >= ny || k >= nz {
            return None;
        }
        let [ex, ey, ez] = &self.edges;
        Some(GridCell {
            i,
            j,
            k,
            bounds: BoundingBox {
                min: Point3::new(ex[i], ey[j], ez[k]),
                max: Point3::new(ex[i + 1], ey[j + 1], ez[k + 1]),
            },
            last: [i == nx - 1, j == ny - 1, k == nz - 1],
        })
    }

    /// All cells ordered by `i`, then `j`, then `k`.
    pub fn cells(&self) -> Vec<GridCell> {
        let [nx, ny, nz] = self.counts;
        let mut cells = Vec::with_capacity(self.len());
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    if let Some(cell) = self.cell(i, j, k) {
                        cells.push(cell);
                    }
                }
            }
        }
        cells
    }

    /// The cell holding `p`, or `None` when `p` lies outside the lattice bounds.
    pub fn cell_index_of(&self, p: &Point3<f64>) -> Option<(usize, usize, usize)> {
        Some((
            slot(&self.edges[0], p.x)?,
            slot(&self.edges[1], p.y)?,
            slot(&self.edges[2], p.z)?,
        ))
    }

    /// Like [`cell_index_of`](Self::cell_index_of), snapping outside points to the nearest cell.
    pub fn clamped_cell_index_of(&self, p: &Point3<f64>) -> (usize, usize, usize) {
        (
            clamped_slot(&self.edges[0], p.x),
            clamped_slot(&self.edges[1], p.y),
            clamped_slot(&self.edges[2], p.z),
        )
    }

    /// Volume of one cell; every cell of a lattice has the same size.
    pub fn cell_volume(&self) -> f64 {
        let span = self.bounds.span();
        (0..3)
            .map(|axis| span[axis] / self.counts[axis] as f64)
            .product::<f64>()
            .max(0.0)
    }
}

/// Atoms assigned to one cell by [`partition`].
#[derive(Debug, Clone, PartialEq)]
pub struct CellMembers<'a> {
    pub cell: GridCell,
    /// In structure order.
    pub atoms: Vec<&'a Atom>,
    /// Sorted and distinct.
    pub sequence_numbers: Vec<i32>,
}

/// Assigns every atom of `structure` inside the lattice to exactly one cell.
///
/// Returns one entry per cell, in [`GridLattice::cells`] order. With `complete_residues`
/// each cell's atoms are widened to whole residues, so a residue straddling a boundary
/// appears in every cell it touches.
pub fn partition<'a>(
    structure: &'a Structure,
    lattice: &GridLattice,
    complete_residues: bool,
) -> Vec<CellMembers<'a>> {
    let mut buckets: Vec<Vec<&'a Atom>> = vec![Vec::new(); lattice.len()];
    for atom in structure.atoms() {
        if let Some((i, j, k)) = lattice.cell_index_of(&atom.position) {
            buckets[lattice.linear_index(i, j, k)].push(atom);
        }
    }

    lattice
        .cells()
        .into_iter()
        .zip(buckets)
        .map(|(cell, matched)| {
            let atoms = if complete_residues && !matched.is_empty() {
                expand_complete_residues(structure, &matched)
            } else {
                matched
            };
            let sequence_numbers = distinct_sequence_numbers(&atoms);
            CellMembers {
                cell,
                atoms,
                sequence_numbers,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_bounds(max: f64) -> BoundingBox {
        BoundingBox::from_corners(Point3::origin(), Point3::new(max, max, max))
    }

    fn atom_at(id: i64, seq: i32, x: f64, y: f64, z: f64) -> Atom {
        Atom::new(id, "CA", "ALA", "A", seq, Point3::new(x, y, z))
    }

    #[test]
    fn new_rejects_zero_counts() {
        assert_eq!(
            GridLattice::new(unit_bounds(1.0), [2, 0, 1]),
            Err(EngineError::InvalidGridCounts {
                nx: 2,
                ny: 0,
                nz: 1
            })
        );
    }

    #[test]
    fn upper_edge_goes_to_the_last_cell() {
        let lattice = GridLattice::new(unit_bounds(10.0), [2, 1, 1]).unwrap();
        assert_eq!(lattice.edges(Axis::X), &[0.0, 5.0, 10.0]);
        assert_eq!(lattice.cell_index_of(&Point3::new(5.0, 0.0, 0.0)), Some((1, 0, 0)));
        assert_eq!(lattice.cell_index_of(&Point3::new(10.0, 10.0, 10.0)), Some((1, 0, 0)));
        assert_eq!(lattice.cell_index_of(&Point3::new(4.999, 0.0, 0.0)), Some((0, 0, 0)));
        assert_eq!(lattice.cell_index_of(&Point3::new(10.5, 0.0, 0.0)), None);
    }

    #[test]
    fn cell_containment_agrees_with_index_lookup() {
        let lattice = GridLattice::new(unit_bounds(3.0), [3, 2, 4]).unwrap();
        let samples = [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.5, 0.75),
            Point3::new(2.0, 3.0, 3.0),
            Point3::new(2.999, 1.4999, 2.25),
        ];
        for p in samples {
            let owners: Vec<_> = lattice
                .cells()
                .iter()
                .filter(|c| c.contains(&p))
                .map(GridCell::index)
                .collect();
            assert_eq!(owners, vec![lattice.cell_index_of(&p).unwrap()]);
        }
    }

    #[test]
    fn clamped_lookup_snaps_outside_points() {
        let lattice = GridLattice::new(unit_bounds(4.0), [2, 2, 2]).unwrap();
        assert_eq!(lattice.clamped_cell_index_of(&Point3::new(-1.0, 9.0, 2.0)), (0, 1, 1));
    }

    #[test]
    fn degenerate_axis_puts_everything_in_the_last_cell() {
        let bounds = BoundingBox::from_corners(Point3::new(0.0, 2.0, 0.0), Point3::new(4.0, 2.0, 4.0));
        let lattice = GridLattice::new(bounds, [1, 3, 1]).unwrap();
        assert_eq!(lattice.cell_index_of(&Point3::new(1.0, 2.0, 1.0)), Some((0, 2, 0)));
        assert_eq!(lattice.cell_volume(), 0.0);
    }

    #[test]
    fn cells_are_ordered_and_linear_index_matches() {
        let lattice = GridLattice::new(unit_bounds(1.0), [2, 3, 4]).unwrap();
        let cells = lattice.cells();
        assert_eq!(cells.len(), 24);
        for (pos, cell) in cells.iter().enumerate() {
            assert_eq!(lattice.linear_index(cell.i, cell.j, cell.k), pos);
        }
        assert_eq!(cells[23].last, [true, true, true]);
        assert!((lattice.cell_volume() - 1.0 / 24.0).abs() < 1e-12);
    }

    #[test]
    fn partition_is_a_complete_non_overlapping_cover() {
        let atoms: Vec<Atom> = (0..30)
            .map(|n| {
                let f = n as f64;
                atom_at(n, n as i32, (f * 0.37) % 5.0, (f * 0.71) % 5.0, (f * 1.13) % 5.0)
            })
            .collect();
        let structure = Structure::new(atoms).unwrap();
        let bounds = structure.bounds().unwrap();
        for counts in [[1, 1, 1], [2, 3, 1], [4, 4, 4], [5, 1, 2]] {
            let lattice = GridLattice::new(bounds, counts).unwrap();
            let members = partition(&structure, &lattice, false);
            let mut seen: Vec<i64> = members
                .iter()
                .flat_map(|m| m.atoms.iter().map(|a| a.id))
                .collect();
            seen.sort_unstable();
            assert_eq!(seen, (0..30).collect::<Vec<_>>());
        }
    }

    #[test]
    fn partition_expands_to_complete_residues() {
        let structure = Structure::new(vec![
            atom_at(1, 1, 0.0, 0.0, 0.0),
            atom_at(2, 1, 3.0, 0.0, 0.0),
            atom_at(3, 2, 4.0, 0.0, 0.0),
        ])
        .unwrap();
        let lattice = GridLattice::new(structure.bounds().unwrap(), [2, 1, 1]).unwrap();

        let plain = partition(&structure, &lattice, false);
        assert_eq!(plain[0].atoms.len(), 1);
        assert_eq!(plain[1].sequence_numbers, vec![1, 2]);

        let expanded = partition(&structure, &lattice, true);
        let first: Vec<i64> = expanded[0].atoms.iter().map(|a| a.id).collect();
        assert_eq!(first, vec![1, 2]);
        assert_eq!(expanded[0].sequence_numbers, vec![1]);
    }
}
