use crate::core::chemistry::tables::vdw_radius;
use crate::core::models::atom::Atom;
use crate::core::utils::geometry::BoundingBox;
use crate::engine::config::{OccupancyMode, PhysicalConfig};
use crate::engine::error::EngineError;
use crate::engine::grid::GridLattice;
use crate::engine::progress::{Progress, ProgressReporter};
use nalgebra::Point3;
use tracing::debug;

/// Physical occupancy of one lattice cell.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CellOccupancy {
    /// Occupied voxels whose centre lies in this cell. In sum mode a voxel counts once per
    /// overlapping atom.
    pub voxels: usize,
    /// Occupied volume in cubic Angstroms.
    pub volume: f64,
    /// Occupied volume over cell volume. Not clamped, so sum mode can exceed 1.
    pub fraction: f64,
}

/// Van der Waals occupancy for every cell of a lattice.
#[derive(Debug, Clone, PartialEq)]
pub struct OccupancyMap {
    pub mode: OccupancyMode,
    pub voxel_size: f64,
    /// Voxels along x, y and z covering the lattice bounds.
    pub voxel_counts: [usize; 3],
    cells: Vec<CellOccupancy>,
    counts: [usize; 3],
}

impl OccupancyMap {
    /// Occupancy of cell `(i, j, k)`, indexed like the lattice it was computed for.
    pub fn get(&self, i: usize, j: usize, k: usize) -> Option<&CellOccupancy> {
        let [nx, ny, nz] = self.counts;
        if i >= nx || j >= ny || k >= nz {
            return None;
        }
        self.cells.get((i * ny + j) * nz + k)
    }

    /// Occupied volume summed over all cells, in cubic Angstroms.
    pub fn total_volume(&self) -> f64 {
        self.cells.iter().map(|c| c.volume).sum()
    }

    pub fn total_voxels(&self) -> usize {
        self.cells.iter().map(|c| c.voxels).sum()
    }
}

/// Largest van der Waals radius among `atoms`, or 0 when there are none.
pub fn max_vdw_radius<'a, I>(atoms: I) -> f64
where
    I: IntoIterator<Item = &'a Atom>,
{
    atoms
        .into_iter()
        .map(|a| vdw_radius(&a.element()))
        .fold(0.0, f64::max)
}

/// Bounds for a physical-mode lattice: `bounds` grown by the largest radius present plus
/// `config.padding` (a negative total leaves the box as is), or `bounds` itself when
/// expansion is disabled.
pub fn physical_bounds<'a, I>(bounds: &BoundingBox, atoms: I, config: &PhysicalConfig) -> BoundingBox
where
    I: IntoIterator<Item = &'a Atom>,
{
    if !config.expand_bounds {
        return *bounds;
    }
    let pad = (max_vdw_radius(atoms) + config.padding).max(0.0);
    bounds.expanded(pad)
}

/// Upper bound on the voxel lattice size; finer pitches over the same box are rejected.
pub const MAX_VOXELS: usize = 100_000_000;

fn voxel_count(span: f64, voxel: f64) -> usize {
    ((span / voxel).ceil() as usize).max(1)
}

fn voxel_range(center: f64, radius: f64, origin: f64, voxel: f64, n: usize) -> Option<(usize, usize)> {
    let lo = ((center - radius - origin) / voxel).floor();
    let hi = ((center + radius - origin) / voxel).floor();
    if hi < 0.0 || lo > (n - 1) as f64 {
        return None;
    }
    Some((lo.max(0.0) as usize, (hi as usize).min(n - 1)))
}

/// Counts voxels of pitch `config.voxel_size` whose centre lies inside an atom's van der
/// Waals sphere, and assigns each voxel to the lattice cell containing its centre.
///
/// The voxel grid starts at the lattice's lower corner and covers its full extent.
/// Reports one task increment per atom.
pub fn compute_occupancy(
    atoms: &[&Atom],
    lattice: &GridLattice,
    config: &PhysicalConfig,
    reporter: &ProgressReporter,
) -> Result<OccupancyMap, EngineError> {
    let voxel = config.voxel_size;
    if !(voxel.is_finite() && voxel > 0.0) {
        return Err(EngineError::InvalidParameter {
            name: "voxel_size",
            reason: format!("must be a positive number (got {})", voxel),
        });
    }

    let bounds = lattice.bounds();
    let origin = bounds.min;
    let span = bounds.span();
    let [nxv, nyv, nzv] = [
        voxel_count(span.x, voxel),
        voxel_count(span.y, voxel),
        voxel_count(span.z, voxel),
    ];
    let total = nxv
        .checked_mul(nyv)
        .and_then(|n| n.checked_mul(nzv))
        .filter(|&n| n <= MAX_VOXELS)
        .ok_or_else(|| EngineError::InvalidParameter {
            name: "voxel_size",
            reason: format!(
                "{} gives a {} x {} x {} voxel lattice, more than the {} voxel limit",
                voxel, nxv, nyv, nzv, MAX_VOXELS
            ),
        })?;
    debug!(nxv, nyv, nzv, voxel, mode = %config.mode, "Voxel lattice prepared.");

    let mut counts = vec![0usize; lattice.len()];
    let mut seen = match config.mode {
        OccupancyMode::Union => vec![false; total],
        OccupancyMode::Sum => Vec::new(),
    };

    reporter.report(Progress::TaskStart {
        total_steps: atoms.len() as u64,
    });
    for atom in atoms {
        let r = vdw_radius(&atom.element());
        let r2 = r * r;
        let p = atom.position;

        let ranges = (
            voxel_range(p.x, r, origin.x, voxel, nxv),
            voxel_range(p.y, r, origin.y, voxel, nyv),
            voxel_range(p.z, r, origin.z, voxel, nzv),
        );
        let (Some((ix0, ix1)), Some((iy0, iy1)), Some((iz0, iz1))) = ranges else {
            reporter.report(Progress::TaskIncrement);
            continue;
        };

        for ix in ix0..=ix1 {
            let cx = origin.x + (ix as f64 + 0.5) * voxel;
            let dx2 = (cx - p.x).powi(2);
            if dx2 > r2 {
                continue;
            }
            for iy in iy0..=iy1 {
                let cy = origin.y + (iy as f64 + 0.5) * voxel;
                let dxy2 = dx2 + (cy - p.y).powi(2);
                if dxy2 > r2 {
                    continue;
                }
                for iz in iz0..=iz1 {
                    let cz = origin.z + (iz as f64 + 0.5) * voxel;
                    if dxy2 + (cz - p.z).powi(2) > r2 {
                        continue;
                    }
                    if config.mode == OccupancyMode::Union {
                        let lin = ix + nxv * (iy + nyv * iz);
                        if seen[lin] {
                            continue;
                        }
                        seen[lin] = true;
                    }
                    let (i, j, k) = lattice.clamped_cell_index_of(&Point3::new(cx, cy, cz));
                    counts[lattice.linear_index(i, j, k)] += 1;
                }
            }
        }
        reporter.report(Progress::TaskIncrement);
    }
    reporter.report(Progress::TaskFinish);

    let voxel_volume = voxel.powi(3);
    let cell_volume = lattice.cell_volume();
    let cells = counts
        .into_iter()
        .map(|voxels| {
            let volume = voxels as f64 * voxel_volume;
            CellOccupancy {
                voxels,
                volume,
                fraction: if cell_volume > 0.0 {
                    volume / cell_volume
                } else {
                    0.0
                },
            }
        })
        .collect();

    Ok(OccupancyMap {
        mode: config.mode,
        voxel_size: voxel,
        voxel_counts: [nxv, nyv, nzv],
        cells,
        counts: lattice.counts(),
    })
}
