use crate::core::io::report::GridStatsRow;
use crate::core::models::atom::Atom;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::BoundingBox;
use crate::engine::config::GridConfig;
use crate::engine::error::EngineError;
use crate::engine::grid::{self, GridCell, GridLattice};
use crate::engine::occupancy::{self, CellOccupancy, OccupancyMap};
use crate::engine::progress::ProgressReporter;
use crate::engine::summary::{self, CellSummary};
use tracing::{debug, info, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, PartialEq)]
pub struct CellReport<'a> {
    pub cell: GridCell,
    pub atoms: Vec<&'a Atom>,
    /// Sorted, distinct residue sequence numbers of `atoms`.
    pub sequence_numbers: Vec<i32>,
    pub summary: CellSummary,
    /// Present only when physical occupancy was computed.
    pub occupancy: Option<CellOccupancy>,
}

impl CellReport<'_> {
    pub fn stats_row(&self, cell_volume: f64) -> GridStatsRow {
        let b = &self.cell.bounds;
        let s = &self.summary;
        GridStatsRow {
            i: self.cell.i,
            j: self.cell.j,
            k: self.cell.k,
            x_min: b.min.x,
            x_max: b.max.x,
            y_min: b.min.y,
            y_max: b.max.y,
            z_min: b.min.z,
            z_max: b.max.z,
            atom_count: s.atom_count,
            residue_count: s.residue_count,
            chain_count: s.chain_count,
            cell_volume,
            density: if cell_volume > 0.0 {
                s.atom_count as f64 / cell_volume
            } else {
                0.0
            },
            bfactor_mean: s.bfactor_mean,
            bfactor_std: s.bfactor_std,
            protein: s.classes.protein,
            ligand: s.classes.ligand,
            water: s.classes.water,
            ion: s.classes.ion,
            altloc_count: s.altloc_count,
            model_count: s.model_count,
            occupied_voxels: self.occupancy.map(|o| o.voxels),
            occupied_volume: self.occupancy.map(|o| o.volume),
            occupancy_fraction: self.occupancy.map(|o| o.fraction),
        }
    }
}

/// The result of partitioning one structure. Holding on to it gives "last grid" lookups.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAnalysis<'a> {
    pub lattice: GridLattice,
    pub complete_residues: bool,
    pub occupancy: Option<OccupancyMap>,
    cells: Vec<CellReport<'a>>,
}

impl<'a> GridAnalysis<'a> {
    pub fn cell(&self, i: usize, j: usize, k: usize) -> Option<&CellReport<'a>> {
        self.lattice
            .cell(i, j, k)
            .and_then(|_| self.cells.get(self.lattice.linear_index(i, j, k)))
    }

    /// All cells ordered by `i`, then `j`, then `k`.
    pub fn cells(&self) -> &[CellReport<'a>] {
        &self.cells
    }

    pub fn occupied_cells(&self) -> impl Iterator<Item = &CellReport<'a>> {
        self.cells.iter().filter(|c| !c.atoms.is_empty())
    }

    pub fn stats_rows(&self) -> Vec<GridStatsRow> {
        let cell_volume = self.lattice.cell_volume();
        self.cells.iter().map(|c| c.stats_row(cell_volume)).collect()
    }
}

fn collect_cells<'a>(
    structure: &'a Structure,
    lattice: &GridLattice,
    complete_residues: bool,
    occupancy: Option<&OccupancyMap>,
) -> Vec<CellReport<'a>> {
    let members = grid::partition(structure, lattice, complete_residues);

    #[cfg(not(feature = "parallel"))]
    let iterator = members.into_iter();

    #[cfg(feature = "parallel")]
    let iterator = members.into_par_iter();

    iterator
        .map(|m| CellReport {
            summary: summary::summarize(&m.atoms),
            occupancy: occupancy
                .and_then(|map| map.get(m.cell.i, m.cell.j, m.cell.k))
                .copied(),
            cell: m.cell,
            atoms: m.atoms,
            sequence_numbers: m.sequence_numbers,
        })
        .collect()
}

/// Partitions `structure` into the configured lattice and summarizes every cell.
///
/// Chain filtering is the caller's job: pass a structure from
/// [`Structure::filter_by_chain`] to analyse a single chain. An empty structure yields a
/// lattice over a degenerate box with every cell empty.
#[instrument(skip_all, name = "grid_workflow")]
pub fn run<'a>(
    structure: &'a Structure,
    config: &GridConfig,
    reporter: &ProgressReporter,
) -> Result<GridAnalysis<'a>, EngineError> {
    let [nx, ny, nz] = config.counts;
    info!(
        atoms = structure.len(),
        nx,
        ny,
        nz,
        physical = config.physical.is_some(),
        "Starting grid analysis."
    );

    let tight = structure.bounds().unwrap_or_else(BoundingBox::zero);
    let bounds = match &config.physical {
        Some(physical) => occupancy::physical_bounds(&tight, structure.atoms(), physical),
        None => tight,
    };
    debug!(min = ?bounds.min, max = ?bounds.max, "Grid bounds resolved.");
    let lattice = GridLattice::new(bounds, config.counts)?;

    let occupancy = config
        .physical
        .as_ref()
        .map(|physical| {
            reporter.phase("Physical Occupancy", || {
                let all: Vec<&Atom> = structure.atoms().iter().collect();
                occupancy::compute_occupancy(&all, &lattice, physical, reporter)
            })
        })
        .transpose()?;

    let cells = reporter.phase("Partitioning", || {
        collect_cells(structure, &lattice, config.complete_residues, occupancy.as_ref())
    });

    let analysis = GridAnalysis {
        lattice,
        complete_residues: config.complete_residues,
        occupancy,
        cells,
    };
    info!(
        cells = analysis.cells.len(),
        occupied = analysis.occupied_cells().count(),
        "Grid analysis complete."
    );
    Ok(analysis)
}
