//! Flat CSV rows for analysis results.
//!
//! Each engine result type knows how to turn itself into one of these rows; this module
//! only owns the row layouts and the writer.

use serde::Serialize;
use std::io::Write;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error while flushing report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactRow {
    pub atom_a_id: i64,
    pub atom_a_name: String,
    pub residue_a: String,
    pub atom_b_id: i64,
    pub atom_b_name: String,
    pub residue_b: String,
    pub distance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridStatsRow {
    pub i: usize,
    pub j: usize,
    pub k: usize,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
    pub atom_count: usize,
    pub residue_count: usize,
    pub chain_count: usize,
    pub cell_volume: f64,
    pub density: f64,
    pub bfactor_mean: f64,
    pub bfactor_std: f64,
    pub protein: usize,
    pub ligand: usize,
    pub water: usize,
    pub ion: usize,
    /// Distinct non-blank alternate location indicators among the cell's atoms.
    pub altloc_count: usize,
    pub model_count: usize,
    pub occupied_voxels: Option<usize>,
    pub occupied_volume: Option<f64>,
    pub occupancy_fraction: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HopRow {
    pub step: usize,
    pub from_id: i64,
    pub from_spec: String,
    pub to_id: i64,
    pub to_spec: String,
    pub distance: f64,
    pub factor: f64,
    pub cost: f64,
    pub cumulative_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResidueSummaryRow {
    pub chain_id: String,
    pub sequence_number: i32,
    pub insertion_code: String,
    pub residue_name: String,
    pub display_name: String,
    pub atom_count: usize,
    pub centroid_x: f64,
    pub centroid_y: f64,
    pub centroid_z: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
    pub bfactor_mean: f64,
    pub bfactor_std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainSummaryRow {
    pub chain_id: String,
    pub atom_count: usize,
    pub residue_count: usize,
    pub centroid_x: f64,
    pub centroid_y: f64,
    pub centroid_z: f64,
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub z_min: f64,
    pub z_max: f64,
    pub bfactor_mean: f64,
    pub bfactor_std: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompositionRow {
    pub element: String,
    pub count: usize,
}

/// Writes `rows` as CSV with a header derived from the row type's field names.
pub fn write_rows<T, W, I>(rows: I, writer: W) -> Result<usize, ReportError>
where
    T: Serialize,
    W: Write,
    I: IntoIterator<Item = T>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0;
    for row in rows {
        csv_writer.serialize(row)?;
        written += 1;
    }
    csv_writer.flush()?;
    Ok(written)
}
