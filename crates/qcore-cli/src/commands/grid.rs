use super::{load_structure, write_atom_list, write_report};
use crate::cli::GridArgs;
use crate::config::builder;
use crate::config::file::FileConfig;
use crate::error::{CliError, Result};
use crate::utils::parser;
use qcore::engine::progress::ProgressReporter;
use qcore::workflows::partition;
use tracing::info;

pub fn run(args: GridArgs, file: &FileConfig, reporter: &ProgressReporter) -> Result<()> {
    let config = builder::build_grid_config(&args, file)?;
    let cell = args
        .cell
        .as_deref()
        .map(|raw| parser::parse_triplet::<usize>(raw, "cell index"))
        .transpose()
        .map_err(|e| CliError::Argument(e.to_string()))?;

    let structure = load_structure(&args.common)?;
    let analysis = partition::run(&structure, &config, reporter)?;
    let output = args.common.output.as_deref();

    match cell {
        Some([i, j, k]) => {
            let report = analysis.cell(i, j, k).ok_or_else(|| {
                let [nx, ny, nz] = analysis.lattice.counts();
                CliError::Argument(format!(
                    "Cell ({}, {}, {}) is outside the {} x {} x {} grid.",
                    i, j, k, nx, ny, nz
                ))
            })?;
            info!(
                i,
                j,
                k,
                atoms = report.atoms.len(),
                residues = ?report.sequence_numbers,
                "Cell lookup complete."
            );
            write_atom_list(report.atoms.iter().copied(), output)
        }
        None => {
            if let Some(map) = &analysis.occupancy {
                info!(
                    voxels = map.total_voxels(),
                    volume = map.total_volume(),
                    mode = %map.mode,
                    "Physical occupancy totals."
                );
            }
            write_report(analysis.stats_rows(), output)?;
            Ok(())
        }
    }
}
