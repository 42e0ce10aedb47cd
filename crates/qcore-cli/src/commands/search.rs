use super::{load_structure, write_atom_list};
use crate::cli::{BoxArgs, RangeArgs, SearchArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use qcore::core::utils::geometry::Axis;
use qcore::engine::error::EngineError;
use qcore::engine::query;
use tracing::info;

pub fn run_search(args: SearchArgs) -> Result<()> {
    let structure = load_structure(&args.common)?;
    let matches = query::search_by_field_name(&structure, &args.field, &args.value)?;
    info!(
        field = %args.field,
        value = %args.value,
        matches = matches.len(),
        "Field search complete."
    );
    write_atom_list(matches, args.common.output.as_deref())
}

pub fn run_range(args: RangeArgs) -> Result<()> {
    let structure = load_structure(&args.common)?;
    let axis: Axis = args.axis.parse().map_err(EngineError::from)?;
    let from = query::parse_bound("from", &args.from)?;
    let to = query::parse_bound("to", &args.to)?;

    let matches = query::search_axis_range(&structure, axis, from, to)?;
    info!(%axis, from, to, matches = matches.len(), "Range search complete.");
    write_atom_list(matches, args.common.output.as_deref())
}

pub fn run_box(args: BoxArgs) -> Result<()> {
    let structure = load_structure(&args.common)?;
    let corner_a = parser::parse_point(&args.min, "box corner")
        .map_err(|e| CliError::Argument(e.to_string()))?;
    let corner_b = parser::parse_point(&args.max, "box corner")
        .map_err(|e| CliError::Argument(e.to_string()))?;

    let result = query::search_box(&structure, corner_a, corner_b, args.complete_residues);
    info!(
        atoms = result.atoms.len(),
        residues = ?result.sequence_numbers,
        complete_residues = args.complete_residues,
        "Box search complete."
    );
    write_atom_list(result.atoms, args.common.output.as_deref())
}
