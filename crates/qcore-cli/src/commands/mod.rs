pub mod contacts;
pub mod grid;
pub mod search;
pub mod summary;
pub mod tunnel;

use crate::cli::InputArgs;
use crate::error::{CliError, Result};
use qcore::core::io::atom_table;
use qcore::core::io::report;
use qcore::core::models::atom::Atom;
use qcore::core::models::structure::Structure;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info};

/// Reads the input table and applies the optional `--chain` filter.
pub(crate) fn load_structure(common: &InputArgs) -> Result<Structure> {
    let structure = atom_table::read_atoms_from_path(&common.input)?;
    info!(
        atoms = structure.len(),
        path = %common.input.display(),
        "Loaded atom table."
    );

    let Some(chain) = common.chain.as_deref() else {
        return Ok(structure);
    };
    let filtered = structure.filter_by_chain(chain);
    if filtered.is_empty() {
        return Err(CliError::Argument(format!(
            "Chain '{}' not found. Available chains: {}",
            chain.trim(),
            structure.chain_ids().join(", ")
        )));
    }
    debug!(chain, atoms = filtered.len(), "Applied chain filter.");
    Ok(filtered)
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout().lock()),
    })
}

pub(crate) fn write_report<T, I>(rows: I, output: Option<&Path>) -> Result<usize>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let written = report::write_rows(rows, open_output(output)?)?;
    debug!(rows = written, "Report written.");
    Ok(written)
}

pub(crate) fn write_atom_list<'a, I>(atoms: I, output: Option<&Path>) -> Result<()>
where
    I: IntoIterator<Item = &'a Atom>,
{
    atom_table::write_atoms(atoms, open_output(output)?)?;
    Ok(())
}
