use crate::core::models::atom::Atom;
use crate::core::models::structure::{Structure, StructureError};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

/// One row of an atom table. Columns after `z` may be absent from the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtomRecord {
    pub id: i64,
    pub name: String,
    pub residue_name: String,
    pub chain_id: String,
    pub sequence_number: i32,
    #[serde(default)]
    pub insertion_code: Option<String>,
    #[serde(default)]
    pub alternate_location: Option<String>,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    #[serde(default)]
    pub b_factor: Option<f64>,
    #[serde(default)]
    pub occupancy: Option<f64>,
    #[serde(default)]
    pub element: Option<String>,
    #[serde(default)]
    pub het_flag: Option<String>,
    #[serde(default)]
    pub model: Option<i32>,
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("File I/O error for '{path}': {source}")]
    Io { path: String, source: io::Error },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord { line: u64, reason: String },
    #[error(transparent)]
    Structure(#[from] StructureError),
}

fn single_char(value: Option<&str>, field: &str, line: u64) -> Result<Option<char>, TableError> {
    let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Some(c)),
        _ => Err(TableError::InvalidRecord {
            line,
            reason: format!("{} must be a single character, got '{}'", field, value),
        }),
    }
}

impl AtomRecord {
    fn into_atom(self, line: u64) -> Result<Atom, TableError> {
        let insertion_code = single_char(self.insertion_code.as_deref(), "insertion_code", line)?;
        let alternate_location =
            single_char(self.alternate_location.as_deref(), "alternate_location", line)?;
        if !(self.x.is_finite() && self.y.is_finite() && self.z.is_finite()) {
            return Err(TableError::InvalidRecord {
                line,
                reason: "coordinates must be finite".to_string(),
            });
        }

        let mut atom = Atom::new(
            self.id,
            self.name.trim(),
            self.residue_name.trim(),
            self.chain_id.trim(),
            self.sequence_number,
            Point3::new(self.x, self.y, self.z),
        );
        atom.insertion_code = insertion_code;
        atom.alternate_location = alternate_location;
        atom.b_factor = self.b_factor.unwrap_or(0.0);
        atom.occupancy = self.occupancy.unwrap_or(1.0);
        atom.element_hint = self.element.unwrap_or_default();
        atom.het_flag = self.het_flag.unwrap_or_default();
        atom.model_index = self.model.unwrap_or(0);
        Ok(atom)
    }

    pub fn from_atom(atom: &Atom) -> Self {
        let optional = |s: &str| (!s.is_empty()).then(|| s.to_string());
        Self {
            id: atom.id,
            name: atom.name.clone(),
            residue_name: atom.residue_name.clone(),
            chain_id: atom.chain_id.clone(),
            sequence_number: atom.sequence_number,
            insertion_code: atom.insertion_code.map(String::from),
            alternate_location: atom.alternate_location.map(String::from),
            x: atom.position.x,
            y: atom.position.y,
            z: atom.position.z,
            b_factor: Some(atom.b_factor),
            occupancy: Some(atom.occupancy),
            element: optional(&atom.element_hint),
            het_flag: optional(&atom.het_flag),
            model: Some(atom.model_index),
        }
    }
}

/// Reads an atom table from any reader into a new [`Structure`].
///
/// Rows keep their file order. Duplicate ids and multi-character insertion codes or
/// alternate locations are rejected.
pub fn read_atoms<R: Read>(reader: R) -> Result<Structure, TableError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader);

    let mut atoms = Vec::new();
    for (row, result) in csv_reader.deserialize::<AtomRecord>().enumerate() {
        let record = result?;
        // Header occupies line 1.
        atoms.push(record.into_atom(row as u64 + 2)?);
    }
    debug!(atoms = atoms.len(), "Parsed atom table.");
    Ok(Structure::new(atoms)?)
}

pub fn read_atoms_from_path(path: &Path) -> Result<Structure, TableError> {
    let file = File::open(path).map_err(|e| TableError::Io {
        path: path.to_string_lossy().to_string(),
        source: e,
    })?;
    read_atoms(file)
}

pub fn write_atoms<'a, W, I>(atoms: I, writer: W) -> Result<(), TableError>
where
    W: Write,
    I: IntoIterator<Item = &'a Atom>,
{
    let mut csv_writer = csv::Writer::from_writer(writer);
    for atom in atoms {
        csv_writer.serialize(AtomRecord::from_atom(atom))?;
    }
    csv_writer.flush().map_err(|e| TableError::Io {
        path: "<output>".to_string(),
        source: e,
    })?;
    Ok(())
}
