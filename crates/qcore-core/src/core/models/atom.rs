use super::residue::{ResidueClass, ResidueKey};
use crate::core::chemistry::{classification, element};
use crate::core::utils::geometry::Axis;
use nalgebra::Point3;

/// One atom of a loaded structure.
///
/// Atoms are plain values: once a [`Structure`](super::structure::Structure) is built
/// from them they are never mutated. Everything derived (element, classification,
/// residue key) is computed on demand from the stored fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Serial number, unique within one structure snapshot.
    pub id: i64,
    /// Raw atom label (e.g. "CA", "1HG1").
    pub name: String,
    /// Residue code (e.g. "ALA", "HOH").
    pub residue_name: String,
    pub chain_id: String,
    /// Residue sequence number from the source file.
    pub sequence_number: i32,
    pub insertion_code: Option<char>,
    pub alternate_location: Option<char>,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    pub b_factor: f64,
    pub occupancy: f64,
    /// Element column as provided by the parser, possibly empty.
    pub element_hint: String,
    /// Blank for standard polymer residues, non-blank for heteroatoms and waters.
    pub het_flag: String,
    pub model_index: i32,
}

impl Atom {
    /// Creates an atom with default metadata: no insertion code or alternate location,
    /// B-factor 0, occupancy 1, empty element hint and het flag, model 0.
    pub fn new(
        id: i64,
        name: &str,
        residue_name: &str,
        chain_id: &str,
        sequence_number: i32,
        position: Point3<f64>,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            residue_name: residue_name.to_string(),
            chain_id: chain_id.to_string(),
            sequence_number,
            insertion_code: None,
            alternate_location: None,
            position,
            b_factor: 0.0,
            occupancy: 1.0,
            element_hint: String::new(),
            het_flag: String::new(),
            model_index: 0,
        }
    }

    /// Sets the element column that [`Atom::element`] prefers over the name-based guess.
    pub fn with_element(mut self, element: &str) -> Self {
        self.element_hint = element.to_string();
        self
    }

    pub fn with_b_factor(mut self, b_factor: f64) -> Self {
        self.b_factor = b_factor;
        self
    }

    /// Sets the insertion code that follows the sequence number (e.g. `52A`).
    pub fn with_insertion_code(mut self, code: char) -> Self {
        self.insertion_code = Some(code);
        self
    }

    pub fn with_alternate_location(mut self, altloc: char) -> Self {
        self.alternate_location = Some(altloc);
        self
    }

    /// Sets the model number for multi-model files. Models are not merged or split.
    pub fn with_model(mut self, model_index: i32) -> Self {
        self.model_index = model_index;
        self
    }

    /// Sets the record marker, typically `HETATM`; see [`Atom::is_hetero`].
    pub fn with_het_flag(mut self, het_flag: &str) -> Self {
        self.het_flag = het_flag.to_string();
        self
    }

    /// Euclidean distance in Angstroms.
    pub fn distance_to(&self, other: &Atom) -> f64 {
        nalgebra::distance(&self.position, &other.position)
    }

    pub fn coordinate(&self, axis: Axis) -> f64 {
        axis.component(&self.position)
    }

    /// Title-case element symbol (`C`, `Zn`), taken from the element column when present
    /// and guessed from the atom name otherwise. `X` when neither yields a symbol.
    pub fn element(&self) -> String {
        element::infer_element(&self.name, &self.element_hint)
    }

    /// Protein, ligand, water or ion, judged from the residue code and element.
    pub fn classification(&self) -> ResidueClass {
        classification::classify(&self.residue_name, &self.element())
    }

    /// True when the het flag is non-blank.
    pub fn is_hetero(&self) -> bool {
        !self.het_flag.trim().is_empty()
    }

    /// The residue this atom belongs to. Allocates; prefer [`Atom::same_residue`] for
    /// pairwise checks.
    pub fn residue_key(&self) -> ResidueKey {
        ResidueKey {
            residue_name: self.residue_name.clone(),
            chain_id: self.chain_id.clone(),
            sequence_number: self.sequence_number,
            insertion_code: self.insertion_code,
        }
    }

    /// Cheap residue-key comparison that avoids allocating two keys.
    pub fn same_residue(&self, other: &Atom) -> bool {
        self.sequence_number == other.sequence_number
            && self.insertion_code == other.insertion_code
            && self.chain_id == other.chain_id
            && self.residue_name == other.residue_name
    }

    /// The `chain,sequence[icode],name` form accepted by tunneling endpoints.
    pub fn spec(&self) -> String {
        let mut spec = format!("{},{}", self.chain_id, self.sequence_number);
        if let Some(icode) = self.insertion_code {
            spec.push(icode);
        }
        spec.push(',');
        spec.push_str(&self.name);
        spec
    }
}
