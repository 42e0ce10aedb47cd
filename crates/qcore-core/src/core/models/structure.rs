use super::atom::Atom;
use super::residue::ResidueKey;
use crate::core::utils::geometry::BoundingBox;
use itertools::Itertools;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Reasons a set of atoms cannot form a [`Structure`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Duplicate atom id {id} at positions {first} and {second}")]
    DuplicateAtomId { id: i64, first: usize, second: usize },
}

/// An immutable snapshot of a loaded structure.
///
/// Atoms keep the order in which they were supplied; every index handed out by the
/// engine refers to a position in [`Structure::atoms`]. Loading a new structure means
/// building a new `Structure`; nothing in the crate mutates one after construction.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    atoms: Vec<Atom>,
    id_index: HashMap<i64, usize>,
}

impl Structure {
    /// Builds a snapshot, rejecting duplicate atom ids.
    pub fn new(atoms: Vec<Atom>) -> Result<Self, StructureError> {
        let mut id_index = HashMap::with_capacity(atoms.len());
        for (idx, atom) in atoms.iter().enumerate() {
            if let Some(first) = id_index.insert(atom.id, idx) {
                return Err(StructureError::DuplicateAtomId {
                    id: atom.id,
                    first,
                    second: idx,
                });
            }
        }
        Ok(Self { atoms, id_index })
    }

    /// All atoms in load order.
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    /// The atom at `index` in load order.
    pub fn atom(&self, index: usize) -> Option<&Atom> {
        self.atoms.get(index)
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    /// Looks an atom up by its serial number in constant time.
    pub fn find_by_id(&self, id: i64) -> Option<&Atom> {
        self.id_index.get(&id).map(|&idx| &self.atoms[idx])
    }

    /// Position in [`Structure::atoms`] of the atom with serial `id`.
    pub fn index_of_id(&self, id: i64) -> Option<usize> {
        self.id_index.get(&id).copied()
    }

    /// A new snapshot holding only atoms of `chain_id`, trimmed and matched without regard
    /// to ASCII case, so `a` selects chain `A`.
    pub fn filter_by_chain(&self, chain_id: &str) -> Structure {
        let chain_id = chain_id.trim();
        let atoms: Vec<Atom> = self
            .atoms
            .iter()
            .filter(|a| a.chain_id.trim().eq_ignore_ascii_case(chain_id))
            .cloned()
            .collect();
        let id_index = atoms.iter().enumerate().map(|(i, a)| (a.id, i)).collect();
        Structure { atoms, id_index }
    }

    /// Per-axis min/max over all atoms, or `None` when the structure is empty.
    pub fn bounds(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.atoms.iter().map(|a| &a.position))
    }

    /// Distinct chain identifiers in order of first appearance.
    pub fn chain_ids(&self) -> Vec<&str> {
        self.atoms.iter().map(|a| a.chain_id.as_str()).unique().collect()
    }

    /// Atom indices grouped by residue key.
    pub fn residue_groups(&self) -> BTreeMap<ResidueKey, Vec<usize>> {
        let mut groups: BTreeMap<ResidueKey, Vec<usize>> = BTreeMap::new();
        for (idx, atom) in self.atoms.iter().enumerate() {
            groups.entry(atom.residue_key()).or_default().push(idx);
        }
        groups
    }

    /// Coordinates as plain arrays, in atom order.
    pub fn positions(&self) -> Vec<[f64; 3]> {
        self.atoms
            .iter()
            .map(|a| [a.position.x, a.position.y, a.position.z])
            .collect()
    }
}
