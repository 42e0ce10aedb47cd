use crate::core::chemistry::element::is_hydrogen;
use crate::core::io::report::ContactRow;
use crate::core::models::atom::Atom;
use crate::core::models::residue::ResidueKey;
use crate::core::models::structure::Structure;
use crate::core::utils::geometry::{Axis, BoundingBox};
use crate::engine::config::{ProximityOptions, SearchField};
use crate::engine::error::EngineError;
use crate::engine::spatial::AtomKdTree;
use itertools::Itertools;
use nalgebra::Point3;
use std::collections::HashSet;
use tracing::debug;

/// Two atoms within contact distance; `a` always precedes `b` in the structure.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomPair<'a> {
    pub a: &'a Atom,
    pub b: &'a Atom,
    pub distance: f64,
}

impl AtomPair<'_> {
    pub fn to_row(&self) -> ContactRow {
        ContactRow {
            atom_a_id: self.a.id,
            atom_a_name: self.a.name.clone(),
            residue_a: self.a.residue_key().to_string(),
            atom_b_id: self.b.id,
            atom_b_name: self.b.name.clone(),
            residue_b: self.b.residue_key().to_string(),
            distance: self.distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxSearchResult<'a> {
    pub atoms: Vec<&'a Atom>,
    /// Sorted, distinct residue sequence numbers of `atoms`.
    pub sequence_numbers: Vec<i32>,
}

/// Parses a user-supplied coordinate or threshold, rejecting non-finite values.
pub fn parse_bound(field: &'static str, raw: &str) -> Result<f64, EngineError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| EngineError::InvalidValue {
            field,
            value: raw.to_string(),
        })
}

fn field_text(atom: &Atom, field: SearchField) -> String {
    match field {
        SearchField::Name => atom.name.clone(),
        SearchField::Residue => atom.residue_name.clone(),
        SearchField::Chain => atom.chain_id.clone(),
        SearchField::InsertionCode => atom.insertion_code.map(String::from).unwrap_or_default(),
        SearchField::AlternateLocation => {
            atom.alternate_location.map(String::from).unwrap_or_default()
        }
        SearchField::Element => atom.element(),
        SearchField::HetFlag => atom.het_flag.clone(),
        _ => String::new(),
    }
}

fn field_number(atom: &Atom, field: SearchField) -> f64 {
    match field {
        SearchField::Id => atom.id as f64,
        SearchField::Sequence => atom.sequence_number as f64,
        SearchField::X => atom.position.x,
        SearchField::Y => atom.position.y,
        SearchField::Z => atom.position.z,
        SearchField::BFactor => atom.b_factor,
        SearchField::Occupancy => atom.occupancy,
        SearchField::Model => atom.model_index as f64,
        _ => f64::NAN,
    }
}

/// All atoms whose `field` equals `value`.
///
/// Text fields compare case-insensitively after trimming; numeric fields compare by
/// parsed value, so `"10"` and `"10.0"` select the same atoms.
pub fn search_by_criterion<'a>(
    structure: &'a Structure,
    field: SearchField,
    value: &str,
) -> Result<Vec<&'a Atom>, EngineError> {
    if field.is_numeric() {
        let wanted = parse_bound(field.name(), value)?;
        return Ok(structure
            .atoms()
            .iter()
            .filter(|a| field_number(a, field) == wanted)
            .collect());
    }

    let wanted = value.trim().to_lowercase();
    Ok(structure
        .atoms()
        .iter()
        .filter(|a| field_text(a, field).trim().to_lowercase() == wanted)
        .collect())
}

/// Like [`search_by_criterion`], resolving the field from its name or alias.
pub fn search_by_field_name<'a>(
    structure: &'a Structure,
    field: &str,
    value: &str,
) -> Result<Vec<&'a Atom>, EngineError> {
    let field = field
        .parse::<SearchField>()
        .map_err(|name| EngineError::UnknownField { name })?;
    search_by_criterion(structure, field, value)
}

/// Atoms whose `axis` coordinate lies in the closed interval spanned by `from` and `to`,
/// whichever order they are given in.
pub fn search_axis_range(
    structure: &Structure,
    axis: Axis,
    from: f64,
    to: f64,
) -> Result<Vec<&Atom>, EngineError> {
    if from.is_nan() || to.is_nan() {
        return Err(EngineError::InvalidParameter {
            name: "range",
            reason: "bounds must be numbers".to_string(),
        });
    }
    let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
    Ok(structure
        .atoms()
        .iter()
        .filter(|a| {
            let v = a.coordinate(axis);
            lo <= v && v <= hi
        })
        .collect())
}

/// Every atom of `structure` that shares a residue key with any atom in `matched`,
/// in structure order.
pub fn expand_complete_residues<'a>(structure: &'a Structure, matched: &[&Atom]) -> Vec<&'a Atom> {
    let keys: HashSet<ResidueKey> = matched.iter().map(|a| a.residue_key()).collect();
    structure
        .atoms()
        .iter()
        .filter(|a| keys.contains(&a.residue_key()))
        .collect()
}

pub fn distinct_sequence_numbers(atoms: &[&Atom]) -> Vec<i32> {
    atoms
        .iter()
        .map(|a| a.sequence_number)
        .sorted_unstable()
        .dedup()
        .collect()
}

/// Atoms inside the axis-aligned box spanned by two corners (bounds are sorted per axis,
/// inclusive), optionally widened to whole residues.
pub fn search_box<'a>(
    structure: &'a Structure,
    corner_a: Point3<f64>,
    corner_b: Point3<f64>,
    complete_residues: bool,
) -> BoxSearchResult<'a> {
    let bounds = BoundingBox::from_corners(corner_a, corner_b);
    let matched: Vec<&Atom> = structure
        .atoms()
        .iter()
        .filter(|a| bounds.contains(&a.position))
        .collect();
    if matched.is_empty() {
        return BoxSearchResult::default();
    }

    let atoms = if complete_residues {
        expand_complete_residues(structure, &matched)
    } else {
        matched
    };
    let sequence_numbers = distinct_sequence_numbers(&atoms);
    BoxSearchResult {
        atoms,
        sequence_numbers,
    }
}

/// All unordered atom pairs separated by at most `options.max_distance`, sorted by
/// structure order of the first and then the second atom.
pub fn find_contacts<'a>(
    structure: &'a Structure,
    options: &ProximityOptions,
) -> Result<Vec<AtomPair<'a>>, EngineError> {
    let max_distance = options.max_distance;
    if max_distance.is_nan() || max_distance == f64::NEG_INFINITY {
        return Err(EngineError::InvalidParameter {
            name: "max_distance",
            reason: format!("{} is not a usable distance", max_distance),
        });
    }
    if structure.is_empty() || max_distance <= 0.0 {
        return Ok(Vec::new());
    }

    let atoms = structure.atoms();
    let tree = AtomKdTree::build(atoms);
    let hydrogen: Vec<bool> = if options.ignore_hydrogens {
        atoms.iter().map(|a| is_hydrogen(&a.element())).collect()
    } else {
        vec![false; atoms.len()]
    };

    let pairs: Vec<AtomPair<'a>> = tree
        .pairs_within(max_distance)
        .into_iter()
        .filter(|&(i, j, _)| !(hydrogen[i] || hydrogen[j]))
        .filter(|&(i, j, _)| !(options.exclude_same_residue && atoms[i].same_residue(&atoms[j])))
        .map(|(i, j, distance)| AtomPair {
            a: &atoms[i],
            b: &atoms[j],
            distance,
        })
        .collect();

    debug!(
        max_distance,
        atoms = atoms.len(),
        pairs = pairs.len(),
        "Contact search complete."
    );
    Ok(pairs)
}
