use crate::core::io::report::{ChainSummaryRow, CompositionRow, ResidueSummaryRow};
use crate::core::models::atom::Atom;
use crate::core::models::residue::{ResidueClass, ResidueKey, residue_display_name};
use crate::core::utils::geometry::{BoundingBox, centroid};
use nalgebra::Point3;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClassCounts {
    pub protein: usize,
    pub ligand: usize,
    pub water: usize,
    pub ion: usize,
}

impl ClassCounts {
    pub fn add(&mut self, class: ResidueClass) {
        match class {
            ResidueClass::Protein => self.protein += 1,
            ResidueClass::Ligand => self.ligand += 1,
            ResidueClass::Water => self.water += 1,
            ResidueClass::Ion => self.ion += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.protein + self.ligand + self.water + self.ion
    }
}

/// Descriptive statistics for an arbitrary group of atoms, typically one grid cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CellSummary {
    pub atom_count: usize,
    pub residue_count: usize,
    pub chain_count: usize,
    pub classes: ClassCounts,
    pub bfactor_mean: f64,
    /// Population standard deviation.
    pub bfactor_std: f64,
    /// Distinct non-empty alternate location identifiers.
    pub altloc_count: usize,
    pub model_count: usize,
    /// Atom counts per inferred element symbol.
    pub elements: BTreeMap<String, usize>,
}

/// Mean and population standard deviation; `(0, 0)` for an empty input.
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}

pub fn element_composition(atoms: &[&Atom]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for atom in atoms {
        *counts.entry(atom.element()).or_insert(0) += 1;
    }
    counts
}

pub fn composition_rows(composition: &BTreeMap<String, usize>) -> Vec<CompositionRow> {
    composition
        .iter()
        .map(|(element, &count)| CompositionRow {
            element: element.clone(),
            count,
        })
        .collect()
}

pub fn summarize(atoms: &[&Atom]) -> CellSummary {
    if atoms.is_empty() {
        return CellSummary::default();
    }

    let residues: HashSet<ResidueKey> = atoms.iter().map(|a| a.residue_key()).collect();
    let chains: HashSet<&str> = atoms.iter().map(|a| a.chain_id.as_str()).collect();
    let altlocs: HashSet<char> = atoms.iter().filter_map(|a| a.alternate_location).collect();
    let models: HashSet<i32> = atoms.iter().map(|a| a.model_index).collect();

    let mut classes = ClassCounts::default();
    for atom in atoms {
        classes.add(atom.classification());
    }

    let b_factors: Vec<f64> = atoms.iter().map(|a| a.b_factor).collect();
    let (bfactor_mean, bfactor_std) = mean_and_std(&b_factors);

    CellSummary {
        atom_count: atoms.len(),
        residue_count: residues.len(),
        chain_count: chains.len(),
        classes,
        bfactor_mean,
        bfactor_std,
        altloc_count: altlocs.len(),
        model_count: models.len(),
        elements: element_composition(atoms),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResidueSummary {
    pub key: ResidueKey,
    pub display_name: String,
    pub atom_count: usize,
    pub centroid: Point3<f64>,
    pub bounds: BoundingBox,
    pub bfactor_mean: f64,
    pub bfactor_std: f64,
}

impl ResidueSummary {
    pub fn to_row(&self) -> ResidueSummaryRow {
        ResidueSummaryRow {
            chain_id: self.key.chain_id.clone(),
            sequence_number: self.key.sequence_number,
            insertion_code: self.key.insertion_code.map(String::from).unwrap_or_default(),
            residue_name: self.key.residue_name.clone(),
            display_name: self.display_name.clone(),
            atom_count: self.atom_count,
            centroid_x: self.centroid.x,
            centroid_y: self.centroid.y,
            centroid_z: self.centroid.z,
            x_min: self.bounds.min.x,
            x_max: self.bounds.max.x,
            y_min: self.bounds.min.y,
            y_max: self.bounds.max.y,
            z_min: self.bounds.min.z,
            z_max: self.bounds.max.z,
            bfactor_mean: self.bfactor_mean,
            bfactor_std: self.bfactor_std,
        }
    }
}

struct GroupStats {
    centroid: Point3<f64>,
    bounds: BoundingBox,
    bfactor_mean: f64,
    bfactor_std: f64,
}

fn group_stats(group: &[&Atom]) -> GroupStats {
    let positions = group.iter().map(|a| &a.position);
    let b_factors: Vec<f64> = group.iter().map(|a| a.b_factor).collect();
    let (bfactor_mean, bfactor_std) = mean_and_std(&b_factors);
    GroupStats {
        centroid: centroid(positions.clone()).unwrap_or_else(Point3::origin),
        bounds: BoundingBox::enclosing(positions).unwrap_or_else(BoundingBox::zero),
        bfactor_mean,
        bfactor_std,
    }
}

/// One summary per residue key, ordered by chain, sequence number, insertion code and name.
pub fn residue_summaries(atoms: &[&Atom]) -> Vec<ResidueSummary> {
    let mut groups: BTreeMap<ResidueKey, Vec<&Atom>> = BTreeMap::new();
    for &atom in atoms {
        groups.entry(atom.residue_key()).or_default().push(atom);
    }

    groups
        .into_iter()
        .map(|(key, group)| {
            let stats = group_stats(&group);
            ResidueSummary {
                display_name: residue_display_name(&key.residue_name),
                key,
                atom_count: group.len(),
                centroid: stats.centroid,
                bounds: stats.bounds,
                bfactor_mean: stats.bfactor_mean,
                bfactor_std: stats.bfactor_std,
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainSummary {
    pub chain_id: String,
    pub atom_count: usize,
    pub residue_count: usize,
    pub centroid: Point3<f64>,
    pub bounds: BoundingBox,
    pub bfactor_mean: f64,
    pub bfactor_std: f64,
}

impl ChainSummary {
    pub fn to_row(&self) -> ChainSummaryRow {
        ChainSummaryRow {
            chain_id: self.chain_id.clone(),
            atom_count: self.atom_count,
            residue_count: self.residue_count,
            centroid_x: self.centroid.x,
            centroid_y: self.centroid.y,
            centroid_z: self.centroid.z,
            x_min: self.bounds.min.x,
            x_max: self.bounds.max.x,
            y_min: self.bounds.min.y,
            y_max: self.bounds.max.y,
            z_min: self.bounds.min.z,
            z_max: self.bounds.max.z,
            bfactor_mean: self.bfactor_mean,
            bfactor_std: self.bfactor_std,
        }
    }
}

/// One summary per chain, in order of first appearance.
pub fn chain_summaries(atoms: &[&Atom]) -> Vec<ChainSummary> {
    let mut order: Vec<&str> = Vec::new();
    let mut groups: BTreeMap<&str, Vec<&Atom>> = BTreeMap::new();
    for &atom in atoms {
        let chain = atom.chain_id.as_str();
        groups
            .entry(chain)
            .or_insert_with(|| {
                order.push(chain);
                Vec::new()
            })
            .push(atom);
    }

    order
        .into_iter()
        .filter_map(|chain| groups.remove(chain).map(|group| (chain, group)))
        .map(|(chain, group)| {
            let stats = group_stats(&group);
            let residues: HashSet<ResidueKey> = group.iter().map(|a| a.residue_key()).collect();
            ChainSummary {
                chain_id: chain.to_string(),
                atom_count: group.len(),
                residue_count: residues.len(),
                centroid: stats.centroid,
                bounds: stats.bounds,
                bfactor_mean: stats.bfactor_mean,
                bfactor_std: stats.bfactor_std,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atom(id: i64, name: &str, resn: &str, chain: &str, seq: i32, x: f64, b: f64) -> Atom {
        Atom::new(id, name, resn, chain, seq, Point3::new(x, 0.0, 0.0)).with_b_factor(b)
    }

    fn sample() -> Vec<Atom> {
        vec![
            atom(1, "N", "ALA", "A", 1, 0.0, 10.0),
            atom(2, "CA", "ALA", "A", 1, 1.0, 20.0).with_alternate_location('A'),
            atom(3, "CA", "ALA", "A", 1, 1.1, 20.0).with_alternate_location('B'),
            atom(4, "O", "HOH", "W", 7, 5.0, 30.0),
            atom(5, "ZN", "ZN", "B", 90, 8.0, 40.0).with_element("ZN").with_model(1),
            atom(6, "C1", "HEM", "B", 91, 9.0, 50.0),
        ]
    }

    #[test]
    fn mean_and_std_use_population_formula() {
        assert_eq!(mean_and_std(&[]), (0.0, 0.0));
        assert_eq!(mean_and_std(&[3.0]), (3.0, 0.0));
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(mean, 5.0);
        assert_eq!(std, 2.0);
    }

    #[test]
    fn summarize_counts_every_category() {
        let atoms = sample();
        let refs: Vec<&Atom> = atoms.iter().collect();
        let summary = summarize(&refs);

        assert_eq!(summary.atom_count, 6);
        assert_eq!(summary.residue_count, 4);
        assert_eq!(summary.chain_count, 3);
        assert_eq!(
            summary.classes,
            ClassCounts {
                protein: 3,
                ligand: 1,
                water: 1,
                ion: 1
            }
        );
        assert_eq!(summary.altloc_count, 2);
        assert_eq!(summary.model_count, 2);
        assert!((summary.bfactor_mean - 170.0 / 6.0).abs() < 1e-12);
        assert_eq!(summary.elements.get("C"), Some(&3));
        assert_eq!(summary.elements.get("Zn"), Some(&1));
    }

    #[test]
    fn summarize_empty_group_is_all_zero() {
        assert_eq!(summarize(&[]), CellSummary::default());
    }

    #[test]
    fn residue_summaries_are_ordered_and_single_atom_std_is_zero() {
        let atoms = sample();
        let refs: Vec<&Atom> = atoms.iter().collect();
        let summaries = residue_summaries(&refs);

        let keys: Vec<String> = summaries.iter().map(|s| s.key.to_string()).collect();
        assert_eq!(keys, vec!["ALA A:1", "ZN B:90", "HEM B:91", "HOH W:7"]);
        assert_eq!(summaries[0].display_name, "Alanine");
        assert_eq!(summaries[0].atom_count, 3);
        assert!((summaries[0].centroid.x - 0.7).abs() < 1e-12);
        assert_eq!(summaries[0].bounds.max.x, 1.1);
        assert_eq!(summaries[1].bfactor_std, 0.0);
    }

    #[test]
    fn chain_summaries_follow_first_appearance() {
        let atoms = sample();
        let refs: Vec<&Atom> = atoms.iter().collect();
        let chains = chain_summaries(&refs);

        let ids: Vec<&str> = chains.iter().map(|c| c.chain_id.as_str()).collect();
        assert_eq!(ids, vec!["A", "W", "B"]);
        assert_eq!(chains[2].atom_count, 2);
        assert_eq!(chains[2].residue_count, 2);
        assert_eq!(chains[2].bfactor_mean, 45.0);
        assert_eq!(chains[2].bfactor_std, 5.0);
    }

    #[test]
    fn composition_rows_are_sorted_by_symbol() {
        let atoms = sample();
        let refs: Vec<&Atom> = atoms.iter().collect();
        let rows = composition_rows(&element_composition(&refs));
        let symbols: Vec<&str> = rows.iter().map(|r| r.element.as_str()).collect();
        assert_eq!(symbols, vec!["C", "N", "O", "Zn"]);
    }
}
