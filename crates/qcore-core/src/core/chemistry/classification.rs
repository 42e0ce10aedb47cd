use super::tables::{is_metal, is_water_residue};
use crate::core::models::residue::{AminoAcidType, ResidueClass};

/// Classifies an atom by its residue name and element symbol.
///
/// Water residues win over everything, then metal elements count as ions, then the
/// twenty standard amino acids count as protein. Anything else, including modified or
/// nonstandard residues, is a ligand.
pub fn classify(residue_name: &str, element: &str) -> ResidueClass {
    if is_water_residue(residue_name) {
        ResidueClass::Water
    } else if is_metal(element) {
        ResidueClass::Ion
    } else if AminoAcidType::from_code(residue_name).is_some() {
        ResidueClass::Protein
    } else {
        ResidueClass::Ligand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_takes_precedence_over_element() {
        assert_eq!(classify("HOH", "O"), ResidueClass::Water);
        assert_eq!(classify("WAT", "Na"), ResidueClass::Water);
    }

    #[test]
    fn metal_elements_are_ions_even_inside_ligands() {
        assert_eq!(classify("ZN", "Zn"), ResidueClass::Ion);
        assert_eq!(classify("HEM", "Fe"), ResidueClass::Ion);
    }

    #[test]
    fn standard_amino_acids_are_protein() {
        assert_eq!(classify("ALA", "C"), ResidueClass::Protein);
        assert_eq!(classify("trp", "N"), ResidueClass::Protein);
    }

    #[test]
    fn everything_else_is_ligand() {
        assert_eq!(classify("HEM", "C"), ResidueClass::Ligand);
        assert_eq!(classify("MSE", "Se"), ResidueClass::Ligand);
        assert_eq!(classify("", "X"), ResidueClass::Ligand);
    }
}
