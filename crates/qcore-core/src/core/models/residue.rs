use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The twenty standard amino acids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AminoAcidType {
    // --- Aliphatic, Nonpolar ---
    Alanine,
    Glycine,
    Isoleucine,
    Leucine,
    Proline,
    Valine,

    // --- Aromatic ---
    Phenylalanine,
    Tryptophan,
    Tyrosine,

    // --- Polar, Uncharged ---
    Asparagine,
    Cysteine,
    Glutamine,
    Serine,
    Threonine,
    Methionine,

    // --- Charged ---
    Arginine,
    Histidine,
    Lysine,
    AsparticAcid,
    GlutamicAcid,
}

impl AminoAcidType {
    /// Looks up a standard three-letter residue code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Option<Self> {
        let code = code.trim().to_ascii_uppercase();
        let aa = match code.as_str() {
            "ALA" => Self::Alanine,
            "GLY" => Self::Glycine,
            "ILE" => Self::Isoleucine,
            "LEU" => Self::Leucine,
            "PRO" => Self::Proline,
            "VAL" => Self::Valine,
            "PHE" => Self::Phenylalanine,
            "TRP" => Self::Tryptophan,
            "TYR" => Self::Tyrosine,
            "ASN" => Self::Asparagine,
            "CYS" => Self::Cysteine,
            "GLN" => Self::Glutamine,
            "SER" => Self::Serine,
            "THR" => Self::Threonine,
            "MET" => Self::Methionine,
            "ARG" => Self::Arginine,
            "HIS" => Self::Histidine,
            "LYS" => Self::Lysine,
            "ASP" => Self::AsparticAcid,
            "GLU" => Self::GlutamicAcid,
            _ => return None,
        };
        Some(aa)
    }

    /// Upper-case three-letter code, e.g. `TRP`.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Alanine => "ALA",
            Self::Glycine => "GLY",
            Self::Isoleucine => "ILE",
            Self::Leucine => "LEU",
            Self::Proline => "PRO",
            Self::Valine => "VAL",
            Self::Phenylalanine => "PHE",
            Self::Tryptophan => "TRP",
            Self::Tyrosine => "TYR",
            Self::Asparagine => "ASN",
            Self::Cysteine => "CYS",
            Self::Glutamine => "GLN",
            Self::Serine => "SER",
            Self::Threonine => "THR",
            Self::Methionine => "MET",
            Self::Arginine => "ARG",
            Self::Histidine => "HIS",
            Self::Lysine => "LYS",
            Self::AsparticAcid => "ASP",
            Self::GlutamicAcid => "GLU",
        }
    }

    /// English name as shown in residue summaries.
    pub fn full_name(&self) -> &'static str {
        match self {
            Self::Alanine => "Alanine",
            Self::Glycine => "Glycine",
            Self::Isoleucine => "Isoleucine",
            Self::Leucine => "Leucine",
            Self::Proline => "Proline",
            Self::Valine => "Valine",
            Self::Phenylalanine => "Phenylalanine",
            Self::Tryptophan => "Tryptophan",
            Self::Tyrosine => "Tyrosine",
            Self::Asparagine => "Asparagine",
            Self::Cysteine => "Cysteine",
            Self::Glutamine => "Glutamine",
            Self::Serine => "Serine",
            Self::Threonine => "Threonine",
            Self::Methionine => "Methionine",
            Self::Arginine => "Arginine",
            Self::Histidine => "Histidine",
            Self::Lysine => "Lysine",
            Self::AsparticAcid => "Aspartic Acid",
            Self::GlutamicAcid => "Glutamic Acid",
        }
    }

    /// Residues whose side chains carry an aromatic ring (histidine included).
    pub fn is_aromatic(&self) -> bool {
        matches!(
            self,
            Self::Phenylalanine | Self::Tyrosine | Self::Tryptophan | Self::Histidine
        )
    }
}

/// Display name for a residue code: the full amino-acid name when standard, else the code itself.
pub fn residue_display_name(code: &str) -> String {
    AminoAcidType::from_code(code)
        .map(|aa| aa.full_name().to_string())
        .unwrap_or_else(|| code.trim().to_string())
}

/// Coarse chemical category of an atom, derived from its residue and element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResidueClass {
    Protein,
    Ligand,
    Water,
    Ion,
}

/// Returned when a string names none of the four residue classes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid residue class '{0}': expected protein, ligand, water or ion")]
pub struct ParseClassError(pub String);

impl FromStr for ResidueClass {
    type Err = ParseClassError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "protein" => Ok(ResidueClass::Protein),
            "ligand" => Ok(ResidueClass::Ligand),
            "water" => Ok(ResidueClass::Water),
            "ion" => Ok(ResidueClass::Ion),
            _ => Err(ParseClassError(s.to_string())),
        }
    }
}

impl fmt::Display for ResidueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                ResidueClass::Protein => "protein",
                ResidueClass::Ligand => "ligand",
                ResidueClass::Water => "water",
                ResidueClass::Ion => "ion",
            }
        )
    }
}

/// Identifies one residue instance: `(residue_name, chain_id, sequence_number, insertion_code)`.
///
/// This key, not atom coordinates, is the unit of complete-residue expansion.
/// Ordering is by chain, then sequence number, then insertion code, then name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueKey {
    pub residue_name: String,
    pub chain_id: String,
    pub sequence_number: i32,
    pub insertion_code: Option<char>,
}

impl Ord for ResidueKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (
            &self.chain_id,
            self.sequence_number,
            self.insertion_code,
            &self.residue_name,
        )
            .cmp(&(
                &other.chain_id,
                other.sequence_number,
                other.insertion_code,
                &other.residue_name,
            ))
    }
}

impl PartialOrd for ResidueKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ResidueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}:{}", self.residue_name, self.chain_id, self.sequence_number)?;
        if let Some(icode) = self.insertion_code {
            write!(f, "{}", icode)?;
        }
        Ok(())
    }
}
