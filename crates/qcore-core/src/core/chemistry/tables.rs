use phf::{Map, Set, phf_map, phf_set};

/// Placeholder symbol for atoms whose element cannot be determined.
pub const UNKNOWN_ELEMENT: &str = "X";

/// Radius used for any element missing from [`VDW_RADII`], in Angstroms.
pub const DEFAULT_VDW_RADIUS: f64 = 1.70;

/// Van der Waals radii in Angstroms, keyed by upper-cased element symbol.
pub static VDW_RADII: Map<&'static str, f64> = phf_map! {
    "H" => 1.20, "C" => 1.70, "N" => 1.55, "O" => 1.52, "S" => 1.80, "P" => 1.80,
    "F" => 1.47, "CL" => 1.75, "BR" => 1.85, "I" => 1.98, "SE" => 1.90,
    "NA" => 2.27, "K" => 2.75, "MG" => 1.73, "CA" => 2.31,
    "MN" => 2.00, "FE" => 2.00, "CO" => 2.00, "NI" => 2.00, "CU" => 2.00, "ZN" => 2.10,
};

/// Elements whose atoms classify as ions unless they belong to a water residue.
pub static METAL_ELEMENTS: Set<&'static str> = phf_set! {
    "LI", "NA", "K", "RB", "CS", "MG", "CA", "SR", "BA",
    "MN", "FE", "CO", "NI", "CU", "ZN", "CD", "HG",
};

/// Residue codes recognised as water.
pub static WATER_RESIDUES: Set<&'static str> = phf_set! { "HOH", "WAT", "H2O" };

/// Per-element multipliers on edge cost in the tunneling graph. Unlisted elements use 1.0.
pub static TUNNELING_FACTORS: Map<&'static str, f64> = phf_map! {
    "CU" => 0.5, "FE" => 0.5,
    "ZN" => 0.6, "NI" => 0.6, "MN" => 0.6,
    "S" => 0.9,
    "C" => 1.0, "N" => 1.0, "O" => 1.0,
};

/// Extra multiplier for atoms of aromatic residues in the tunneling graph.
pub const AROMATIC_TUNNELING_FACTOR: f64 = 0.8;

/// Van der Waals radius for `element` in Angstroms.
///
/// The symbol is trimmed and upper-cased before lookup, so `"Zn"` and `" ZN"` agree.
/// Unknown symbols, including [`UNKNOWN_ELEMENT`], get [`DEFAULT_VDW_RADIUS`].
pub fn vdw_radius(element: &str) -> f64 {
    VDW_RADII
        .get(element.trim().to_ascii_uppercase().as_str())
        .copied()
        .unwrap_or(DEFAULT_VDW_RADIUS)
}

/// Whether `element` is listed in [`METAL_ELEMENTS`], ignoring case.
pub fn is_metal(element: &str) -> bool {
    METAL_ELEMENTS.contains(element.trim().to_ascii_uppercase().as_str())
}

pub fn is_water_residue(residue_name: &str) -> bool {
    WATER_RESIDUES.contains(residue_name.trim().to_ascii_uppercase().as_str())
}

/// Edge-cost multiplier for `element`; 1.0 when it is not listed in [`TUNNELING_FACTORS`].
pub fn tunneling_factor(element: &str) -> f64 {
    TUNNELING_FACTORS
        .get(element.trim().to_ascii_uppercase().as_str())
        .copied()
        .unwrap_or(1.0)
}
