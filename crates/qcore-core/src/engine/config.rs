use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Default maximum separation for contact searches, in Angstroms.
pub const DEFAULT_CONTACT_DISTANCE: f64 = 4.0;
/// Default neighbour cutoff for the tunneling graph, in Angstroms.
pub const DEFAULT_TUNNELING_CUTOFF: f64 = 4.5;
pub const DEFAULT_VOXEL_SIZE: f64 = 0.5;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Parameter '{name}' must be {expected} (got {value})")]
    OutOfRange {
        name: &'static str,
        expected: &'static str,
        value: f64,
    },
    #[error("Unknown occupancy mode '{0}': expected 'union' or 'sum'")]
    UnknownOccupancyMode(String),
}

/// The atom attribute a criterion search compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Id,
    Name,
    Residue,
    Chain,
    Sequence,
    InsertionCode,
    AlternateLocation,
    X,
    Y,
    Z,
    BFactor,
    Occupancy,
    Element,
    HetFlag,
    Model,
}

impl SearchField {
    /// Numeric fields compare by parsed value; all others compare case-insensitive text.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::Id
                | Self::Sequence
                | Self::X
                | Self::Y
                | Self::Z
                | Self::BFactor
                | Self::Occupancy
                | Self::Model
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Residue => "residue",
            Self::Chain => "chain",
            Self::Sequence => "sequence",
            Self::InsertionCode => "insertion_code",
            Self::AlternateLocation => "alternate_location",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::BFactor => "b_factor",
            Self::Occupancy => "occupancy",
            Self::Element => "element",
            Self::HetFlag => "het_flag",
            Self::Model => "model",
        }
    }
}

impl FromStr for SearchField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let field = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "id" | "serial" => Self::Id,
            "name" | "atom_name" => Self::Name,
            "residue" | "residue_name" | "resname" => Self::Residue,
            "chain" | "chain_id" => Self::Chain,
            "sequence" | "sequence_number" | "resseq" | "resi" => Self::Sequence,
            "insertion_code" | "icode" => Self::InsertionCode,
            "alternate_location" | "altloc" => Self::AlternateLocation,
            "x" => Self::X,
            "y" => Self::Y,
            "z" => Self::Z,
            "b_factor" | "bfactor" => Self::BFactor,
            "occupancy" => Self::Occupancy,
            "element" | "atom_type" => Self::Element,
            "het_flag" | "het" => Self::HetFlag,
            "model" | "model_index" => Self::Model,
            _ => return Err(s.to_string()),
        };
        Ok(field)
    }
}

impl fmt::Display for SearchField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProximityOptions {
    pub max_distance: f64,
    pub ignore_hydrogens: bool,
    pub exclude_same_residue: bool,
}

impl Default for ProximityOptions {
    fn default() -> Self {
        Self {
            max_distance: DEFAULT_CONTACT_DISTANCE,
            ignore_hydrogens: false,
            exclude_same_residue: false,
        }
    }
}

/// How overlapping atom spheres are counted in physical occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OccupancyMode {
    /// Each voxel counts once, however many atoms cover it.
    #[default]
    Union,
    /// Each atom contributes its own voxels; overlaps are counted repeatedly.
    Sum,
}

impl FromStr for OccupancyMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "union" => Ok(Self::Union),
            "sum" => Ok(Self::Sum),
            _ => Err(ConfigError::UnknownOccupancyMode(s.to_string())),
        }
    }
}

impl fmt::Display for OccupancyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Union => "union",
            Self::Sum => "sum",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalConfig {
    pub voxel_size: f64,
    /// Added to the largest van der Waals radius present when expanding the box.
    pub padding: f64,
    pub expand_bounds: bool,
    pub mode: OccupancyMode,
}

impl Default for PhysicalConfig {
    fn default() -> Self {
        Self {
            voxel_size: DEFAULT_VOXEL_SIZE,
            padding: 0.0,
            expand_bounds: true,
            mode: OccupancyMode::Union,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub counts: [usize; 3],
    pub complete_residues: bool,
    /// Present only when physical occupancy should be computed.
    pub physical: Option<PhysicalConfig>,
}

#[derive(Default)]
pub struct GridConfigBuilder {
    counts: Option<[usize; 3]>,
    complete_residues: Option<bool>,
    physical: Option<PhysicalConfig>,
}

impl GridConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(mut self, nx: usize, ny: usize, nz: usize) -> Self {
        self.counts = Some([nx, ny, nz]);
        self
    }
    pub fn complete_residues(mut self, enabled: bool) -> Self {
        self.complete_residues = Some(enabled);
        self
    }
    pub fn physical(mut self, physical: PhysicalConfig) -> Self {
        self.physical = Some(physical);
        self
    }

    pub fn build(self) -> Result<GridConfig, ConfigError> {
        let counts = self.counts.ok_or(ConfigError::MissingParameter("counts"))?;
        if let Some(physical) = &self.physical {
            if !(physical.voxel_size.is_finite() && physical.voxel_size > 0.0) {
                return Err(ConfigError::OutOfRange {
                    name: "voxel_size",
                    expected: "a positive finite number",
                    value: physical.voxel_size,
                });
            }
            if !physical.padding.is_finite() {
                return Err(ConfigError::OutOfRange {
                    name: "padding",
                    expected: "finite",
                    value: physical.padding,
                });
            }
        }
        Ok(GridConfig {
            counts,
            complete_residues: self.complete_residues.unwrap_or(false),
            physical: self.physical,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TunnelingConfig {
    pub cutoff: f64,
}

impl Default for TunnelingConfig {
    fn default() -> Self {
        Self {
            cutoff: DEFAULT_TUNNELING_CUTOFF,
        }
    }
}
