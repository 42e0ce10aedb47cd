use qcore::engine::config::{self as core_config, OccupancyMode};

/// Built-in values used when neither the command line nor the config file sets a parameter.
pub struct DefaultsConfig {
    pub max_distance: f64,
    pub ignore_hydrogens: bool,
    pub exclude_same_residue: bool,
    pub complete_residues: bool,
    pub physical: bool,
    pub voxel_size: f64,
    pub padding: f64,
    pub expand_bounds: bool,
    pub mode: OccupancyMode,
    pub tunneling_cutoff: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let physical = core_config::PhysicalConfig::default();
        Self {
            max_distance: core_config::DEFAULT_CONTACT_DISTANCE,
            ignore_hydrogens: false,
            exclude_same_residue: false,
            complete_residues: false,
            physical: false,
            voxel_size: physical.voxel_size,
            padding: physical.padding,
            expand_bounds: physical.expand_bounds,
            mode: physical.mode,
            tunneling_cutoff: core_config::DEFAULT_TUNNELING_CUTOFF,
        }
    }
}
