use crate::error::{CliError, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::debug;

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileContactsConfig {
    pub max_distance: Option<f64>,
    pub ignore_hydrogens: Option<bool>,
    pub exclude_same_residue: Option<bool>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FilePhysicalConfig {
    /// Turns physical occupancy on without `--physical`.
    pub enabled: Option<bool>,
    pub voxel_size: Option<f64>,
    pub padding: Option<f64>,
    pub expand_bounds: Option<bool>,
    pub mode: Option<String>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileGridConfig {
    pub counts: Option<[usize; 3]>,
    pub complete_residues: Option<bool>,
    pub physical: Option<FilePhysicalConfig>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct FileTunnelingConfig {
    pub cutoff: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub contacts: Option<FileContactsConfig>,
    pub grid: Option<FileGridConfig>,
    pub tunneling: Option<FileTunnelingConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}
