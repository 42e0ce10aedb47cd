pub mod builder;
pub mod defaults;
pub mod file;

use crate::error::Result;
use file::FileConfig;
use std::path::Path;

/// Loads the optional `--config` file; no path means every section falls back to defaults.
pub fn load(path: Option<&Path>) -> Result<FileConfig> {
    match path {
        Some(path) => FileConfig::from_file(path),
        None => Ok(FileConfig::default()),
    }
}
