use thiserror::Error;

use super::config::ConfigError;
use crate::core::utils::geometry::ParseAxisError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error(transparent)]
    InvalidAxis(#[from] ParseAxisError),

    #[error("Unknown search field '{name}'")]
    UnknownField { name: String },

    #[error("Invalid value '{value}' for field '{field}': expected a number")]
    InvalidValue { field: &'static str, value: String },

    #[error("Grid counts must all be at least 1 (got {nx} x {ny} x {nz})")]
    InvalidGridCounts { nx: usize, ny: usize, nz: usize },

    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("Malformed atom spec '{spec}': {reason}")]
    InvalidAtomSpec { spec: String, reason: String },

    #[error("Atom not found for spec '{spec}'")]
    AtomNotFound { spec: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
