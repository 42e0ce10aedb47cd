//! Provides input/output functionality for tabular atom data.
//!
//! Structures enter the engine as CSV atom tables and analysis results leave it as
//! CSV reports. Parsing of crystallographic formats happens upstream; this module only
//! deals with the flat, one-row-per-atom representation.

pub mod atom_table;
pub mod report;
