//! # Chemistry Module
//!
//! Deterministic, table-driven chemical knowledge used by the spatial engine.
//!
//! - [`element`] - Element symbol inference from raw atom labels
//! - [`classification`] - Protein / ligand / water / ion classification
//! - [`tables`] - Van der Waals radii, metal and water sets, tunneling weight factors
//!
//! Every function here is total: unknown symbols fall back to documented defaults
//! instead of failing.

pub mod classification;
pub mod element;
pub mod tables;
