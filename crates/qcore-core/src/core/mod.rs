//! # Core Module
//!
//! The stateless foundation of the spatial engine: the atom model, table-driven
//! chemistry, geometry helpers and the tabular I/O boundary.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residue keys and the read-only [`Structure`](models::structure::Structure) snapshot
//! - **Chemical Knowledge** ([`chemistry`]) - Element inference, classification, van der Waals radii and tunneling factors
//! - **Geometry** ([`utils`]) - Axes, bounding boxes, evenly spaced lattice edges
//! - **File I/O** ([`io`]) - CSV atom tables in, CSV reports out
//!
//! Nothing in this module holds mutable state; every function is a pure mapping from
//! its inputs to a freshly allocated result.

pub mod chemistry;
pub mod io;
pub mod models;
pub mod utils;
