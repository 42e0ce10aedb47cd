//! # Core Models Module
//!
//! Data structures representing a loaded molecular structure.
//!
//! ## Key Components
//!
//! - [`atom`] - The immutable per-atom record with derived element, class and residue key
//! - [`residue`] - Residue keys, standard amino-acid codes and atom classification categories
//! - [`structure`] - The read-only atom snapshot every query, partition and path operation borrows
//!
//! ## Usage
//!
//! ```ignore
//! use qcore::core::models::{atom::Atom, structure::Structure};
//! use nalgebra::Point3;
//!
//! let structure = Structure::new(vec![
//!     Atom::new(1, "CA", "ALA", "A", 1, Point3::new(0.0, 0.0, 0.0)),
//!     Atom::new(2, "CB", "ALA", "A", 1, Point3::new(1.2, 0.0, 0.0)),
//! ])?;
//! ```

pub mod atom;
pub mod residue;
pub mod structure;
