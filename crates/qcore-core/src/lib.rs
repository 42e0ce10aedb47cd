//! # Q-Core Spatial Analysis Library
//!
//! Spatial interrogation of molecular structures: criterion and coordinate searches,
//! contact detection, regular grid partitioning with van der Waals occupancy, and
//! weighted shortest paths ("tunneling") between atoms.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture:
//!
//! - **[`core`]: The Foundation.** The immutable atom model (`Structure`), table-driven
//!   chemistry (element inference, classification, radii), geometry helpers and the CSV
//!   I/O boundary.
//!
//! - **[`engine`]: The Algorithms.** A kd-tree neighbour index behind the `NeighborSearch`
//!   trait, the query layer, lattice partitioning, voxel occupancy, summaries and the
//!   Dijkstra path finder.
//!
//! - **[`workflows`]: The Public API.** Complete analyses with progress reporting and
//!   structured logging, built from the two layers below.
//!
//! A loaded structure is never mutated. Every operation borrows it and returns a fresh
//! result, so concurrent read-only queries need no synchronisation.

pub mod core;
pub mod engine;
pub mod workflows;
