//! # Engine Module
//!
//! The query, partitioning and path-finding algorithms that operate on a read-only
//! [`Structure`](crate::core::models::structure::Structure).
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Typed parameters and their defaults
//! - **Neighbour Index** ([`spatial`]) - The [`NeighborSearch`](spatial::NeighborSearch) seam and its kd-tree implementation
//! - **Queries** ([`query`]) - Criterion, axis-range, box and contact searches
//! - **Lattices** ([`grid`]) - Regular cell subdivision and atom-to-cell assignment
//! - **Physical Occupancy** ([`occupancy`]) - Van der Waals voxel counting per cell
//! - **Statistics** ([`summary`]) - Cell, residue, chain and element summaries
//! - **Tunneling** ([`tunneling`]) - Atom spec resolution and weighted shortest paths
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - The engine's validation and lookup failures
//!
//! Every operation borrows its input and returns freshly allocated results; empty
//! results are values, never errors.

pub mod config;
pub mod error;
pub mod grid;
pub mod occupancy;
pub mod progress;
pub mod query;
pub mod spatial;
pub mod summary;
pub mod tunneling;
