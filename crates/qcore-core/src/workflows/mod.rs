//! # Workflows Module
//!
//! High-level entry points that tie the [`engine`](crate::engine) and
//! [`core`](crate::core) layers together into complete analyses.
//!
//! Each workflow validates its parameters, reports progress phases through a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter), emits structured
//! `tracing` events and returns an owned result value.
//!
//! - **Grid Partitioning** ([`partition`]) - Lattice assignment, per-cell statistics and
//!   optional van der Waals occupancy, returned as a [`GridAnalysis`](partition::GridAnalysis)
//!   with lookup by `(i, j, k)`.
//! - **Tunneling** ([`tunnel`]) - Endpoint resolution from atom specs followed by the
//!   weighted shortest-path search.

pub mod partition;
pub mod tunnel;
