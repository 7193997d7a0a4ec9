//! Mesh topology and wavefront primitives for Strata.
//!
//! This crate defines [`MeshGraph`], the periodic, irregular cell mesh
//! every per-cell array is indexed by, along with the wrapped geometry
//! queries and the scratch structures shared by all shortest-path
//! expansions over it.
//!
//! # Contents
//!
//! - [`MeshGraph`]: CSR adjacency with X-periodic geometry, nearest-cell
//!   lookup, and drift-aligned neighbor walks
//! - [`Frontier`] / [`Cost`]: min-priority queue over an explicit total order
//! - [`EpochTable`]: per-cell scratch invalidated in O(1) per expansion
//! - Lattice constructors ([`MeshGraph::periodic_hex`],
//!   [`MeshGraph::periodic_square`]) for tests and benchmarks

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod epoch;
pub mod error;
pub mod frontier;
pub mod lattice;
pub mod mesh;

#[cfg(test)]
pub(crate) mod compliance;

pub use epoch::EpochTable;
pub use error::MeshError;
pub use frontier::{Cost, Frontier};
pub use mesh::{wrap_delta, MeshGraph, MEAN_EDGE_SAMPLE_LIMIT};
