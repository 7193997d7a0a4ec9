//! Strata: tectonic history and crust provenance for procedural worlds.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Strata sub-crates. For most users, adding `strata` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use strata::prelude::*;
//!
//! // A 12x6 hex world split into two plates down the middle.
//! let mesh = MeshGraph::periodic_hex(12, 6).unwrap();
//! let n = mesh.cell_count();
//! let owner = (0..n).map(|i| Some(PlateId((i % 12 >= 6) as u16))).collect();
//! let plates = PlateGraph::new(
//!     vec![
//!         Plate { id: PlateId(0), seed_x: 3.0, seed_y: 2.0, kind: PlateKind::Major },
//!         Plate { id: PlateId(1), seed_x: 9.0, seed_y: 2.0, kind: PlateKind::Minor },
//!     ],
//!     owner,
//! )
//! .unwrap();
//! let crust = CrustTypes::new(vec![CrustKind::Oceanic; n]);
//! let motion = PlateMotion::new(vec![(1.0, 0.0), (-1.0, 0.0)]);
//! let mantle = MantleForcing::quiet(n);
//!
//! // One divergent segment between cells 17 and 18, every era.
//! let segments = TectonicSegments::new(vec![Segment {
//!     plate_a: Some(PlateId(0)),
//!     plate_b: Some(PlateId(1)),
//!     extension: 200,
//!     ..Segment::between(Some(BoundaryType::Divergent), CellId(17), CellId(18))
//! }]);
//!
//! let inputs = TectonicInputs { mesh: &mesh, crust: &crust, plates: &plates, motion: &motion, mantle: &mantle };
//! let out = TectonicHistoryBuilder::new(inputs).build(&segments).unwrap();
//! assert_eq!(out.history.era_count, 5);
//! assert!(out.tectonics.rift[17] > 0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `strata-core` | IDs, kinds, drift vectors, quantization, errors |
//! | [`mesh`] | `strata-mesh` | Periodic mesh graph and wavefront primitives |
//! | [`history`] | `strata-history` | Membership, emission, rollups, provenance |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, IDs, and errors (`strata-core`).
///
/// Contains the id newtypes, boundary and event kinds,
/// [`types::DriftVector`], and the saturating byte helpers.
pub use strata_core as types;

/// Periodic mesh graph and wavefront primitives (`strata-mesh`).
///
/// Most users only need [`mesh::MeshGraph`], which is also available in
/// the [`prelude`].
pub use strata_mesh as mesh;

/// Tectonic history pipeline (`strata-history`).
///
/// [`history::TectonicHistoryBuilder`] runs every stage in order; the
/// individual stages are public for callers that need only part of it.
pub use strata_history as history;

/// Common imports for typical Strata usage.
///
/// ```rust
/// use strata::prelude::*;
/// ```
///
/// This imports the input artifacts, the pipeline builder and its outputs,
/// configuration, and the core id and kind types.
pub mod prelude {
    // Core types
    pub use strata_core::{
        BoundaryType, CellId, Channel, CrustKind, DriftVector, EraIndex, EventType, PlateId,
    };

    // Errors
    pub use strata_core::{ConfigError, InputError};
    pub use strata_history::{ArtifactError, HistoryError};

    // Mesh
    pub use strata_mesh::MeshGraph;

    // Inputs
    pub use strata_history::{
        CrustTypes, MantleForcing, Plate, PlateGraph, PlateKind, PlateMotion, Segment,
        TectonicSegments,
    };

    // Pipeline
    pub use strata_history::{
        HistoryConfig, PlateMembership, PrecomputedSegments, ResetConfig, SegmentSource,
        TectonicHistory, TectonicHistoryBuilder, TectonicInputs, TectonicOutputs,
        TectonicProvenance, Tectonics,
    };
}
