//! Core types for the Strata tectonic history core.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental vocabulary used throughout the Strata workspace:
//! typed ids, classification enums, quantized drift vectors, saturating
//! byte arithmetic, and the shared error types.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod drift;
pub mod error;
pub mod id;
pub mod kind;
pub mod quantize;

pub use drift::DriftVector;
pub use error::{ConfigError, InputError, ERA_COUNT_MAX, ERA_COUNT_MIN};
pub use id::{CellId, EraIndex, PlateId};
pub use kind::{BoundaryType, Channel, CrustKind, EventType};
pub use quantize::{byte_fraction, clamp01, clamp_byte, clamp_i8};

/// Small inline list of seed cells; boundary events have one or two.
pub type SeedCells = smallvec::SmallVec<[CellId; 2]>;
