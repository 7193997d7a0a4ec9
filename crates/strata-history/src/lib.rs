//! Tectonic history and crust provenance for Strata.
//!
//! Given a mesh, today's plates, plate motion, mantle forcing, and boundary
//! segments per era, this crate reconstructs a short sequence of eras
//! (oldest to newest) and reports what each cell went through.
//!
//! # Pipeline order (one run)
//!
//! 1. [`plate_membership_by_era`]: drifting Voronoi membership per era,
//!    anchored to today's assignment in the newest era
//! 2. [`era_events`]: typed boundary and hotspot events per era
//! 3. [`FieldEmitter`]: decayed driver fields and boundary classification
//! 4. [`TectonicHistory::aggregate`]: cross-era rollups
//! 5. [`tracer_index_by_era`] and [`TectonicProvenance::compute`]: crust
//!    lineage and age
//!
//! [`TectonicHistoryBuilder`] runs all of them in order.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod emission;
pub mod encode;
pub mod error;
pub mod events;
pub mod fields;
pub mod fingerprint;
pub mod inputs;
pub mod membership;
pub mod metrics;
pub mod pipeline;
pub mod provenance;
pub mod rollups;
pub mod segments;
pub mod tracer;
pub mod validate;
pub mod winners;

pub use config::{HistoryConfig, ResetConfig};
pub use emission::{EmissionParams, EmissionStats, EraScaling, FieldEmitter};
pub use encode::{EncodedEra, EncodedHistory, EncodedProvenance};
pub use error::{ArtifactError, HistoryError};
pub use events::{era_events, TectonicEvent};
pub use fields::EraFields;
pub use fingerprint::{history_fingerprint, provenance_fingerprint, Fingerprint};
pub use inputs::{
    CrustTypes, MantleForcing, Plate, PlateGraph, PlateKind, PlateMotion, Segment,
    TectonicSegments,
};
pub use membership::{plate_membership_by_era, MembershipResolver, PlateMembership};
pub use metrics::{EraMetrics, RunMetrics};
pub use pipeline::{TectonicHistoryBuilder, TectonicInputs, TectonicOutputs};
pub use provenance::{
    crust_age, derive_reset_threshold, BoundaryRecord, ResetThresholds, TectonicProvenance,
};
pub use rollups::{era_gain, TectonicHistory, Tectonics};
pub use segments::{PrecomputedSegments, SegmentSource};
pub use tracer::{tracer_index_by_era, ADVECTION_STEPS_PER_ERA};
pub use winners::{Candidate, ChannelWinners, WinnerSlot};
