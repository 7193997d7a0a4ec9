//! Error types shared across the Strata workspace.
//!
//! Organized by where the failure is detected: [`ConfigError`] for
//! configuration validation and [`InputError`] for upstream artifacts that
//! fail validation at the data-model boundary. Both are raised before any
//! computation begins; numeric overflow is never an error (outputs saturate).

use thiserror::Error;

/// Inclusive lower bound on the number of eras.
pub const ERA_COUNT_MIN: usize = 5;
/// Inclusive upper bound on the number of eras.
pub const ERA_COUNT_MAX: usize = 8;

/// Errors detected while validating a history configuration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// `era_weights` and `drift_steps_by_era` have different lengths.
    #[error("era_weights has {weights} entries but drift_steps_by_era has {drift_steps}")]
    EraLengthMismatch {
        /// Length of `era_weights`.
        weights: usize,
        /// Length of `drift_steps_by_era`.
        drift_steps: usize,
    },
    /// The era count lies outside `ERA_COUNT_MIN..=ERA_COUNT_MAX`.
    #[error("era count {count} outside supported range 5..=8")]
    EraCountOutOfRange {
        /// The configured era count.
        count: usize,
    },
    /// An era weight is NaN, infinite, or outside `[0, 10]`.
    #[error("era_weights[{era}] must be finite in [0, 10], got {value}")]
    InvalidEraWeight {
        /// Offending era.
        era: usize,
        /// The invalid value.
        value: f64,
    },
    /// A drift step count exceeds the supported maximum.
    #[error("drift_steps_by_era[{era}] = {value} exceeds maximum {max}")]
    DriftStepsTooLarge {
        /// Offending era.
        era: usize,
        /// The configured step count.
        value: u32,
        /// Largest accepted value.
        max: u32,
    },
    /// `belt_influence_distance` is outside `1..=64`.
    #[error("belt_influence_distance must be in 1..=64, got {value}")]
    InvalidBeltInfluence {
        /// The invalid value.
        value: u32,
    },
    /// `belt_decay` is NaN, infinite, or outside `[0.01, 10]`.
    #[error("belt_decay must be finite in [0.01, 10], got {value}")]
    InvalidBeltDecay {
        /// The invalid value.
        value: f64,
    },
    /// A reset fraction is NaN or outside `[0, 1]`.
    #[error("reset fraction '{name}' must be in [0, 1], got {value}")]
    InvalidResetFraction {
        /// Which fraction.
        name: &'static str,
        /// The invalid value.
        value: f64,
    },
    /// The hotspot forcing floor is NaN or outside `[0, 1]`.
    #[error("hotspot_forcing_floor must be in [0, 1], got {value}")]
    InvalidHotspotFloor {
        /// The invalid value.
        value: f64,
    },
}

/// Errors raised when an upstream artifact is missing or malformed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InputError {
    /// A per-cell or per-plate array has the wrong length.
    #[error("{artifact}.{field} has {actual} entries, expected {expected}")]
    LengthMismatch {
        /// Artifact name, e.g. `"crust"`.
        artifact: &'static str,
        /// Array name within the artifact.
        field: &'static str,
        /// Required length.
        expected: usize,
        /// Length found.
        actual: usize,
    },
    /// A cell reference points outside the mesh.
    #[error("{artifact} references cell {cell}, mesh has {cell_count} cells")]
    CellOutOfRange {
        /// Artifact name.
        artifact: &'static str,
        /// The offending cell index.
        cell: u32,
        /// Number of cells in the mesh.
        cell_count: usize,
    },
    /// Two plates share the same id.
    #[error("plate id {id} appears more than once in the plate graph")]
    DuplicatePlate {
        /// The repeated id.
        id: u16,
    },
    /// A plate id does not fit the `i16` artifact encoding.
    #[error("plate id {id} exceeds the largest encodable id 32767")]
    PlateIdOutOfRange {
        /// The offending id.
        id: u16,
    },
    /// The plate graph has no plates.
    #[error("plate graph has no plates")]
    NoPlates,
    /// A segment source produced nothing for an era.
    #[error("no tectonic segments available for era {era}")]
    MissingEraSegments {
        /// The era without segments.
        era: usize,
    },
}
