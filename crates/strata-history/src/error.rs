//! Top-level error for a history generation run.

use strata_core::{ConfigError, InputError};
use strata_mesh::MeshError;
use thiserror::Error;

/// Any failure that stops a generation run before it computes anything.
///
/// Each variant wraps the layer that detected the problem. Numeric
/// overflow is never an error: every output saturates.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum HistoryError {
    /// The configuration failed validation.
    #[error("invalid history configuration: {0}")]
    Config(#[from] ConfigError),
    /// An upstream artifact is missing or malformed.
    #[error("invalid input artifact: {0}")]
    Input(#[from] InputError),
    /// The mesh could not be constructed.
    #[error("invalid mesh: {0}")]
    Mesh(#[from] MeshError),
    /// A produced artifact failed its structural check.
    #[error("invalid output artifact: {0}")]
    Artifact(#[from] ArtifactError),
}

/// Structural problems found when checking a history or provenance artifact.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ArtifactError {
    /// The era count is outside the supported range.
    #[error("{artifact}.era_count is {count}, expected {min}..={max}")]
    EraCount {
        /// Artifact name.
        artifact: &'static str,
        /// Era count found.
        count: usize,
        /// Smallest supported era count.
        min: usize,
        /// Largest supported era count.
        max: usize,
    },
    /// A per-era list does not have one entry per era.
    #[error("{artifact}.{field} has {actual} eras, expected {expected}")]
    EraListLength {
        /// Artifact name.
        artifact: &'static str,
        /// List name.
        field: &'static str,
        /// The era count.
        expected: usize,
        /// Entries found.
        actual: usize,
    },
    /// A per-cell array has the wrong length.
    #[error("{artifact}.{field}{} has {actual} cells, expected {expected}", .era.map(|e| format!(" (era {e})")).unwrap_or_default())]
    CellLength {
        /// Artifact name.
        artifact: &'static str,
        /// Array name.
        field: &'static str,
        /// Era of a per-era array.
        era: Option<usize>,
        /// The cell count.
        expected: usize,
        /// Length found.
        actual: usize,
    },
    /// The artifact covers no cells.
    #[error("{artifact} has no cells")]
    NoCells {
        /// Artifact name.
        artifact: &'static str,
    },
    /// A tracer names a cell outside the mesh.
    #[error("tracer of era {era} maps cell {cell} to {source_cell}, mesh has {cell_count} cells")]
    TracerOutOfRange {
        /// Era of the tracer.
        era: usize,
        /// Destination cell.
        cell: usize,
        /// Source cell found.
        source_cell: u32,
        /// Number of cells.
        cell_count: usize,
    },
    /// The layout version is not supported.
    #[error("provenance version {found} is not supported")]
    Version {
        /// Version found.
        found: u32,
    },
}
