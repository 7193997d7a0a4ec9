//! Error types for mesh construction.

use thiserror::Error;

/// Errors arising from [`MeshGraph`](crate::MeshGraph) construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    /// Attempted to construct a mesh with zero cells.
    #[error("mesh must have at least one cell")]
    EmptyMesh,
    /// `site_x` and `site_y` differ in length.
    #[error("site_x has {x} entries but site_y has {y}")]
    SiteLengthMismatch {
        /// Length of `site_x`.
        x: usize,
        /// Length of `site_y`.
        y: usize,
    },
    /// The adjacency offsets array is not `cell_count + 1` long.
    #[error("neighbor offsets have {actual} entries, expected {expected}")]
    OffsetsLength {
        /// Required length.
        expected: usize,
        /// Length found.
        actual: usize,
    },
    /// Offsets do not start at zero, decrease, or overrun the neighbor list.
    #[error("neighbor offsets are malformed at cell {cell}")]
    MalformedOffsets {
        /// First cell whose offset range is invalid.
        cell: usize,
    },
    /// A neighbor index points outside the mesh.
    #[error("cell {cell} lists neighbor {neighbor}, mesh has {cell_count} cells")]
    NeighborOutOfRange {
        /// Cell owning the bad entry.
        cell: usize,
        /// The offending neighbor index.
        neighbor: u32,
        /// Number of cells.
        cell_count: usize,
    },
    /// The periodic wrap width is NaN, infinite, or negative.
    #[error("wrap width must be finite and non-negative, got {value}")]
    InvalidWrapWidth {
        /// The invalid value.
        value: f64,
    },
    /// A lattice dimension is too small or too large.
    #[error("lattice dimension '{name}' = {value} outside {min}..={max}")]
    InvalidDimension {
        /// Dimension name.
        name: &'static str,
        /// The configured value.
        value: u32,
        /// Smallest accepted value.
        min: u32,
        /// Largest accepted value.
        max: u32,
    },
}
