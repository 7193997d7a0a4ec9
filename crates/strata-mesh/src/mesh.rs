//! The periodic world mesh and its wrapped geometry queries.

use crate::error::MeshError;
use strata_core::{CellId, DriftVector};

/// Edges longer than this are considered non-degenerate.
const MIN_EDGE_LENGTH: f64 = 1e-9;

/// Upper bound on edges sampled by [`MeshGraph::mean_edge_length`].
pub const MEAN_EDGE_SAMPLE_LIMIT: usize = 100_000;

/// Shortest signed representative of `dx` on a circle of circumference `width`.
///
/// Returns `dx` unchanged when `width` is zero (no wrap).
#[inline]
pub fn wrap_delta(dx: f64, width: f64) -> f64 {
    if !(width > 0.0) || !width.is_finite() {
        return dx;
    }
    let half = width * 0.5;
    (dx + half).rem_euclid(width) - half
}

/// An irregular cell mesh that wraps periodically along X.
///
/// Adjacency is stored in CSR form: the neighbors of cell `i` are
/// `neighbors[offsets[i]..offsets[i + 1]]`. All distance math uses the
/// wrapped delta-X so that cells on opposite X edges are close.
///
/// The mesh is immutable after construction; the mean edge length is
/// computed once and cached.
///
/// # Examples
///
/// ```
/// use strata_mesh::MeshGraph;
/// use strata_core::CellId;
///
/// // Three cells on a ring of width 3.
/// let mesh = MeshGraph::new(
///     3.0,
///     vec![0.0, 1.0, 2.0],
///     vec![0.0, 0.0, 0.0],
///     vec![0, 2, 4, 6],
///     vec![1, 2, 0, 2, 0, 1],
/// )
/// .unwrap();
/// assert_eq!(mesh.cell_count(), 3);
/// // Cells 0 and 2 are one unit apart across the seam.
/// assert!((mesh.edge_length(CellId(0), CellId(2)) - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct MeshGraph {
    wrap_width: f64,
    site_x: Vec<f64>,
    site_y: Vec<f64>,
    offsets: Vec<u32>,
    neighbors: Vec<u32>,
    mean_edge_length: f64,
}

impl MeshGraph {
    /// Build a mesh from raw CSR arrays, validating their structure.
    pub fn new(
        wrap_width: f64,
        site_x: Vec<f64>,
        site_y: Vec<f64>,
        offsets: Vec<u32>,
        neighbors: Vec<u32>,
    ) -> Result<Self, MeshError> {
        let cell_count = site_x.len();
        if cell_count == 0 {
            return Err(MeshError::EmptyMesh);
        }
        if site_y.len() != cell_count {
            return Err(MeshError::SiteLengthMismatch {
                x: cell_count,
                y: site_y.len(),
            });
        }
        if !wrap_width.is_finite() || wrap_width < 0.0 {
            return Err(MeshError::InvalidWrapWidth { value: wrap_width });
        }
        if offsets.len() != cell_count + 1 {
            return Err(MeshError::OffsetsLength {
                expected: cell_count + 1,
                actual: offsets.len(),
            });
        }
        if offsets[0] != 0 {
            return Err(MeshError::MalformedOffsets { cell: 0 });
        }
        for cell in 0..cell_count {
            let (start, end) = (offsets[cell] as usize, offsets[cell + 1] as usize);
            if end < start || end > neighbors.len() {
                return Err(MeshError::MalformedOffsets { cell });
            }
            if let Some(&bad) = neighbors[start..end]
                .iter()
                .find(|&&n| n as usize >= cell_count)
            {
                return Err(MeshError::NeighborOutOfRange {
                    cell,
                    neighbor: bad,
                    cell_count,
                });
            }
        }
        if offsets[cell_count] as usize != neighbors.len() {
            return Err(MeshError::MalformedOffsets { cell: cell_count });
        }

        let mut mesh = Self {
            wrap_width,
            site_x,
            site_y,
            offsets,
            neighbors,
            mean_edge_length: 1.0,
        };
        mesh.mean_edge_length = mesh.sample_mean_edge_length();
        Ok(mesh)
    }

    /// Number of cells.
    pub fn cell_count(&self) -> usize {
        self.site_x.len()
    }

    /// Always `false`; construction rejects empty meshes.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Periodic wrap width along X (`0` means no wrap).
    pub fn wrap_width(&self) -> f64 {
        self.wrap_width
    }

    /// Site coordinates of `cell`.
    #[inline]
    pub fn site(&self, cell: CellId) -> (f64, f64) {
        (self.site_x[cell.index()], self.site_y[cell.index()])
    }

    /// Raw neighbor indices of `cell`, in mesh order.
    #[inline]
    pub fn neighbor_indices(&self, cell: CellId) -> &[u32] {
        let i = cell.index();
        &self.neighbors[self.offsets[i] as usize..self.offsets[i + 1] as usize]
    }

    /// Neighbors of `cell`, in mesh order.
    pub fn neighbors(&self, cell: CellId) -> impl Iterator<Item = CellId> + '_ {
        self.neighbor_indices(cell).iter().map(|&n| CellId(n))
    }


    /// Wrapped displacement from `a` to `b`.
    #[inline]
    pub fn delta(&self, a: CellId, b: CellId) -> (f64, f64) {
        let (ax, ay) = self.site(a);
        let (bx, by) = self.site(b);
        (wrap_delta(bx - ax, self.wrap_width), by - ay)
    }

    /// Wrapped Euclidean distance between the sites of `a` and `b`.
    #[inline]
    pub fn edge_length(&self, a: CellId, b: CellId) -> f64 {
        let (dx, dy) = self.delta(a, b);
        (dx * dx + dy * dy).sqrt()
    }

    /// Mean wrapped length over undirected edges.
    ///
    /// Degenerate edges are skipped and at most
    /// [`MEAN_EDGE_SAMPLE_LIMIT`] edges are sampled. Falls back to `1.0`
    /// for meshes without usable edges.
    pub fn mean_edge_length(&self) -> f64 {
        self.mean_edge_length
    }

    fn sample_mean_edge_length(&self) -> f64 {
        let mut sum = 0.0;
        let mut count = 0usize;
        'cells: for i in 0..self.cell_count() {
            let a = CellId(i as u32);
            for b in self.neighbors(a) {
                if b.index() <= i {
                    continue;
                }
                let len = self.edge_length(a, b);
                if !len.is_finite() || len <= MIN_EDGE_LENGTH {
                    continue;
                }
                sum += len;
                count += 1;
                if count >= MEAN_EDGE_SAMPLE_LIMIT {
                    break 'cells;
                }
            }
        }
        if count > 0 {
            sum / count as f64
        } else {
            1.0
        }
    }

    /// Edge length from `a` to `b` divided by the mean edge length.
    ///
    /// Returns `None` for degenerate or non-finite edges, which wavefront
    /// expansions skip.
    #[inline]
    pub fn normalized_edge_cost(&self, a: CellId, b: CellId) -> Option<f64> {
        let len = self.edge_length(a, b);
        if !len.is_finite() || len <= MIN_EDGE_LENGTH {
            return None;
        }
        Some(len / self.mean_edge_length)
    }

    /// Cell whose site is nearest to `(x, y)` under wrapped distance.
    ///
    /// Linear scan; the first minimum wins. Returns `None` only when the
    /// query is non-finite.
    pub fn nearest_cell(&self, x: f64, y: f64) -> Option<CellId> {
        let mut best = None;
        let mut best_dist = f64::INFINITY;
        for i in 0..self.cell_count() {
            let dx = wrap_delta(self.site_x[i] - x, self.wrap_width);
            let dy = self.site_y[i] - y;
            let dist = dx * dx + dy * dy;
            if dist < best_dist {
                best_dist = dist;
                best = Some(CellId(i as u32));
            }
        }
        best
    }

    /// The neighbor of `cell` best aligned with `drift`.
    ///
    /// Picks the neighbor maximizing the dot product of the wrapped edge
    /// vector with `drift / 127`. Returns `cell` itself when the drift is
    /// zero or the cell has no neighbors.
    pub fn drift_neighbor(&self, cell: CellId, drift: DriftVector) -> CellId {
        if drift.is_zero() {
            return cell;
        }
        let (ux, uy) = drift.unit();
        let mut best = cell;
        let mut best_dot = f64::NEG_INFINITY;
        for n in self.neighbors(cell) {
            let (dx, dy) = self.delta(cell, n);
            let dot = dx * ux + dy * uy;
            if dot > best_dot {
                best_dot = dot;
                best = n;
            }
        }
        best
    }

    /// Follow [`drift_neighbor`](Self::drift_neighbor) `steps` times.
    pub fn walk_drift(&self, cell: CellId, drift: DriftVector, steps: u32) -> CellId {
        if drift.is_zero() {
            return cell;
        }
        (0..steps).fold(cell, |c, _| self.drift_neighbor(c, drift))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use proptest::prelude::*;

    fn ring(n: u32, spacing: f64) -> MeshGraph {
        let mut offsets = vec![0];
        let mut neighbors = Vec::new();
        for i in 0..n {
            neighbors.push((i + n - 1) % n);
            neighbors.push((i + 1) % n);
            offsets.push(neighbors.len() as u32);
        }
        MeshGraph::new(
            n as f64 * spacing,
            (0..n).map(|i| i as f64 * spacing).collect(),
            vec![0.0; n as usize],
            offsets,
            neighbors,
        )
        .unwrap()
    }

    #[test]
    fn wrap_delta_picks_short_way() {
        assert_eq!(wrap_delta(9.0, 10.0), -1.0);
        assert_eq!(wrap_delta(-9.0, 10.0), 1.0);
        assert_eq!(wrap_delta(4.0, 10.0), 4.0);
        assert_eq!(wrap_delta(4.0, 0.0), 4.0);
    }

    #[test]
    fn ring_compliance() {
        let mesh = ring(8, 2.0);
        compliance::run_full_compliance(&mesh);
    }

    #[test]
    fn ring_mean_edge_length() {
        let mesh = ring(8, 2.0);
        assert!((mesh.mean_edge_length() - 2.0).abs() < 1e-12);
    }

    #[test]
    fn nearest_cell_wraps() {
        let mesh = ring(10, 1.0);
        assert_eq!(mesh.nearest_cell(9.8, 0.0), Some(CellId(0)));
        assert_eq!(mesh.nearest_cell(-0.9, 0.0), Some(CellId(9)));
        assert_eq!(mesh.nearest_cell(f64::NAN, 0.0), None);
    }

    #[test]
    fn drift_walks_along_ring() {
        let mesh = ring(10, 1.0);
        let east = DriftVector { u: 127, v: 0 };
        assert_eq!(mesh.drift_neighbor(CellId(9), east), CellId(0));
        assert_eq!(mesh.walk_drift(CellId(8), east, 3), CellId(1));
        assert_eq!(mesh.walk_drift(CellId(8), east.reversed(), 3), CellId(5));
        assert_eq!(mesh.walk_drift(CellId(8), DriftVector::ZERO, 3), CellId(8));
    }

    #[test]
    fn isolated_cell_keeps_position() {
        let mesh = MeshGraph::new(0.0, vec![0.0], vec![0.0], vec![0, 0], vec![]).unwrap();
        let d = DriftVector { u: 10, v: 10 };
        assert_eq!(mesh.drift_neighbor(CellId(0), d), CellId(0));
        assert_eq!(mesh.mean_edge_length(), 1.0);
    }

    #[test]
    fn rejects_malformed_csr() {
        assert_eq!(
            MeshGraph::new(0.0, vec![], vec![], vec![0], vec![]).unwrap_err(),
            MeshError::EmptyMesh
        );
        assert!(matches!(
            MeshGraph::new(0.0, vec![0.0, 1.0], vec![0.0], vec![0, 0, 0], vec![]),
            Err(MeshError::SiteLengthMismatch { x: 2, y: 1 })
        ));
        assert!(matches!(
            MeshGraph::new(0.0, vec![0.0, 1.0], vec![0.0, 0.0], vec![0, 1], vec![1]),
            Err(MeshError::OffsetsLength { .. })
        ));
        assert!(matches!(
            MeshGraph::new(0.0, vec![0.0, 1.0], vec![0.0, 0.0], vec![0, 1, 2], vec![1, 5]),
            Err(MeshError::NeighborOutOfRange { neighbor: 5, .. })
        ));
        assert!(matches!(
            MeshGraph::new(0.0, vec![0.0, 1.0], vec![0.0, 0.0], vec![0, 2, 1], vec![1, 0]),
            Err(MeshError::MalformedOffsets { cell: 1 })
        ));
        assert!(matches!(
            MeshGraph::new(f64::NAN, vec![0.0], vec![0.0], vec![0, 0], vec![]),
            Err(MeshError::InvalidWrapWidth { .. })
        ));
    }

    proptest! {
        #[test]
        fn wrapped_delta_is_short(dx in -1e4f64..1e4, width in 0.5f64..1e3) {
            let w = wrap_delta(dx, width);
            prop_assert!(w >= -width * 0.5 - 1e-9);
            prop_assert!(w < width * 0.5 + 1e-9);
            // Same point on the circle.
            let k = ((dx - w) / width).round();
            prop_assert!((dx - w - k * width).abs() < 1e-6);
        }
    }
}
