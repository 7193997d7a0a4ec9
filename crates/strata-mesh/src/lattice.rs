//! Regular lattice meshes that wrap along X.
//!
//! Real worlds arrive as irregular Voronoi meshes from the mesh stage.
//! These constructors build small regular stand-ins with the same
//! periodic-X topology, for tests, benchmarks, and reference profiles.

use crate::error::MeshError;
use crate::mesh::MeshGraph;
use indexmap::IndexSet;

/// Odd-r offset hex neighbors `(dcol, drow)` for even rows: E, NE, NW, W, SW, SE.
static HEX_OFFSETS_EVEN: [(i32, i32); 6] = [(1, 0), (0, -1), (-1, -1), (-1, 0), (-1, 1), (0, 1)];
/// Odd-r offset hex neighbors `(dcol, drow)` for odd rows.
static HEX_OFFSETS_ODD: [(i32, i32); 6] = [(1, 0), (1, -1), (0, -1), (-1, 0), (0, 1), (1, 1)];

/// Von Neumann neighbors `(dcol, drow)`: E, N, W, S.
static SQUARE_OFFSETS: [(i32, i32); 4] = [(1, 0), (0, -1), (-1, 0), (0, 1)];

/// Columns must be at least this many so the X wrap does not alias neighbors.
const MIN_COLS: u32 = 3;
/// Largest accepted lattice dimension.
const MAX_DIM: u32 = 1 << 15;

fn check_dims(cols: u32, rows: u32) -> Result<(), MeshError> {
    if !(MIN_COLS..=MAX_DIM).contains(&cols) {
        return Err(MeshError::InvalidDimension {
            name: "cols",
            value: cols,
            min: MIN_COLS,
            max: MAX_DIM,
        });
    }
    if !(1..=MAX_DIM).contains(&rows) {
        return Err(MeshError::InvalidDimension {
            name: "rows",
            value: rows,
            min: 1,
            max: MAX_DIM,
        });
    }
    Ok(())
}

/// Build CSR adjacency for a `cols x rows` lattice wrapping in X only.
fn build_csr(cols: u32, rows: u32, offsets_for_row: impl Fn(u32) -> &'static [(i32, i32)]) -> (Vec<u32>, Vec<u32>) {
    let (c, r) = (cols as i32, rows as i32);
    let mut offsets = Vec::with_capacity((cols * rows + 1) as usize);
    let mut neighbors = Vec::new();
    offsets.push(0);
    for row in 0..r {
        for col in 0..c {
            let mut set = IndexSet::new();
            for &(dc, dr) in offsets_for_row(row as u32) {
                let nr = row + dr;
                if nr < 0 || nr >= r {
                    continue;
                }
                let nc = (col + dc).rem_euclid(c);
                set.insert((nr * c + nc) as u32);
            }
            neighbors.extend(set);
            offsets.push(neighbors.len() as u32);
        }
    }
    (offsets, neighbors)
}

impl MeshGraph {
    /// A pointy-top hex lattice in odd-r offset layout, wrapping in X.
    ///
    /// Cell `row * cols + col` sits at `(col + 0.5 * (row % 2), row * sqrt(3)/2)`,
    /// so every edge has unit length and the wrap width is `cols`.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_mesh::MeshGraph;
    /// use strata_core::CellId;
    ///
    /// let mesh = MeshGraph::periodic_hex(8, 6).unwrap();
    /// assert_eq!(mesh.cell_count(), 48);
    /// // Interior cells have six neighbors.
    /// assert_eq!(mesh.neighbor_indices(CellId(8 * 2 + 3)).len(), 6);
    /// assert!((mesh.mean_edge_length() - 1.0).abs() < 1e-9);
    /// ```
    pub fn periodic_hex(cols: u32, rows: u32) -> Result<Self, MeshError> {
        check_dims(cols, rows)?;
        let row_height = 3f64.sqrt() * 0.5;
        let mut site_x = Vec::with_capacity((cols * rows) as usize);
        let mut site_y = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            let shift = if row % 2 == 1 { 0.5 } else { 0.0 };
            for col in 0..cols {
                site_x.push(col as f64 + shift);
                site_y.push(row as f64 * row_height);
            }
        }
        let (offsets, neighbors) = build_csr(cols, rows, |row| {
            if row % 2 == 0 {
                &HEX_OFFSETS_EVEN[..]
            } else {
                &HEX_OFFSETS_ODD[..]
            }
        });
        Self::new(cols as f64, site_x, site_y, offsets, neighbors)
    }

    /// A square 4-connected lattice with unit spacing, wrapping in X.
    pub fn periodic_square(cols: u32, rows: u32) -> Result<Self, MeshError> {
        check_dims(cols, rows)?;
        let mut site_x = Vec::with_capacity((cols * rows) as usize);
        let mut site_y = Vec::with_capacity((cols * rows) as usize);
        for row in 0..rows {
            for col in 0..cols {
                site_x.push(col as f64);
                site_y.push(row as f64);
            }
        }
        let (offsets, neighbors) = build_csr(cols, rows, |_| &SQUARE_OFFSETS[..]);
        Self::new(cols as f64, site_x, site_y, offsets, neighbors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compliance;
    use strata_core::CellId;

    #[test]
    fn hex_compliance() {
        for (cols, rows) in [(3, 1), (3, 4), (8, 6), (9, 5)] {
            let mesh = MeshGraph::periodic_hex(cols, rows).unwrap();
            compliance::run_full_compliance(&mesh);
        }
    }

    #[test]
    fn square_compliance() {
        for (cols, rows) in [(3, 1), (4, 4), (10, 3)] {
            let mesh = MeshGraph::periodic_square(cols, rows).unwrap();
            compliance::run_full_compliance(&mesh);
        }
    }

    #[test]
    fn hex_edges_are_unit_length() {
        let mesh = MeshGraph::periodic_hex(6, 4).unwrap();
        for i in 0..mesh.cell_count() as u32 {
            for n in mesh.neighbors(CellId(i)) {
                let len = mesh.edge_length(CellId(i), n);
                assert!((len - 1.0).abs() < 1e-9, "edge {i}->{n} has length {len}");
            }
        }
    }

    #[test]
    fn hex_wraps_in_x_but_not_y() {
        let mesh = MeshGraph::periodic_hex(5, 3).unwrap();
        // Row 0, col 0 touches row 0, col 4 across the seam.
        assert!(mesh.neighbors(CellId(0)).any(|n| n == CellId(4)));
        // Top row has no neighbors above it: 2 in-row + 2 below.
        assert_eq!(mesh.neighbor_indices(CellId(0)).len(), 4);
        assert_eq!(mesh.neighbor_indices(CellId(5 + 2)).len(), 6);
    }

    #[test]
    fn square_degree() {
        let mesh = MeshGraph::periodic_square(5, 3).unwrap();
        assert_eq!(mesh.neighbor_indices(CellId(5 + 2)).len(), 4);
        assert_eq!(mesh.neighbor_indices(CellId(0)).len(), 3);
    }

    #[test]
    fn rejects_narrow_lattices() {
        assert!(matches!(
            MeshGraph::periodic_hex(2, 4),
            Err(MeshError::InvalidDimension { name: "cols", .. })
        ));
        assert!(matches!(
            MeshGraph::periodic_square(4, 0),
            Err(MeshError::InvalidDimension { name: "rows", .. })
        ));
    }
}
