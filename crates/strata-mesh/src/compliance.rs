//! Mesh structural compliance helpers.
//!
//! These functions verify that a [`MeshGraph`] satisfies the invariants the
//! wavefront and drift code relies on. Reused across the ring, lattice, and
//! hand-built mesh test modules.

use crate::mesh::MeshGraph;
use indexmap::IndexSet;
use strata_core::CellId;

fn cells(mesh: &MeshGraph) -> impl Iterator<Item = CellId> {
    (0..mesh.cell_count() as u32).map(CellId)
}

/// Assert that `b in neighbors(a)` implies `a in neighbors(b)`.
pub fn assert_neighbors_symmetric(mesh: &MeshGraph) {
    for a in cells(mesh) {
        for b in mesh.neighbors(a) {
            assert!(
                mesh.neighbors(b).any(|c| c == a),
                "neighbor symmetry violated: {b} in N({a}) but {a} not in N({b})"
            );
        }
    }
}

/// Assert that no cell lists itself and no neighbor list has duplicates.
pub fn assert_neighbor_lists_simple(mesh: &MeshGraph) {
    for a in cells(mesh) {
        let unique: IndexSet<CellId> = mesh.neighbors(a).collect();
        assert_eq!(
            unique.len(),
            mesh.neighbor_indices(a).len(),
            "duplicate neighbors for cell {a}"
        );
        assert!(!unique.contains(&a), "cell {a} lists itself as a neighbor");
    }
}

/// Assert that `delta(a, b) == -delta(b, a)` along every edge.
pub fn assert_delta_antisymmetric(mesh: &MeshGraph) {
    for a in cells(mesh) {
        for b in mesh.neighbors(a) {
            let (abx, aby) = mesh.delta(a, b);
            let (bax, bay) = mesh.delta(b, a);
            assert!(
                (abx + bax).abs() < 1e-9 && (aby + bay).abs() < 1e-9,
                "delta({a}, {b}) = ({abx}, {aby}) is not the negation of ({bax}, {bay})"
            );
        }
    }
}

/// Assert that every edge has a positive, finite normalized cost.
pub fn assert_edge_costs_positive(mesh: &MeshGraph) {
    for a in cells(mesh) {
        for b in mesh.neighbors(a) {
            let cost = mesh.normalized_edge_cost(a, b);
            assert!(
                cost.is_some_and(|c| c > 0.0 && c.is_finite()),
                "edge {a} -> {b} has unusable cost {cost:?}"
            );
        }
    }
}

/// Assert that each site's nearest cell is the cell itself.
pub fn assert_nearest_cell_of_site_is_self(mesh: &MeshGraph) {
    for a in cells(mesh) {
        let (x, y) = mesh.site(a);
        assert_eq!(mesh.nearest_cell(x, y), Some(a), "nearest cell of site {a}");
    }
}

/// Run all compliance checks.
pub fn run_full_compliance(mesh: &MeshGraph) {
    assert_neighbors_symmetric(mesh);
    assert_neighbor_lists_simple(mesh);
    assert_delta_antisymmetric(mesh);
    assert_edge_costs_positive(mesh);
    assert_nearest_cell_of_site_is_self(mesh);
}
