//! Backward tracer advection between eras.
//!
//! `tracer[e][i]` names the cell whose crust, one era earlier, drifted into
//! cell `i` by era `e`. Era 0 has no predecessor and maps every cell to
//! itself.

use crate::fields::EraFields;
use crate::inputs::MantleForcing;
use strata_core::{CellId, DriftVector};
use strata_mesh::MeshGraph;

/// Mesh steps a tracer walks per era.
pub const ADVECTION_STEPS_PER_ERA: u32 = 6;

/// Quantized mantle forcing direction of every cell.
pub fn mantle_drift(mantle: &MantleForcing) -> Vec<DriftVector> {
    mantle
        .forcing_u
        .iter()
        .zip(&mantle.forcing_v)
        .map(|(&u, &v)| DriftVector::from_vector(u, v))
        .collect()
}

/// Identity tracer over `cell_count` cells.
pub fn identity_tracer(cell_count: usize) -> Vec<CellId> {
    (0..cell_count as u32).map(CellId).collect()
}

/// Tracer for one era: each cell walks `steps` against the drift it saw in
/// the previous era.
///
/// The boundary drift of `previous` is used where non-zero, the mantle
/// drift otherwise. Cells with neither stay in place.
pub fn advect_tracer(
    mesh: &MeshGraph,
    previous: &EraFields,
    mantle_drift: &[DriftVector],
    steps: u32,
) -> Vec<CellId> {
    (0..mesh.cell_count())
        .map(|i| {
            let cell = CellId(i as u32);
            let boundary = previous.boundary_drift.get(i).copied().unwrap_or(DriftVector::ZERO);
            let drift = if boundary.is_zero() {
                mantle_drift.get(i).copied().unwrap_or(DriftVector::ZERO)
            } else {
                boundary
            };
            mesh.walk_drift(cell, drift.reversed(), steps)
        })
        .collect()
}

/// Tracer index for every era, oldest first.
pub fn tracer_index_by_era(
    mesh: &MeshGraph,
    mantle_drift: &[DriftVector],
    eras: &[EraFields],
) -> Vec<Vec<CellId>> {
    let mut out = Vec::with_capacity(eras.len());
    if eras.is_empty() {
        return out;
    }
    out.push(identity_tracer(mesh.cell_count()));
    for previous in &eras[..eras.len() - 1] {
        out.push(advect_tracer(mesh, previous, mantle_drift, ADVECTION_STEPS_PER_ERA));
    }
    out
}
